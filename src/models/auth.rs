//! Authentication payloads and the current-user wire model

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use validator::Validate;

use super::principal::{PermissionCode, Principal};

/// Login request body for `POST /auth/Login`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginInput {
    /// Username or email address.
    #[validate(length(min = 1, message = "Username or email address is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// `POST /auth/Login` result payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh request body for `POST /auth/Refresh`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshInput {
    pub refresh_token: String,
}

/// `POST /auth/Refresh` result payload. The server may or may not rotate the
/// refresh token.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResult {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Logout notification body for `POST /auth/Logout`.
#[derive(Debug, Clone, Serialize)]
pub struct LogoutInput {
    pub token: String,
}

/// Self-registration request body for `POST /users/Create`.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    pub full_name: Option<String>,
}

/// Change-password request body for `POST /users/ChangePassword`.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordInput {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub new_password: String,
}

/// Own-profile update body for `POST /users/UpdateMyInfo`.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    pub full_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// `GET /users/MyInfo` result payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl From<UserInfo> for Principal {
    fn from(info: UserInfo) -> Self {
        Principal {
            id: info.id,
            name: info.name,
            permissions: info.permissions.into_iter().map(PermissionCode::new).collect(),
        }
    }
}
