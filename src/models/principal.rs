//! Principal model and permission codes

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Opaque capability identifier (e.g. `"Book_Create"`).
///
/// Permission codes are granted to a principal and required by navigation
/// entries and actions; the codes themselves carry no structure the console
/// interprets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionCode(String);

impl PermissionCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PermissionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PermissionCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// All permission codes known to the console.
///
/// The set of grantable codes is owned by the server; these constants only
/// name the ones the console gates its own surfaces on.
pub mod permissions {
    pub const PUBLISHER_ADMIN: &str = "Publisher_Admin";
    pub const AUTHOR_ADMIN: &str = "Author_Admin";
    pub const CATEGORY_ADMIN: &str = "Category_Admin";
    pub const BOOK_CREATE: &str = "Book_Create";
    pub const BOOK_LOAN_ADMIN: &str = "BookLoan_Admin";
    pub const FINE_ADMIN: &str = "Fine_Admin";
    pub const BOOK_CLIENT: &str = "Book_Client";
    pub const BOOK_LOAN_CLIENT: &str = "BookLoan_Client";
    pub const BOOK_REQUEST_CLIENT: &str = "BookRequest_Client";
    pub const FINE_CLIENT: &str = "Fine_Client";
    pub const USER_GET_ALL: &str = "User_GetAll";
    pub const ROLE_UPDATE: &str = "Role_Update";
    pub const STAFF_GET_ALL: &str = "Staff_GetAll";
}

/// The authenticated actor and its grants.
///
/// Created on successful login or session restore, dropped on logout or
/// refresh failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub name: String,
    pub permissions: HashSet<PermissionCode>,
}

impl Principal {
    pub fn is_granted(&self, code: &str) -> bool {
        self.permissions.contains(&PermissionCode::from(code))
    }
}
