//! Authentication session lifecycle
//!
//! Orchestrates login, current-user hydration, silent token refresh and
//! logout against the remote API. Navigation is never driven from here:
//! session-fatal outcomes are published as [`SessionEvent`]s on a watch
//! channel and the top-level controller reacts to them.

use std::sync::{Arc, RwLock};

use tokio::sync::{watch, Mutex};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::http::HttpService;
use crate::models::auth::{
    ChangePasswordInput, LoginInput, LoginResult, LogoutInput, RefreshInput, RefreshResult,
    RegisterInput, UpdateProfileInput, UserInfo,
};
use crate::models::Principal;

use super::store::TokenStore;

/// Session status over the token lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Anonymous,
    Authenticating,
    Authenticated,
    RefreshInFlight,
    Failed,
}

/// Published on the session channel; consumed by the top-level controller,
/// which owns navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Idle,
    SignedIn,
    SignedOut,
    /// Refresh failed or the session was otherwise invalidated. Both tokens
    /// are already cleared when this fires.
    Expired,
}

pub struct AuthSession {
    http: Arc<HttpService>,
    store: Arc<TokenStore>,
    status: RwLock<SessionStatus>,
    principal: RwLock<Option<Principal>>,
    /// Serializes refresh attempts: at most one in flight, concurrent
    /// callers await its outcome instead of firing their own.
    refresh_gate: Mutex<()>,
    events: watch::Sender<SessionEvent>,
}

impl AuthSession {
    pub fn new(http: Arc<HttpService>, store: Arc<TokenStore>) -> Self {
        let (events, _) = watch::channel(SessionEvent::Idle);
        Self {
            http,
            store,
            status: RwLock::new(SessionStatus::Anonymous),
            principal: RwLock::new(None),
            refresh_gate: Mutex::new(()),
            events,
        }
    }

    /// Subscribe to session events.
    pub fn events(&self) -> watch::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn status(&self) -> SessionStatus {
        self.status
            .read()
            .map(|guard| *guard)
            .unwrap_or(SessionStatus::Failed)
    }

    /// Currently hydrated principal, if any.
    pub fn principal(&self) -> Option<Principal> {
        self.principal.read().ok().and_then(|guard| guard.clone())
    }

    /// Authenticate against `/auth/Login`, persist both tokens, then hydrate
    /// the principal from `/users/MyInfo`. On rejection nothing is persisted.
    pub async fn login(&self, input: LoginInput) -> AppResult<Principal> {
        input.validate()?;
        self.set_status(SessionStatus::Authenticating);

        let result: LoginResult = match self.http.post_anon("/auth/Login", &input).await {
            Ok(result) => result,
            Err(err) => {
                self.set_status(SessionStatus::Anonymous);
                return Err(match err {
                    AppError::ServerRejection { status, .. } if status == 400 || status == 401 => {
                        AppError::InvalidCredentials
                    }
                    other => other,
                });
            }
        };

        self.store.set_access(&result.access_token)?;
        self.store.set_refresh(&result.refresh_token)?;
        tracing::info!(user = %input.name, "login succeeded");

        let principal = self.get_user_info().await?;
        self.set_status(SessionStatus::Authenticated);
        self.events.send_replace(SessionEvent::SignedIn);
        Ok(principal)
    }

    /// Fetch the current principal. Requires a usable access token; when only
    /// a refresh token is left, exactly one refresh attempt is made before
    /// the fetch. Without either, fails locally with no network call.
    pub async fn get_user_info(&self) -> AppResult<Principal> {
        self.ensure_access().await?;

        let info: UserInfo = self.http.get("/users/MyInfo", &[]).await?;
        let principal = Principal::from(info);
        if let Ok(mut guard) = self.principal.write() {
            *guard = Some(principal.clone());
        }
        self.set_status(SessionStatus::Authenticated);
        Ok(principal)
    }

    /// Guarantee a usable access token before a protected request, refreshing
    /// at most once. Used by every resource service.
    pub async fn ensure_access(&self) -> AppResult<()> {
        if self.store.access_usable() {
            return Ok(());
        }
        if self.store.refresh().is_none() {
            return Err(AppError::Unauthenticated);
        }

        let _gate = self.refresh_gate.lock().await;
        // A concurrent caller may have completed the refresh while we waited.
        if self.store.access_usable() {
            return Ok(());
        }
        if self.refresh_token().await {
            Ok(())
        } else {
            Err(AppError::RefreshFailed)
        }
    }

    /// Exchange the stored refresh token for a new access token. Any failure
    /// is terminal for the session: both tokens are cleared and `Expired` is
    /// published. Never retried automatically.
    pub async fn refresh_token(&self) -> bool {
        let Some(refresh_token) = self.store.refresh() else {
            self.expire();
            return false;
        };

        self.set_status(SessionStatus::RefreshInFlight);
        let input = RefreshInput { refresh_token };
        match self
            .http
            .post_anon::<_, RefreshResult>("/auth/Refresh", &input)
            .await
        {
            Ok(result) => {
                let stored = self.store.set_access(&result.access_token).and_then(|_| {
                    match &result.refresh_token {
                        Some(token) => self.store.set_refresh(token),
                        None => Ok(()),
                    }
                });
                if stored.is_err() {
                    self.expire();
                    return false;
                }
                self.set_status(SessionStatus::Authenticated);
                tracing::debug!("access token refreshed");
                true
            }
            Err(err) => {
                tracing::warn!("token refresh failed: {}", err);
                self.expire();
                false
            }
        }
    }

    /// Best-effort server notification, then unconditional local teardown.
    /// Always succeeds from the caller's perspective.
    pub async fn logout(&self) {
        if let Some(token) = self.store.access() {
            let outcome: AppResult<Option<serde_json::Value>> =
                self.http.post("/auth/Logout", &LogoutInput { token }).await;
            if let Err(err) = outcome {
                tracing::debug!("logout notification failed: {}", err);
            }
        }

        self.store.clear_all();
        if let Ok(mut guard) = self.principal.write() {
            *guard = None;
        }
        self.set_status(SessionStatus::Anonymous);
        self.events.send_replace(SessionEvent::SignedOut);
    }

    /// Self-registration via `POST /users/Create`.
    pub async fn register(&self, input: RegisterInput) -> AppResult<UserInfo> {
        input.validate()?;
        self.http.post_anon("/users/Create", &input).await
    }

    /// Update the signed-in user's own profile.
    pub async fn update_my_profile(&self, input: UpdateProfileInput) -> AppResult<UserInfo> {
        input.validate()?;
        self.ensure_access().await?;
        self.http.post("/users/UpdateMyInfo", &input).await
    }

    /// Change the signed-in user's password.
    pub async fn change_password(&self, input: ChangePasswordInput) -> AppResult<()> {
        input.validate()?;
        self.ensure_access().await?;
        let _: Option<serde_json::Value> =
            self.http.post("/users/ChangePassword", &input).await?;
        Ok(())
    }

    fn expire(&self) {
        self.store.clear_all();
        if let Ok(mut guard) = self.principal.write() {
            *guard = None;
        }
        self.set_status(SessionStatus::Failed);
        self.events.send_replace(SessionEvent::Expired);
    }

    fn set_status(&self, status: SessionStatus) {
        if let Ok(mut guard) = self.status.write() {
            *guard = status;
        }
    }
}
