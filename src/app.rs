//! Top-level console controller
//!
//! Owns the session, the top navigation and the current route, and is the
//! only place that turns session events into navigation. Services below it
//! never drive the router themselves.

use std::sync::Arc;

use tokio::sync::watch;

use crate::auth::{AuthSession, FileBackend, SessionEvent, TokenStore};
use crate::config::AppConfig;
use crate::crud::{CrudPage, OptionCache};
use crate::error::AppResult;
use crate::http::HttpService;
use crate::models::auth::LoginInput;
use crate::models::Principal;
use crate::nav::{admin_menu, routes, TopNav};
use crate::pages::{self, PageContext};

pub struct AdminApp {
    config: AppConfig,
    session: Arc<AuthSession>,
    http: Arc<HttpService>,
    options: Arc<OptionCache>,
    nav: TopNav,
    route: String,
    events: watch::Receiver<SessionEvent>,
}

impl AdminApp {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let store = Arc::new(TokenStore::new(
            Box::new(FileBackend::new(config.token_path())),
            config.auth.expiry_leeway_secs,
        ));
        Self::with_store(config, store)
    }

    pub fn with_store(config: AppConfig, store: Arc<TokenStore>) -> AppResult<Self> {
        let http = Arc::new(HttpService::new(
            &config.api.endpoint,
            config.api.timeout_secs,
            store.clone(),
        )?);
        let session = Arc::new(AuthSession::new(http.clone(), store));
        let events = session.events();
        Ok(Self {
            config,
            session,
            http,
            options: Arc::new(OptionCache::new()),
            nav: TopNav::new(admin_menu()),
            route: String::new(),
            events,
        })
    }

    pub fn session(&self) -> Arc<AuthSession> {
        self.session.clone()
    }

    pub fn nav(&self) -> &TopNav {
        &self.nav
    }

    pub fn nav_mut(&mut self) -> &mut TopNav {
        &mut self.nav
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    /// Restore a persisted session and refilter the menu for its principal.
    pub async fn restore(&mut self) -> AppResult<Principal> {
        let principal = self.session.get_user_info().await?;
        self.nav.set_principal(Some(&principal));
        Ok(principal)
    }

    pub async fn sign_in(&mut self, input: LoginInput) -> AppResult<Principal> {
        let principal = self.session.login(input).await?;
        self.nav.set_principal(Some(&principal));
        Ok(principal)
    }

    pub async fn sign_out(&mut self) {
        self.session.logout().await;
        self.nav.set_principal(None);
    }

    pub fn navigate(&mut self, route: &str) {
        self.route = route.to_string();
        self.nav.set_route(route);
    }

    fn page_context(&self) -> PageContext {
        PageContext {
            session: self.session.clone(),
            http: self.http.clone(),
            options: self.options.clone(),
            list: self.config.list.clone(),
        }
    }

    /// Build the CRUD page configured for a route, if it has one.
    pub async fn open_page(&self, route: &str) -> AppResult<Option<CrudPage>> {
        pages::build_page(&self.page_context(), route).await
    }

    /// React to pending session events. A sign-out or expiry clears the
    /// menu's principal and yields a redirect to the login entry point,
    /// preserving the abandoned route.
    pub fn poll_session(&mut self) -> Option<String> {
        if !self.events.has_changed().unwrap_or(false) {
            return None;
        }
        let event = *self.events.borrow_and_update();
        match event {
            SessionEvent::SignedOut | SessionEvent::Expired => {
                self.nav.set_principal(None);
                let target = if self.route.is_empty() || self.route == routes::LOGIN {
                    routes::LOGIN.to_string()
                } else {
                    format!("{}?redirect={}", routes::LOGIN, self.route)
                };
                self.navigate(&target);
                Some(target)
            }
            SessionEvent::Idle | SessionEvent::SignedIn => None,
        }
    }
}
