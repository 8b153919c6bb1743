//! Auth session lifecycle tests

use std::sync::atomic::Ordering;
use std::sync::Arc;

use elidune_admin::auth::{SessionEvent, TokenStore};
use elidune_admin::config::{ApiConfig, AppConfig};
use elidune_admin::models::auth::LoginInput;
use elidune_admin::nav::routes;
use elidune_admin::{AdminApp, AppError};

use crate::support::spawn_api;

fn credentials(name: &str, password: &str) -> LoginInput {
    LoginInput {
        name: name.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn login_persists_tokens_and_hydrates_principal() {
    let api = spawn_api().await;
    let store = Arc::new(TokenStore::in_memory());
    let mut app = AdminApp::with_store(api.config(), store.clone()).unwrap();

    let principal = app.sign_in(credentials("admin", "secret")).await.unwrap();

    assert_eq!(store.access().as_deref(), Some("A1"));
    assert_eq!(store.refresh().as_deref(), Some("R1"));
    assert_eq!(principal.id, 12);
    assert_eq!(principal.name, "admin");
    assert!(principal.is_granted("Book_Create"));

    // The menu is filtered for the new principal.
    assert!(app.nav().visible().iter().any(|item| item.key() == "books"));
    assert!(!app.nav().visible().iter().any(|item| item.key() == "fines"));
}

#[tokio::test]
async fn rejected_login_persists_nothing() {
    let api = spawn_api().await;
    let store = Arc::new(TokenStore::in_memory());
    let mut app = AdminApp::with_store(api.config(), store.clone()).unwrap();

    let err = app
        .sign_in(credentials("admin", "wrong"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
    assert!(store.access().is_none());
    assert!(store.refresh().is_none());
}

#[tokio::test]
async fn user_info_refreshes_exactly_once_when_access_is_missing() {
    let api = spawn_api().await;
    let store = Arc::new(TokenStore::in_memory());
    store.set_refresh("R1").unwrap();
    let app = AdminApp::with_store(api.config(), store.clone()).unwrap();

    let principal = app.session().get_user_info().await.unwrap();

    assert_eq!(principal.name, "admin");
    assert_eq!(api.state.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.access().as_deref(), Some("A2"));
    assert_eq!(store.refresh().as_deref(), Some("R2"));
}

#[tokio::test]
async fn concurrent_user_info_calls_share_one_refresh() {
    let api = spawn_api().await;
    let store = Arc::new(TokenStore::in_memory());
    store.set_refresh("R1").unwrap();
    let app = AdminApp::with_store(api.config(), store).unwrap();
    let session = app.session();

    let (first, second) = tokio::join!(session.get_user_info(), session.get_user_info());
    first.unwrap();
    second.unwrap();

    assert_eq!(api.state.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn without_any_token_no_request_is_made() {
    let api = spawn_api().await;
    let app = AdminApp::with_store(api.config(), Arc::new(TokenStore::in_memory())).unwrap();

    let err = app.session().get_user_info().await.unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated));
    assert_eq!(api.state.refresh_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rejected_refresh_clears_both_tokens_and_expires_the_session() {
    let api = spawn_api().await;
    api.state.fail_refresh.store(true, Ordering::SeqCst);

    let store = Arc::new(TokenStore::in_memory());
    store.set_refresh("R1").unwrap();
    let app = AdminApp::with_store(api.config(), store.clone()).unwrap();
    let session = app.session();
    let mut events = session.events();

    let err = session.get_user_info().await.unwrap_err();
    assert!(matches!(err, AppError::RefreshFailed));
    assert!(store.access().is_none());
    assert!(store.refresh().is_none());
    assert!(events.has_changed().unwrap());
    assert_eq!(*events.borrow_and_update(), SessionEvent::Expired);
}

#[tokio::test]
async fn unreachable_refresh_endpoint_also_clears_tokens() {
    // Nothing listens here; the refresh call fails at the transport layer.
    let config = AppConfig {
        api: ApiConfig {
            endpoint: "http://127.0.0.1:1".to_string(),
            timeout_secs: 1,
        },
        auth: Default::default(),
        logging: Default::default(),
        list: Default::default(),
    };
    let store = Arc::new(TokenStore::in_memory());
    store.set_refresh("R1").unwrap();
    let app = AdminApp::with_store(config, store.clone()).unwrap();

    assert!(!app.session().refresh_token().await);
    assert!(store.access().is_none());
    assert!(store.refresh().is_none());
}

#[tokio::test]
async fn logout_is_idempotent_and_never_fails() {
    let api = spawn_api().await;
    let store = Arc::new(TokenStore::in_memory());
    let mut app = AdminApp::with_store(api.config(), store.clone()).unwrap();

    app.sign_in(credentials("admin", "secret")).await.unwrap();
    app.sign_out().await;
    assert!(store.access().is_none());
    assert!(store.refresh().is_none());

    // Second sign-out finds no tokens and still succeeds quietly.
    app.sign_out().await;
    assert!(store.access().is_none());
    assert!(store.refresh().is_none());
    assert_eq!(api.state.logout_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn session_expiry_redirects_to_login_with_the_abandoned_route() {
    let api = spawn_api().await;
    api.state.fail_refresh.store(true, Ordering::SeqCst);

    let store = Arc::new(TokenStore::in_memory());
    store.set_refresh("R1").unwrap();
    let mut app = AdminApp::with_store(api.config(), store).unwrap();
    app.navigate(routes::BOOKS);

    let _ = app.session().get_user_info().await;
    let target = app.poll_session().unwrap();
    assert_eq!(target, "/auth/login?redirect=/books");
    assert_eq!(app.route(), target);
}

#[tokio::test]
async fn own_profile_and_password_updates() {
    let api = spawn_api().await;
    let store = Arc::new(TokenStore::in_memory());
    let mut app = AdminApp::with_store(api.config(), store).unwrap();
    app.sign_in(credentials("admin", "secret")).await.unwrap();
    let session = app.session();

    let updated = session
        .update_my_profile(elidune_admin::models::auth::UpdateProfileInput {
            full_name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.org".to_string()),
            phone: None,
            address: None,
        })
        .await
        .unwrap();
    assert_eq!(updated.full_name.as_deref(), Some("Ada Lovelace"));

    session
        .change_password(elidune_admin::models::auth::ChangePasswordInput {
            current_password: "secret".to_string(),
            new_password: "stronger".to_string(),
        })
        .await
        .unwrap();

    let err = session
        .change_password(elidune_admin::models::auth::ChangePasswordInput {
            current_password: "wrong".to_string(),
            new_password: "stronger".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Current password is incorrect");
}

#[tokio::test]
async fn registration_round_trip() {
    let api = spawn_api().await;
    let app = AdminApp::with_store(api.config(), Arc::new(TokenStore::in_memory())).unwrap();

    let created = app
        .session()
        .register(elidune_admin::models::auth::RegisterInput {
            name: "reader".to_string(),
            email: Some("reader@example.org".to_string()),
            password: "secret".to_string(),
            full_name: None,
        })
        .await
        .unwrap();
    assert_eq!(created.name, "reader");
    assert_eq!(created.id, 99);
}
