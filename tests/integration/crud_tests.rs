//! CRUD engine tests against the mock API

use std::sync::atomic::Ordering;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio_test::assert_ok;

use elidune_admin::auth::TokenStore;
use elidune_admin::crud::{CrudPage, Dialog, FormValues, NoticeKind};
use elidune_admin::models::auth::LoginInput;
use elidune_admin::nav::routes;
use elidune_admin::{AdminApp, AppError};

use crate::support::{spawn_api, MockApi};

async fn signed_in_app(api: &MockApi) -> AdminApp {
    let mut app = AdminApp::with_store(api.config(), Arc::new(TokenStore::in_memory())).unwrap();
    app.sign_in(LoginInput {
        name: "admin".to_string(),
        password: "secret".to_string(),
    })
    .await
    .unwrap();
    app
}

async fn books_page(app: &AdminApp) -> CrudPage {
    app.open_page(routes::BOOKS)
        .await
        .unwrap()
        .expect("books page configured")
}

fn fill_book(page: &CrudPage, title: &str) {
    page.set_field("title", json!(title));
    page.set_field("price", json!(12.5));
    page.set_field("publisherId", json!(1));
    page.set_field("authorIds", json!([1, 2]));
    page.set_field("categoryIds", json!([1]));
}

#[tokio::test]
async fn create_list_delete_round_trip() {
    let api = spawn_api().await;
    let app = signed_in_app(&api).await;
    let page = books_page(&app).await;

    assert_ok!(page.load().await);
    assert!(page.rows().is_empty());
    assert_eq!(page.total(), 0);

    page.open_create();
    fill_book(&page, "Dune");
    assert_ok!(page.submit().await);

    assert_eq!(page.dialog(), Dialog::None);
    assert_eq!(page.take_notice().unwrap().kind, NoticeKind::Success);
    let rows = page.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("title"), Some(&json!("Dune")));
    let id = rows[0].get("id").and_then(Value::as_i64).unwrap();

    page.request_delete(id);
    page.confirm_delete().await.unwrap();
    assert!(page.rows().is_empty());
    assert_eq!(page.total(), 0);
}

#[tokio::test]
async fn update_round_trip() {
    let api = spawn_api().await;
    let app = signed_in_app(&api).await;
    let page = books_page(&app).await;

    page.open_create();
    fill_book(&page, "Dune");
    page.submit().await.unwrap();
    let id = page.rows()[0].get("id").and_then(Value::as_i64).unwrap();

    page.open_update(id);
    page.set_field("title", json!("Dune Messiah"));
    page.submit().await.unwrap();

    assert_eq!(page.rows()[0].get("title"), Some(&json!("Dune Messiah")));
}

#[tokio::test]
async fn submitted_filter_parameters_reach_the_server_verbatim() {
    let api = spawn_api().await;
    let app = signed_in_app(&api).await;
    let page = books_page(&app).await;

    let mut filter = FormValues::new();
    filter.insert("title".to_string(), json!("Alice"));
    page.apply_filter(filter).await.unwrap();

    let query = api.state.last_books_query.lock().unwrap().clone();
    assert_eq!(query.get("title").map(String::as_str), Some("Alice"));
    assert_eq!(query.get("page").map(String::as_str), Some("1"));
    assert_eq!(query.get("pageSize").map(String::as_str), Some("10"));
}

#[tokio::test]
async fn server_rejection_surfaces_verbatim_and_keeps_the_dialog() {
    let api = spawn_api().await;
    let app = signed_in_app(&api).await;
    let page = books_page(&app).await;

    page.open_create();
    fill_book(&page, "dup");
    page.submit().await.unwrap();

    assert!(matches!(page.dialog(), Dialog::Create { .. }));
    let notice = page.take_notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.message, "Title already exists");
}

#[tokio::test]
async fn batch_delete_removes_the_selection() {
    let api = spawn_api().await;
    {
        let mut books = api.state.books.lock().unwrap();
        books.push(json!({ "id": 1, "title": "Dune" }));
        books.push(json!({ "id": 2, "title": "Hyperion" }));
        api.state.next_book_id.store(3, Ordering::SeqCst);
    }
    let app = signed_in_app(&api).await;
    let page = books_page(&app).await;

    assert_ok!(page.load().await);
    assert_eq!(page.rows().len(), 2);

    page.toggle_select(1);
    page.toggle_select(2);
    page.request_delete_selected();
    page.confirm_delete().await.unwrap();

    assert!(page.rows().is_empty());
    assert!(page.selection().is_empty());
}

#[tokio::test]
async fn protected_listing_fails_locally_without_a_session() {
    let api = spawn_api().await;
    let app = AdminApp::with_store(api.config(), Arc::new(TokenStore::in_memory())).unwrap();

    // The page cannot even be built: its option lists are protected too.
    let err = app.open_page(routes::BOOKS).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated));
    assert_eq!(api.state.books_list_calls.load(Ordering::SeqCst), 0);
}
