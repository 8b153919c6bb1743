//! In-process mock of the remote library-management API
//!
//! Implements just enough of the wire contract for the console: the auth
//! endpoints, `/users/MyInfo`, and the generic resource surface for books
//! plus the listing endpoints the relation pickers load options from.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use elidune_admin::config::{ApiConfig, AppConfig};

pub struct MockState {
    pub valid_tokens: Mutex<HashSet<String>>,
    pub books: Mutex<Vec<Value>>,
    pub next_book_id: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub books_list_calls: AtomicUsize,
    pub last_books_query: Mutex<HashMap<String, String>>,
    pub fail_refresh: AtomicBool,
}

pub struct MockApi {
    pub state: Arc<MockState>,
    pub base_url: String,
}

impl MockApi {
    pub fn config(&self) -> AppConfig {
        AppConfig {
            api: ApiConfig {
                endpoint: self.base_url.clone(),
                timeout_secs: 5,
            },
            auth: Default::default(),
            logging: Default::default(),
            list: Default::default(),
        }
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Not authenticated" })),
    )
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> impl IntoResponse {
    if body["name"] == json!("admin") && body["password"] == json!("secret") {
        state.valid_tokens.lock().unwrap().insert("A1".to_string());
        (
            StatusCode::OK,
            Json(json!({ "result": { "accessToken": "A1", "refreshToken": "R1" } })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid username or password" })),
        )
    }
}

async fn refresh(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    if state.fail_refresh.load(Ordering::SeqCst) || body["refreshToken"] != json!("R1") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Refresh token expired" })),
        );
    }
    state.valid_tokens.lock().unwrap().insert("A2".to_string());
    (
        StatusCode::OK,
        Json(json!({ "result": { "accessToken": "A2", "refreshToken": "R2" } })),
    )
}

async fn logout(State(state): State<Arc<MockState>>, Json(_body): Json<Value>) -> Json<Value> {
    state.logout_calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "result": null }))
}

async fn my_info(State(state): State<Arc<MockState>>, headers: HeaderMap) -> impl IntoResponse {
    let authorized = bearer(&headers)
        .map(|token| state.valid_tokens.lock().unwrap().contains(&token))
        .unwrap_or(false);
    if !authorized {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({
            "result": {
                "id": 12,
                "name": "admin",
                "permissions": ["Book_Create", "Author_Admin", "User_GetAll"]
            }
        })),
    )
}

async fn create_user(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "result": { "id": 99, "name": body["name"], "permissions": [] } }))
}

async fn update_my_info(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let authorized = bearer(&headers)
        .map(|token| state.valid_tokens.lock().unwrap().contains(&token))
        .unwrap_or(false);
    if !authorized {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({
            "result": {
                "id": 12,
                "name": "admin",
                "fullName": body["fullName"],
                "email": body["email"],
                "permissions": ["Book_Create", "Author_Admin", "User_GetAll"]
            }
        })),
    )
}

async fn change_password(Json(body): Json<Value>) -> impl IntoResponse {
    if body["currentPassword"] == json!("secret") {
        (StatusCode::OK, Json(json!({ "result": null })))
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Current password is incorrect" })),
        )
    }
}

async fn list_books(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let authorized = bearer(&headers)
        .map(|token| state.valid_tokens.lock().unwrap().contains(&token))
        .unwrap_or(false);
    if !authorized {
        return unauthorized();
    }
    state.books_list_calls.fetch_add(1, Ordering::SeqCst);
    *state.last_books_query.lock().unwrap() = params.clone();

    let books = state.books.lock().unwrap();
    let data: Vec<Value> = books
        .iter()
        .filter(|book| match params.get("title") {
            Some(title) => book["title"].as_str().map(|t| t.contains(title.as_str())).unwrap_or(false),
            None => true,
        })
        .cloned()
        .collect();
    let total = data.len();
    (
        StatusCode::OK,
        Json(json!({ "result": { "data": data, "totalCount": total } })),
    )
}

async fn create_book(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if body["title"] == json!("dup") {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Title already exists" })),
        );
    }
    let id = state.next_book_id.fetch_add(1, Ordering::SeqCst);
    let mut book = body;
    book["id"] = json!(id);
    state.books.lock().unwrap().push(book.clone());
    (StatusCode::OK, Json(json!({ "result": book })))
}

async fn update_book(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mut books = state.books.lock().unwrap();
    match books.iter_mut().find(|book| book["id"] == json!(id)) {
        Some(book) => {
            for (key, value) in body.as_object().cloned().unwrap_or_default() {
                book[key.as_str()] = value;
            }
            (StatusCode::OK, Json(json!({ "result": book.clone() })))
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Book not found" })),
        ),
    }
}

async fn delete_book(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Json<Value> {
    state
        .books
        .lock()
        .unwrap()
        .retain(|book| book["id"] != json!(id));
    Json(json!({ "result": null }))
}

async fn batch_delete_books(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let ids: Vec<Value> = body["ids"].as_array().cloned().unwrap_or_default();
    state
        .books
        .lock()
        .unwrap()
        .retain(|book| !ids.contains(&book["id"]));
    Json(json!({ "result": null }))
}

/// Fixed listings for the relation pickers.
async fn named_listing(Path(resource): Path<String>) -> Json<Value> {
    let data = match resource.as_str() {
        "authors" => json!([{ "id": 1, "name": "Ada" }, { "id": 2, "name": "Grace" }]),
        "publishers" => json!([{ "id": 1, "name": "North Press" }]),
        "categories" => json!([{ "id": 1, "name": "Science" }, { "id": 2, "name": "History" }]),
        "roles" => json!([{ "id": 1, "name": "Librarian" }]),
        "accounts" => json!([{ "id": 12, "name": "admin" }]),
        _ => json!([]),
    };
    let total = data.as_array().map(|a| a.len()).unwrap_or(0);
    Json(json!({ "result": { "data": data, "totalCount": total } }))
}

pub async fn spawn_api() -> MockApi {
    let state = Arc::new(MockState {
        valid_tokens: Mutex::new(HashSet::new()),
        books: Mutex::new(Vec::new()),
        next_book_id: AtomicUsize::new(1),
        refresh_calls: AtomicUsize::new(0),
        logout_calls: AtomicUsize::new(0),
        books_list_calls: AtomicUsize::new(0),
        last_books_query: Mutex::new(HashMap::new()),
        fail_refresh: AtomicBool::new(false),
    });

    let app = Router::new()
        .route("/auth/Login", post(login))
        .route("/auth/Refresh", post(refresh))
        .route("/auth/Logout", post(logout))
        .route("/users/MyInfo", get(my_info))
        .route("/users/Create", post(create_user))
        .route("/users/UpdateMyInfo", post(update_my_info))
        .route("/users/ChangePassword", post(change_password))
        .route("/books", get(list_books).post(create_book))
        .route("/books/:id", put(update_book))
        .route("/books/:id", delete(delete_book))
        .route("/books/batchDelete", post(batch_delete_books))
        .route("/:resource", get(named_listing))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock API");
    let addr: SocketAddr = listener.local_addr().expect("mock API addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock API");
    });

    MockApi {
        state,
        base_url: format!("http://{}", addr),
    }
}
