//! End-to-end behaviour of the client against an in-process backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use api::{auth, images, ApiClient, ApiError, ApiResponse, ClientConfig, Gallery, UploadForm};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use store::{MemoryStore, TokenStore};

#[derive(Default)]
struct Backend {
    /// `(path, Authorization header)` for every request that reached a handler.
    seen: Mutex<Vec<(String, Option<String>)>>,
    bad_listing: AtomicBool,
    html_listing: AtomicBool,
    blank_analysis: AtomicBool,
}

type Shared = Arc<Backend>;

impl Backend {
    fn record(&self, path: &str, headers: &HeaderMap) {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.seen.lock().unwrap().push((path.to_string(), auth));
    }

    fn auth_for(&self, path: &str) -> Option<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(p, _)| p == path)
            .and_then(|(_, auth)| auth.clone())
    }
}

fn wire_image(id: i64, filename: Option<&str>, description: Option<&str>) -> Value {
    json!({
        "id": id,
        "filename": "stored.png",
        "original_filename": filename,
        "s3_url": "http://x/y.png",
        "content_type": "image/png",
        "size": 4,
        "ai_description": description,
        "user_id": 9,
        "uploaded_at": "2024-01-01"
    })
}

fn alice() -> Value {
    json!({ "id": 1, "username": "alice", "email": "alice@example.com" })
}

async fn login(State(state): State<Shared>, headers: HeaderMap, Json(form): Json<Value>) -> Response {
    state.record("/auth/login", &headers);
    if form == json!({ "username": "alice", "password": "pw" }) {
        Json(json!({ "access_token": "tok1", "user": alice() })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid username or password" })),
        )
            .into_response()
    }
}

async fn register(State(state): State<Shared>, headers: HeaderMap, Json(form): Json<Value>) -> Response {
    state.record("/auth/register", &headers);
    if form.get("email").is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing required fields" })),
        )
            .into_response();
    }
    (
        StatusCode::CREATED,
        Json(json!({ "access_token": "tok-new", "user": alice() })),
    )
        .into_response()
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.record("/auth/me", &headers);
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some("Bearer tok1") => Json(alice()).into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "msg": "Missing Authorization Header" })),
        )
            .into_response(),
    }
}

async fn list_images(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.record("/images", &headers);
    if state.html_listing.load(Ordering::SeqCst) {
        return (
            [(header::CONTENT_TYPE, "text/html")],
            "<html>maintenance</html>",
        )
            .into_response();
    }
    if state.bad_listing.load(Ordering::SeqCst) {
        return Json(json!({ "items": [] })).into_response();
    }
    Json(json!({
        "images": [{ "id": 5, "s3_url": "http://x/y.png", "user_id": 9, "uploaded_at": "2024-01-01" }]
    }))
    .into_response()
}

async fn upload_image(State(state): State<Shared>, headers: HeaderMap, body: Bytes) -> Response {
    state.record("/images:post", &headers);
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let body = String::from_utf8_lossy(&body);

    let complete = content_type.starts_with("multipart/form-data")
        && body.contains(r#"name="image"; filename="cat.png""#)
        && body.contains("Content-Type: image/png")
        && body.contains(r#"name="title""#)
        && body.contains("My cat")
        && body.contains(r#"name="description""#);
    if !complete {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "No file part" }))).into_response();
    }
    let analyzed = body.contains(r#"name="analyze""#).then_some("A cat");
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Image uploaded successfully",
            "image": wire_image(7, Some("cat.png"), analyzed)
        })),
    )
        .into_response()
}

async fn get_image(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    state.record(&format!("/images/{id}"), &headers);
    if id == "5" {
        Json(wire_image(5, Some("beach.jpg"), None)).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "error": "Image not found" }))).into_response()
    }
}

async fn delete_image(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    state.record(&format!("/images/{id}:delete"), &headers);
    Json(json!({ "message": "Image deleted successfully" })).into_response()
}

async fn analyze_image(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    state.record(&format!("/images/{id}/analyze"), &headers);
    let description = match body.get("prompt").and_then(Value::as_str) {
        Some(prompt) => format!("Answer to: {prompt}"),
        None => "A default description".to_string(),
    };
    let id: i64 = id.parse().unwrap_or_default();
    if state.blank_analysis.load(Ordering::SeqCst) {
        return Json(json!({
            "message": "Image analyzed successfully",
            "image": wire_image(id, None, None)
        }))
        .into_response();
    }
    Json(json!({
        "message": "Image analyzed successfully",
        "image": wire_image(id, None, Some(description.as_str()))
    }))
    .into_response()
}

async fn spawn_backend() -> (String, Shared) {
    let state = Shared::default();
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/me", get(me))
        .route("/api/images", get(list_images).post(upload_image))
        .route("/api/images/{id}", get(get_image).delete(delete_image))
        .route("/api/images/{id}/analyze", post(analyze_image))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api", addr), state)
}

async fn setup(store: MemoryStore) -> (ApiClient<MemoryStore>, Shared) {
    let (base, state) = spawn_backend().await;
    let client = ApiClient::new(&ClientConfig::default().with_base_url(base), store).unwrap();
    (client, state)
}

#[tokio::test]
async fn test_login_then_list_carries_bearer_token() {
    let store = MemoryStore::new();
    let (client, backend) = setup(store.clone()).await;

    let session = auth::login(&client, "alice", "pw").await.unwrap();
    assert_eq!(session.access_token, "tok1");
    assert_eq!(session.user.id, "1");
    assert_eq!(store.get().as_deref(), Some("tok1"));
    assert_eq!(backend.auth_for("/auth/login"), None);

    images::list(&client).await.unwrap();
    assert_eq!(backend.auth_for("/images").as_deref(), Some("Bearer tok1"));
}

#[tokio::test]
async fn test_listing_is_mapped_to_canonical_form() {
    let (client, _backend) = setup(MemoryStore::with_token("tok1")).await;

    let listed = images::list(&client).await.unwrap();
    assert_eq!(
        serde_json::to_value(&listed).unwrap(),
        json!([{
            "id": "5",
            "url": "http://x/y.png",
            "title": "Untitled",
            "description": "",
            "userId": "9",
            "createdAt": "2024-01-01"
        }])
    );

    // The generic entry point sees the mapped array, not the wrapper object.
    let response = client
        .get("/images", api::ResponseShape::Passthrough)
        .await
        .unwrap();
    assert_eq!(response, ApiResponse::Images(listed));
}

#[tokio::test]
async fn test_unauthorized_current_user() {
    let (client, backend) = setup(MemoryStore::new()).await;

    let err = auth::fetch_current_user(&client).await.unwrap_err();
    match &err {
        ApiError::Status { status, message, body } => {
            assert_eq!(*status, 401);
            assert_eq!(message, "Missing Authorization Header");
            assert_eq!(body.as_ref().unwrap()["msg"], "Missing Authorization Header");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_unauthorized());
    assert_eq!(backend.auth_for("/auth/me"), None);

    assert!(auth::current_user(&client).await.is_none());
}

#[tokio::test]
async fn test_current_user_with_token() {
    let (client, _backend) = setup(MemoryStore::with_token("tok1")).await;
    let user = auth::current_user(&client).await.unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.id, "1");
}

#[tokio::test]
async fn test_failed_login_keeps_previous_token() {
    let store = MemoryStore::with_token("old");
    let (client, _backend) = setup(store.clone()).await;

    let err = auth::login(&client, "alice", "wrong").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "server returned 401: Invalid username or password");
    assert_eq!(store.get().as_deref(), Some("old"));
}

#[tokio::test]
async fn test_register_and_logout() {
    let store = MemoryStore::new();
    let (client, backend) = setup(store.clone()).await;

    let session = auth::register(&client, "alice", "pw", "alice@example.com")
        .await
        .unwrap();
    assert_eq!(session.access_token, "tok-new");
    assert_eq!(store.get().as_deref(), Some("tok-new"));

    auth::logout(&client);
    assert!(store.get().is_none());

    images::list(&client).await.unwrap();
    assert_eq!(backend.auth_for("/images"), None);
}

#[tokio::test]
async fn test_get_image_and_not_found() {
    let (client, _backend) = setup(MemoryStore::with_token("tok1")).await;

    let image = images::get(&client, "5").await.unwrap();
    assert_eq!(image.title, "beach.jpg");
    assert_eq!(image.description, "");

    let err = images::get(&client, "6").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "server returned 404: Image not found");
}

#[tokio::test]
async fn test_upload_sends_multipart() {
    let (client, backend) = setup(MemoryStore::with_token("tok1")).await;

    let form = UploadForm::new("cat.png", b"\x89PNG".to_vec())
        .with_title("My cat")
        .with_description("On the sofa");
    let image = images::upload(&client, form).await.unwrap();

    assert_eq!(image.id, "7");
    assert_eq!(image.title, "cat.png");
    assert_eq!(image.description, "");
    assert_eq!(backend.auth_for("/images:post").as_deref(), Some("Bearer tok1"));

    let form = UploadForm::new("cat.png", b"\x89PNG".to_vec())
        .with_title("My cat")
        .with_analysis(None);
    let image = images::upload(&client, form).await.unwrap();
    assert_eq!(image.description, "A cat");
}

#[tokio::test]
async fn test_analyze_passes_prompt() {
    let (client, backend) = setup(MemoryStore::with_token("tok1")).await;

    let image = images::analyze(&client, "5", Some("What is in the sky?"))
        .await
        .unwrap();
    assert_eq!(image.id, "5");
    assert_eq!(image.description, "Answer to: What is in the sky?");
    assert_eq!(
        backend.auth_for("/images/5/analyze").as_deref(),
        Some("Bearer tok1")
    );

    let image = images::analyze(&client, "5", Some("   ")).await.unwrap();
    assert_eq!(image.description, "A default description");
}

#[tokio::test]
async fn test_delete_acknowledgment_passes_through() {
    let (client, backend) = setup(MemoryStore::with_token("tok1")).await;

    let response = client.delete("/images/5").await.unwrap();
    assert_eq!(
        response,
        ApiResponse::Json(json!({ "message": "Image deleted successfully" }))
    );
    assert_eq!(
        backend.auth_for("/images/5:delete").as_deref(),
        Some("Bearer tok1")
    );
}

#[tokio::test]
async fn test_gallery_lifecycle() {
    let (client, backend) = setup(MemoryStore::with_token("tok1")).await;
    let mut gallery = Gallery::new();

    gallery.refresh(&client).await.unwrap();
    assert_eq!(gallery.images().len(), 1);

    gallery.analyze(&client, "5", Some("Describe it")).await.unwrap();
    assert_eq!(gallery.find("5").unwrap().description, "Answer to: Describe it");

    gallery.delete(&client, "5").await.unwrap();
    assert!(gallery.images().is_empty());

    // Unrecognised listing degrades to an empty gallery instead of an error.
    gallery.refresh(&client).await.unwrap();
    assert_eq!(gallery.images().len(), 1);
    backend.bad_listing.store(true, Ordering::SeqCst);
    gallery.refresh(&client).await.unwrap();
    assert!(gallery.images().is_empty());

    // A maintenance page instead of JSON degrades the same way.
    backend.bad_listing.store(false, Ordering::SeqCst);
    gallery.refresh(&client).await.unwrap();
    assert_eq!(gallery.images().len(), 1);
    backend.html_listing.store(true, Ordering::SeqCst);
    gallery.refresh(&client).await.unwrap();
    assert!(gallery.images().is_empty());
}

#[tokio::test]
async fn test_analysis_without_description_keeps_existing_text() {
    let (client, backend) = setup(MemoryStore::with_token("tok1")).await;
    let mut gallery = Gallery::new();
    gallery.refresh(&client).await.unwrap();
    gallery.analyze(&client, "5", Some("Describe it")).await.unwrap();

    backend.blank_analysis.store(true, Ordering::SeqCst);
    let err = gallery.analyze(&client, "5", None).await.unwrap_err();
    assert!(matches!(err, ApiError::UnexpectedShape(_)), "{err:?}");
    assert_eq!(gallery.find("5").unwrap().description, "Answer to: Describe it");

    let err = images::analyze(&client, "5", None).await.unwrap_err();
    assert!(matches!(err, ApiError::UnexpectedShape(_)));
}

#[tokio::test]
async fn test_gallery_keeps_list_on_transport_error() {
    let (client, _backend) = setup(MemoryStore::with_token("tok1")).await;
    let mut gallery = Gallery::new();
    gallery.refresh(&client).await.unwrap();

    let bad = ApiClient::new(
        &ClientConfig::default().with_base_url("http://127.0.0.1:9/api"),
        MemoryStore::new(),
    )
    .unwrap();
    let err = gallery.refresh(&bad).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(gallery.images().len(), 1);
}
