use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use taxa::web::{self, AppState};
use taxa::{Config, Database};
use tower::ServiceExt;

fn test_app() -> Router {
    test_app_with(Config::default())
}

fn test_app_with(config: Config) -> Router {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let id: u32 = rng.gen();

    let db = Database::open_memory(&format!("api_test_db_{}", id))
        .expect("Failed to create test database");
    db.migrate().expect("Failed to run migrations");

    let state = Arc::new(AppState::new(config, db));
    web::router(state)
}

/// Router whose media dir holds one image, plus a file outside the media
/// dir that a traversal attempt would target.
fn media_fixture() -> (Router, String) {
    use rand::Rng;
    let id: u32 = rand::thread_rng().gen();

    let root = std::env::temp_dir().join(format!("taxa_media_test_{}", id));
    let media_dir = root.join("media");
    std::fs::create_dir_all(&media_dir).expect("Failed to create media dir");
    std::fs::write(media_dir.join("pixel.png"), b"not-really-a-png").unwrap();
    std::fs::write(root.join("secret.txt"), b"outside the media dir").unwrap();

    let mut config = Config::default();
    config.media.upload_dir = media_dir.to_string_lossy().to_string();
    (test_app_with(config), "secret.txt".to_string())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_healthz_responds_ok() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_tag_returns_201_with_full_entity() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/tags",
        Some(json!({ "name": "Rust", "slug": "rust" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["name"], "Rust");
    assert_eq!(body["slug"], "rust");
    assert_eq!(body["post_count"], 0);
    assert!(body["created_at"].is_string());
    assert!(body["updated_at"].is_string());
    // Tags never carry a description on the wire
    assert!(body.get("description").is_none());
}

#[tokio::test]
async fn test_create_category_carries_description() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/categories",
        Some(json!({
            "name": "Guides",
            "slug": "guides",
            "description": "Long-form how-tos"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["description"], "Long-form how-tos");
}

#[tokio::test]
async fn test_create_without_name_is_400_with_field_detail() {
    let app = test_app();

    let (status, body) = send(&app, "POST", "/tags", Some(json!({ "slug": "rust" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation");
    assert_eq!(body["detail"], "name");
}

#[tokio::test]
async fn test_duplicate_slug_is_400_conflict() {
    let app = test_app();

    let payload = json!({ "name": "Rust", "slug": "rust" });
    let (status, _) = send(&app, "POST", "/tags", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/tags",
        Some(json!({ "name": "Other", "slug": "rust" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Conflict");
    assert_eq!(body["detail"], "slug");
}

#[tokio::test]
async fn test_list_is_sorted_by_name() {
    let app = test_app();

    for (name, slug) in [("Zeta", "zeta"), ("Alpha", "alpha"), ("Mike", "mike")] {
        let (status, _) = send(
            &app,
            "POST",
            "/tags",
            Some(json!({ "name": name, "slug": slug })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/tags", None).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alpha", "Mike", "Zeta"]);
}

#[tokio::test]
async fn test_get_by_slug_and_not_found() {
    let app = test_app();

    send(
        &app,
        "POST",
        "/categories",
        Some(json!({ "name": "Guides", "slug": "guides" })),
    )
    .await;

    let (status, body) = send(&app, "GET", "/categories/guides", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], "guides");

    let (status, body) = send(&app, "GET", "/categories/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn test_update_by_id_returns_post_update_entity() {
    let app = test_app();

    let (_, created) = send(
        &app,
        "POST",
        "/tags",
        Some(json!({ "name": "Rust", "slug": "rust" })),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/tags/{}", id),
        Some(json!({ "name": "Rust Lang", "slug": "rust-lang" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], created["id"]);
    assert_eq!(body["name"], "Rust Lang");
    assert_eq!(body["created_at"], created["created_at"]);

    // Old slug no longer resolves; new one does
    let (status, _) = send(&app, "GET", "/tags/rust", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/tags/rust-lang", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_unknown_id_is_404() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "PUT",
        "/tags/9999",
        Some(json!({ "name": "Anything" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn test_update_with_non_numeric_id_is_rejected() {
    let app = test_app();

    let (status, _) = send(
        &app,
        "PUT",
        "/tags/not-an-id",
        Some(json!({ "name": "Anything" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_by_id_then_slug_is_gone() {
    let app = test_app();

    let (_, created) = send(
        &app,
        "POST",
        "/categories",
        Some(json!({ "name": "Guides", "slug": "guides" })),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(&app, "DELETE", &format!("/categories/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "category deleted");

    let (status, _) = send(&app, "GET", "/categories/guides", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unknown_id_is_404() {
    let app = test_app();

    let (status, body) = send(&app, "DELETE", "/tags/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn test_media_file_is_served_with_content_type() {
    let (app, _) = media_fixture();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/media/pixel.png")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .expect("Media responses carry a content type")
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("image/png"), "{}", content_type);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"not-really-a-png");
}

#[tokio::test]
async fn test_media_traversal_and_absent_file_are_404() {
    let (app, secret) = media_fixture();

    // Encoded traversal out of the media dir
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/media/..%2F{}", secret))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Literal traversal
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/media/../{}", secret))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/media/missing.png")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_failure_is_500_without_detail() {
    use rand::Rng;
    let id: u32 = rand::thread_rng().gen();

    // No migrations, so the tables are missing and every read fails at
    // the store layer
    let db = Database::open_memory(&format!("api_test_unmigrated_{}", id))
        .expect("Failed to create test database");
    let state = Arc::new(AppState::new(Config::default(), db));
    let app = web::router(state);

    let (status, body) = send(&app, "GET", "/tags", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal Server Error");
    // The underlying SQLite detail stays out of the response body
    assert_eq!(body["message"], "internal server error");
    assert!(body.get("detail").is_none());

    let (status, _) = send(&app, "GET", "/tags/rust", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = send(&app, "DELETE", "/tags/1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_category_and_tag_stacks_are_independent() {
    let app = test_app();

    let payload = json!({ "name": "Rust", "slug": "rust" });
    let (status, _) = send(&app, "POST", "/categories", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, "POST", "/tags", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
}
