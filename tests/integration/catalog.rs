use axum::http::StatusCode;

use crate::common::{create_author, create_book, create_genre, TestApp};

#[tokio::test]
async fn test_root_redirects_to_catalog() {
    let app = TestApp::new();
    let response = app.get("/").await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location.as_deref(), Some("/catalog"));
}

#[tokio::test]
async fn test_home_shows_counts() {
    let app = TestApp::new();
    let author = create_author(&app, "Ada", "Palmer").await;
    let genre = create_genre(&app, "Utopia").await;
    create_book(&app, "Too Like the Lightning", &author, &[&genre]).await;

    let response = app.get("/catalog").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<strong>Books:</strong> 1"));
    assert!(response.body.contains("<strong>Authors:</strong> 1"));
    assert!(response.body.contains("<strong>Genres:</strong> 1"));
    assert!(response.body.contains("<strong>Copies:</strong> 0"));
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();
    assert_eq!(app.get("/health").await.status, StatusCode::OK);
    let ready = app.get("/ready").await;
    assert_eq!(ready.status, StatusCode::OK);
    assert!(ready.body.contains("ready"));
}
