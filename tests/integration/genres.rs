use axum::http::StatusCode;

use crate::common::{create_author, create_book, create_genre, TestApp};

#[tokio::test]
async fn test_duplicate_genre_create_redirects_to_existing() {
    let app = TestApp::new();
    let fantasy = create_genre(&app, "Fantasy").await;

    let response = app.post("/catalog/genre/create", &[("name", "Fantasy")]).await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location, Some(fantasy));
    assert_eq!(app.repository.genres.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_rename_onto_existing_genre_fails() {
    let app = TestApp::new();
    create_genre(&app, "Fantasy").await;
    let horror = create_genre(&app, "Horror").await;

    let response = app
        .post(&format!("{}/update", horror), &[("name", "Fantasy")])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Genre with this name already exists"));
    assert!(app.get(&horror).await.body.contains("Genre: Horror"));
}

#[tokio::test]
async fn test_genre_name_is_escaped_once() {
    let app = TestApp::new();
    let genre = create_genre(&app, "<Sci-Fi>").await;

    let detail = app.get(&genre).await;

    assert!(detail.body.contains("Genre: &lt;Sci-Fi&gt;"));
    assert!(!detail.body.contains("&amp;lt;"));
}

#[tokio::test]
async fn test_delete_genre_in_use_is_refused() {
    let app = TestApp::new();
    let author = create_author(&app, "Mary", "Oliver").await;
    let poetry = create_genre(&app, "Poetry").await;
    create_book(&app, "Devotions", &author, &[&poetry]).await;

    let response = app.post(&format!("{}/delete", poetry), &[]).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Delete the following books"));
    assert_eq!(app.get(&poetry).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_genre_list_is_sorted() {
    let app = TestApp::new();
    create_genre(&app, "Poetry").await;
    create_genre(&app, "Fantasy").await;

    let body = app.get("/catalog/genres").await.body;

    assert!(body.find("Fantasy").unwrap() < body.find("Poetry").unwrap());
}
