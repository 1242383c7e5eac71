use axum::http::StatusCode;

use crate::common::{create_author, create_book, create_genre, id_from, TestApp};

#[tokio::test]
async fn test_book_without_genre_has_empty_genre_list() {
    let app = TestApp::new();
    let author = create_author(&app, "Jane", "Austen").await;

    let book = create_book(&app, "Emma", &author, &[]).await;

    let stored = app
        .repository
        .books
        .get(id_from(&book).parse().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert!(stored.genre.is_empty());
    let detail = app.get(&book).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains("Austen, Jane"));
}

#[tokio::test]
async fn test_book_with_repeated_genre_keys() {
    let app = TestApp::new();
    let author = create_author(&app, "Jane", "Austen").await;
    let romance = create_genre(&app, "Romance").await;
    let satire = create_genre(&app, "Satire").await;

    let book = create_book(&app, "Emma", &author, &[&romance, &satire]).await;

    let detail = app.get(&book).await;
    assert!(detail.body.contains("Romance"));
    assert!(detail.body.contains("Satire"));
}

#[tokio::test]
async fn test_failed_book_form_keeps_genre_checked() {
    let app = TestApp::new();
    let author = create_author(&app, "Jane", "Austen").await;
    let romance = create_genre(&app, "Romance").await;
    create_genre(&app, "Satire").await;

    let response = app
        .post(
            "/catalog/book/create",
            &[
                ("title", ""),
                ("author", id_from(&author)),
                ("summary", "s"),
                ("isbn", "i"),
                ("genre", id_from(&romance)),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Title is required"));
    assert!(response
        .body
        .contains(&format!("value=\"{}\" checked", id_from(&romance))));
    assert_eq!(response.body.matches(" checked").count(), 1);
}

#[tokio::test]
async fn test_delete_book_with_copies_is_refused_then_allowed() {
    let app = TestApp::new();
    let author = create_author(&app, "Jane", "Austen").await;
    let book = create_book(&app, "Emma", &author, &[]).await;
    let copy = app
        .post(
            "/catalog/bookinstance/create",
            &[("book", id_from(&book)), ("imprint", "Penguin"), ("status", "Available")],
        )
        .await
        .location
        .unwrap();

    let refused = app.post(&format!("{}/delete", book), &[]).await;
    assert_eq!(refused.status, StatusCode::OK);
    assert!(refused.body.contains("Delete the following copies"));

    app.post(&format!("{}/delete", copy), &[]).await;
    let deleted = app.post(&format!("{}/delete", book), &[]).await;
    assert_eq!(deleted.status, StatusCode::FOUND);
    assert_eq!(deleted.location.as_deref(), Some("/catalog/books"));
    assert_eq!(app.get(&book).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_book_list_shows_authors() {
    let app = TestApp::new();
    let author = create_author(&app, "Jane", "Austen").await;
    create_book(&app, "Persuasion", &author, &[]).await;
    create_book(&app, "Emma", &author, &[]).await;

    let response = app.get("/catalog/books").await;

    assert_eq!(response.status, StatusCode::OK);
    let emma = response.body.find("Emma").unwrap();
    let persuasion = response.body.find("Persuasion").unwrap();
    assert!(emma < persuasion);
    assert!(response.body.contains("(Austen, Jane)"));
}

#[tokio::test]
async fn test_delete_view_lists_every_blocking_copy() {
    let app = TestApp::new();
    let author = create_author(&app, "Jane", "Austen").await;
    let book = create_book(&app, "Emma", &author, &[]).await;
    for imprint in ["Penguin Classics", "Oxford World's Classics"] {
        let response = app
            .post(
                "/catalog/bookinstance/create",
                &[("book", id_from(&book)), ("imprint", imprint), ("status", "Available")],
            )
            .await;
        assert_eq!(response.status, StatusCode::FOUND);
    }

    let response = app.post(&format!("{}/delete", book), &[]).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Penguin Classics"));
    assert!(response.body.contains("Oxford World&#x27;s Classics"));
    assert_eq!(app.repository.book_instances.count().await.unwrap(), 2);
}
