use axum::http::StatusCode;

use crate::common::{create_author, create_book, TestApp};

#[tokio::test]
async fn test_create_author_then_view() {
    let app = TestApp::new();

    let response = app
        .post(
            "/catalog/author/create",
            &[
                ("first_name", "Ursula"),
                ("family_name", "LeGuin"),
                ("date_of_birth", "1929-10-21"),
                ("date_of_death", "2018-01-22"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::FOUND);
    let location = response.location.unwrap();
    assert!(location.starts_with("/catalog/author/"));

    let detail = app.get(&location).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains("LeGuin, Ursula"));
    assert!(detail.body.contains("21/10/1929 - 22/01/2018"));
}

#[tokio::test]
async fn test_invalid_author_form_rerenders_with_errors() {
    let app = TestApp::new();

    let response = app
        .post("/catalog/author/create", &[("first_name", ""), ("family_name", "Banks")])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("First name is required"));
    assert!(response.body.contains("value=\"Banks\""));
    assert_eq!(app.repository.authors.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_author_is_404() {
    let app = TestApp::new();
    let response = app
        .get("/catalog/author/7d4c3a7e-2a51-4f4e-9c8e-3f1b7f6a1d20")
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.contains("Author not found"));

    let response = app.get("/catalog/author/not-an-id/update").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_author_with_books_is_refused() {
    let app = TestApp::new();
    let author = create_author(&app, "Patrick", "Rothfuss").await;
    create_book(&app, "The Name of the Wind", &author, &[]).await;
    create_book(&app, "The Slow Regard of Silent Things", &author, &[]).await;

    let response = app.post(&format!("{}/delete", author), &[]).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Delete the following books"));
    assert!(response.body.contains("The Name of the Wind"));
    assert!(response.body.contains("The Slow Regard of Silent Things"));
    assert_eq!(app.get(&author).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_missing_author_redirects_to_author_list() {
    let app = TestApp::new();
    let response = app
        .get("/catalog/author/7d4c3a7e-2a51-4f4e-9c8e-3f1b7f6a1d20/delete")
        .await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location.as_deref(), Some("/catalog/authors"));
}

#[tokio::test]
async fn test_update_author_keeps_identity() {
    let app = TestApp::new();
    let author = create_author(&app, "Iain", "Banks").await;

    let form = app.get(&format!("{}/update", author)).await;
    assert!(form.body.contains("Update Author"));
    assert!(form.body.contains("value=\"Iain\""));

    let response = app
        .post(
            &format!("{}/update", author),
            &[("first_name", "Iain"), ("family_name", "Menzies")],
        )
        .await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location.as_deref(), Some(author.as_str()));
    assert!(app.get(&author).await.body.contains("Menzies, Iain"));
    assert_eq!(app.repository.authors.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_rejected_date_markup_is_escaped() {
    let app = TestApp::new();

    let response = app
        .post(
            "/catalog/author/create",
            &[
                ("first_name", "Iain"),
                ("family_name", "Banks"),
                ("date_of_birth", "\"><script>alert(1)</script>"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Invalid date of birth"));
    assert!(!response.body.contains("<script>"));
    assert!(response
        .body
        .contains("value=\"&quot;&gt;&lt;script&gt;alert(1)&lt;&#x2F;script&gt;\""));
}
