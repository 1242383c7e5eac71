use axum::http::StatusCode;

use crate::common::{create_author, create_book, id_from, TestApp};

#[tokio::test]
async fn test_create_copy_and_view() {
    let app = TestApp::new();
    let author = create_author(&app, "Ted", "Chiang").await;
    let book = create_book(&app, "Exhalation", &author, &[]).await;

    let response = app
        .post(
            "/catalog/bookinstance/create",
            &[
                ("book", id_from(&book)),
                ("imprint", "Knopf, 2019"),
                ("status", "Loaned"),
                ("due_back", "2024-03-02"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::FOUND);
    let copy = response.location.unwrap();
    assert!(copy.starts_with("/catalog/bookinstance/"));

    let detail = app.get(&copy).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains("Exhalation"));
    assert!(detail.body.contains("2nd Mar 2024"));
}

#[tokio::test]
async fn test_invalid_status_is_reported() {
    let app = TestApp::new();
    let author = create_author(&app, "Ted", "Chiang").await;
    let book = create_book(&app, "Exhalation", &author, &[]).await;

    let response = app
        .post(
            "/catalog/bookinstance/create",
            &[("book", id_from(&book)), ("imprint", "Knopf"), ("status", "Lost")],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response
        .body
        .contains("Status is not valid, valid statuses: Available, Maintenance, Loaned, Reserved"));
}

#[tokio::test]
async fn test_create_form_defaults_to_maintenance() {
    let app = TestApp::new();
    let response = app.get("/catalog/bookinstance/create").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response
        .body
        .contains("<option value=\"Maintenance\" selected>Maintenance</option>"));
}

#[tokio::test]
async fn test_delete_missing_copy_redirects_to_copy_list() {
    let app = TestApp::new();
    let response = app
        .post("/catalog/bookinstance/7d4c3a7e-2a51-4f4e-9c8e-3f1b7f6a1d20/delete", &[])
        .await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location.as_deref(), Some("/catalog/bookinstances"));
}

#[tokio::test]
async fn test_rejected_due_date_markup_is_escaped() {
    let app = TestApp::new();
    let author = create_author(&app, "Ted", "Chiang").await;
    let book = create_book(&app, "Exhalation", &author, &[]).await;

    let response = app
        .post(
            "/catalog/bookinstance/create",
            &[
                ("book", id_from(&book)),
                ("imprint", "Knopf"),
                ("status", "Available"),
                ("due_back", "\"><img src=x onerror=alert(1)>"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Invalid due date"));
    assert!(!response.body.contains("<img"));
    assert!(response
        .body
        .contains("value=\"&quot;&gt;&lt;img src=x onerror=alert(1)&gt;\""));
}

#[tokio::test]
async fn test_copy_of_unknown_book_is_rejected() {
    let app = TestApp::new();

    let response = app
        .post(
            "/catalog/bookinstance/create",
            &[
                ("book", "7d4c3a7e-2a51-4f4e-9c8e-3f1b7f6a1d20"),
                ("imprint", "Knopf"),
                ("status", "Available"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Book is not valid"));
    assert_eq!(app.repository.book_instances.count().await.unwrap(), 0);
}
