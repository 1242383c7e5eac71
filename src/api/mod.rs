//! HTTP handlers and routing for the catalog pages

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;
pub mod health;

use axum::{
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{validation::FormData, AppState};

/// Collect submitted pairs, keeping repeated keys in order
pub(crate) fn form_data(pairs: Vec<(String, String)>) -> FormData {
    pairs.into_iter().collect()
}

async fn home() -> impl IntoResponse {
    (StatusCode::FOUND, [(LOCATION, "/catalog")])
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let catalog = Router::new()
        .route("/", get(catalog::index))
        // Books
        .route("/books", get(books::list))
        .route("/book/create", get(books::create_form).post(books::create))
        .route("/book/:id", get(books::detail))
        .route("/book/:id/delete", get(books::delete_form).post(books::delete))
        .route("/book/:id/update", get(books::update_form).post(books::update))
        // Authors
        .route("/authors", get(authors::list))
        .route("/author/create", get(authors::create_form).post(authors::create))
        .route("/author/:id", get(authors::detail))
        .route("/author/:id/delete", get(authors::delete_form).post(authors::delete))
        .route("/author/:id/update", get(authors::update_form).post(authors::update))
        // Genres
        .route("/genres", get(genres::list))
        .route("/genre/create", get(genres::create_form).post(genres::create))
        .route("/genre/:id", get(genres::detail))
        .route("/genre/:id/delete", get(genres::delete_form).post(genres::delete))
        .route("/genre/:id/update", get(genres::update_form).post(genres::update))
        // Book copies
        .route("/bookinstances", get(book_instances::list))
        .route(
            "/bookinstance/create",
            get(book_instances::create_form).post(book_instances::create),
        )
        .route("/bookinstance/:id", get(book_instances::detail))
        .route(
            "/bookinstance/:id/delete",
            get(book_instances::delete_form).post(book_instances::delete),
        )
        .route(
            "/bookinstance/:id/update",
            get(book_instances::update_form).post(book_instances::update),
        );

    Router::new()
        .route("/", get(home))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/catalog", catalog)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
