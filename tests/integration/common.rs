//! Shared helpers for the HTTP tests

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use local_library::{
    api, config::AppConfig, repository::Repository, services::Services, views::Views, AppState,
};

const TEMPLATES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*.html");

pub struct TestApp {
    pub repository: Repository,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_repository(Repository::in_memory())
    }

    pub fn with_repository(repository: Repository) -> Self {
        let views = Views::load(TEMPLATES).expect("templates should compile");
        let state = AppState {
            config: Arc::new(AppConfig::default()),
            services: Arc::new(Services::new(repository.clone())),
            views: Arc::new(views),
        };
        Self {
            repository,
            router: api::router(state),
        }
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router should not fail");
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|value| value.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    /// POST a urlencoded form; repeated keys are sent in order
    pub async fn post(&self, uri: &str, pairs: &[(&str, &str)]) -> TestResponse {
        let body = serde_urlencoded::to_string(pairs).unwrap();
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }
}

/// Identifier at the end of a detail URL
pub fn id_from(location: &str) -> &str {
    location.rsplit('/').next().unwrap()
}

pub async fn create_author(app: &TestApp, first: &str, family: &str) -> String {
    let response = app
        .post(
            "/catalog/author/create",
            &[("first_name", first), ("family_name", family)],
        )
        .await;
    assert_eq!(response.status, StatusCode::FOUND);
    response.location.unwrap()
}

pub async fn create_genre(app: &TestApp, name: &str) -> String {
    let response = app.post("/catalog/genre/create", &[("name", name)]).await;
    assert_eq!(response.status, StatusCode::FOUND);
    response.location.unwrap()
}

pub async fn create_book(app: &TestApp, title: &str, author_url: &str, genre_urls: &[&str]) -> String {
    let mut pairs = vec![
        ("title", title),
        ("author", id_from(author_url)),
        ("summary", "A summary"),
        ("isbn", "9780000000000"),
    ];
    pairs.extend(genre_urls.iter().map(|url| ("genre", id_from(url))));
    let response = app.post("/catalog/book/create", &pairs).await;
    assert_eq!(response.status, StatusCode::FOUND);
    response.location.unwrap()
}
