//! Catalog home page

use serde::Serialize;
use serde_json::json;

use crate::{
    error::AppResult,
    models::BookInstanceStatus,
    repository::Repository,
    resolver::FanOut,
};

use super::Outcome;

const COUNTS_UNAVAILABLE: &str = "The catalog is temporarily unavailable.";

/// Record counts shown on the home page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogCounts {
    pub book_count: i64,
    pub book_instance_count: i64,
    pub book_instance_available_count: i64,
    pub author_count: i64,
    pub genre_count: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        let mut resolved = FanOut::new()
            .task("book_count", self.repository.books.count())
            .task("book_instance_count", self.repository.book_instances.count())
            .task(
                "book_instance_available_count",
                self.repository
                    .book_instances
                    .count_by_status(BookInstanceStatus::Available),
            )
            .task("author_count", self.repository.authors.count())
            .task("genre_count", self.repository.genres.count())
            .run()
            .await?;

        Ok(CatalogCounts {
            book_count: resolved.take("book_count")?,
            book_instance_count: resolved.take("book_instance_count")?,
            book_instance_available_count: resolved.take("book_instance_available_count")?,
            author_count: resolved.take("author_count")?,
            genre_count: resolved.take("genre_count")?,
        })
    }

    /// Home page. A store failure is shown on the page rather than failing it.
    pub async fn index(&self) -> AppResult<Outcome> {
        let context = match self.counts().await {
            Ok(counts) => json!({
                "title": "Local Library Home",
                "data": counts,
                "error": null,
            }),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load catalog counts");
                json!({
                    "title": "Local Library Home",
                    "data": null,
                    "error": COUNTS_UNAVAILABLE,
                })
            }
        };
        Ok(Outcome::render("index.html", context))
    }
}
