//! Controller actions.
//!
//! Each entity service implements the same set of actions (list, detail,
//! create, delete, update; GET and POST flavours) and returns an [`Outcome`]:
//! either a page to render or a URL to redirect to. The HTTP layer only turns
//! outcomes into responses.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;

use serde_json::Value;

use crate::repository::Repository;

/// Template name plus the values it is rendered with
#[derive(Debug, Clone)]
pub struct Page {
    pub template: &'static str,
    pub context: Value,
}

/// Result of a controller action
#[derive(Debug, Clone)]
pub enum Outcome {
    Render(Page),
    Redirect(String),
}

impl Outcome {
    pub fn render(template: &'static str, context: Value) -> Self {
        Outcome::Render(Page { template, context })
    }

    pub fn redirect(url: impl Into<String>) -> Self {
        Outcome::Redirect(url.into())
    }

    pub fn page(&self) -> Option<&Page> {
        match self {
            Outcome::Render(page) => Some(page),
            Outcome::Redirect(_) => None,
        }
    }

    pub fn redirect_url(&self) -> Option<&str> {
        match self {
            Outcome::Redirect(url) => Some(url),
            Outcome::Render(_) => None,
        }
    }
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub catalog: catalog::CatalogService,
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub book_instances: book_instances::BookInstancesService,
    pub genres: genres::GenresService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            authors: authors::AuthorsService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            book_instances: book_instances::BookInstancesService::new(repository.clone()),
            genres: genres::GenresService::new(repository.clone()),
            repository,
        }
    }
}
