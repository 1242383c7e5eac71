//! Repository layer for document store operations.
//!
//! Each entity gets its own repository trait. A [`Repository`] holding one
//! implementation per entity is built once at start-up and handed to the
//! services, either backed by Postgres or by the in-memory store.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        Author, AuthorFields, Book, BookFields, BookInstance, BookInstanceFields,
        BookInstanceStatus, Genre, GenreFields,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// All authors, sorted by family name
    async fn list(&self) -> AppResult<Vec<Author>>;
    async fn get(&self, id: Uuid) -> AppResult<Option<Author>>;
    async fn create(&self, fields: &AuthorFields) -> AppResult<Author>;
    /// Overwrite the document at `id`, keeping its identity
    async fn update(&self, id: Uuid, fields: &AuthorFields) -> AppResult<Option<Author>>;
    /// Returns whether a document was removed
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
    async fn count(&self) -> AppResult<i64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books, sorted by title
    async fn list(&self) -> AppResult<Vec<Book>>;
    async fn get(&self, id: Uuid) -> AppResult<Option<Book>>;
    async fn list_by_author(&self, author: Uuid) -> AppResult<Vec<Book>>;
    async fn list_by_genre(&self, genre: Uuid) -> AppResult<Vec<Book>>;
    async fn create(&self, fields: &BookFields) -> AppResult<Book>;
    async fn update(&self, id: Uuid, fields: &BookFields) -> AppResult<Option<Book>>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
    async fn count(&self) -> AppResult<i64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookInstanceRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<BookInstance>>;
    async fn get(&self, id: Uuid) -> AppResult<Option<BookInstance>>;
    async fn list_by_book(&self, book: Uuid) -> AppResult<Vec<BookInstance>>;
    async fn create(&self, fields: &BookInstanceFields) -> AppResult<BookInstance>;
    async fn update(&self, id: Uuid, fields: &BookInstanceFields) -> AppResult<Option<BookInstance>>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
    async fn count(&self) -> AppResult<i64>;
    async fn count_by_status(&self, status: BookInstanceStatus) -> AppResult<i64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreRepository: Send + Sync {
    /// All genres, sorted by name
    async fn list(&self) -> AppResult<Vec<Genre>>;
    async fn get(&self, id: Uuid) -> AppResult<Option<Genre>>;
    /// Genre with exactly this name, ignoring the document `exclude`
    async fn find_by_name(&self, name: &str, exclude: Option<Uuid>) -> AppResult<Option<Genre>>;
    async fn create(&self, fields: &GenreFields) -> AppResult<Genre>;
    async fn update(&self, id: Uuid, fields: &GenreFields) -> AppResult<Option<Genre>>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
    async fn count(&self) -> AppResult<i64>;
}

/// Main repository struct holding one store per entity
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorRepository>,
    pub books: Arc<dyn BookRepository>,
    pub book_instances: Arc<dyn BookInstanceRepository>,
    pub genres: Arc<dyn GenreRepository>,
}

impl Repository {
    /// Create a repository backed by the given Postgres pool
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(authors::PgAuthorRepository::new(pool.clone())),
            books: Arc::new(books::PgBookRepository::new(pool.clone())),
            book_instances: Arc::new(book_instances::PgBookInstanceRepository::new(pool.clone())),
            genres: Arc::new(genres::PgGenreRepository::new(pool)),
        }
    }

    /// Create a repository backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        let store = Arc::new(memory::MemoryStore::default());
        Self {
            authors: store.clone(),
            books: store.clone(),
            book_instances: store.clone(),
            genres: store,
        }
    }
}
