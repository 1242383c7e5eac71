//! In-memory document store.
//!
//! Implements every repository trait over a single lock-protected set of
//! collections. Used by the test suites and by `storage.backend = "memory"`.

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AuthorRepository, BookInstanceRepository, BookRepository, GenreRepository};
use crate::{
    error::AppResult,
    models::{
        Author, AuthorFields, Book, BookFields, BookInstance, BookInstanceFields,
        BookInstanceStatus, Genre, GenreFields,
    },
};

#[derive(Default)]
struct Collections {
    authors: IndexMap<Uuid, Author>,
    books: IndexMap<Uuid, Book>,
    book_instances: IndexMap<Uuid, BookInstance>,
    genres: IndexMap<Uuid, Genre>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn count(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

#[async_trait]
impl AuthorRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Author>> {
        let inner = self.inner.read().await;
        let mut authors: Vec<Author> = inner.authors.values().cloned().collect();
        authors.sort_by(|a, b| {
            (&a.family_name, &a.first_name).cmp(&(&b.family_name, &b.first_name))
        });
        Ok(authors)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(self.inner.read().await.authors.get(&id).cloned())
    }

    async fn create(&self, fields: &AuthorFields) -> AppResult<Author> {
        let author = Author::from_fields(Uuid::new_v4(), fields.clone());
        self.inner
            .write()
            .await
            .authors
            .insert(author.id, author.clone());
        Ok(author)
    }

    async fn update(&self, id: Uuid, fields: &AuthorFields) -> AppResult<Option<Author>> {
        let mut inner = self.inner.write().await;
        Ok(inner.authors.get_mut(&id).map(|slot| {
            *slot = Author::from_fields(id, fields.clone());
            slot.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.inner.write().await.authors.shift_remove(&id).is_some())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(count(self.inner.read().await.authors.len()))
    }
}

#[async_trait]
impl BookRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Book>> {
        let inner = self.inner.read().await;
        let mut books: Vec<Book> = inner.books.values().cloned().collect();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.inner.read().await.books.get(&id).cloned())
    }

    async fn list_by_author(&self, author: Uuid) -> AppResult<Vec<Book>> {
        let mut books = BookRepository::list(self).await?;
        books.retain(|b| b.author == author);
        Ok(books)
    }

    async fn list_by_genre(&self, genre: Uuid) -> AppResult<Vec<Book>> {
        let mut books = BookRepository::list(self).await?;
        books.retain(|b| b.genre.contains(&genre));
        Ok(books)
    }

    async fn create(&self, fields: &BookFields) -> AppResult<Book> {
        let book = Book::from_fields(Uuid::new_v4(), fields.clone());
        self.inner.write().await.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update(&self, id: Uuid, fields: &BookFields) -> AppResult<Option<Book>> {
        let mut inner = self.inner.write().await;
        Ok(inner.books.get_mut(&id).map(|slot| {
            *slot = Book::from_fields(id, fields.clone());
            slot.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.inner.write().await.books.shift_remove(&id).is_some())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(count(self.inner.read().await.books.len()))
    }
}

#[async_trait]
impl BookInstanceRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<BookInstance>> {
        let inner = self.inner.read().await;
        let mut instances: Vec<BookInstance> = inner.book_instances.values().cloned().collect();
        instances.sort_by(|a, b| (a.due_back, &a.imprint).cmp(&(b.due_back, &b.imprint)));
        Ok(instances)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        Ok(self.inner.read().await.book_instances.get(&id).cloned())
    }

    async fn list_by_book(&self, book: Uuid) -> AppResult<Vec<BookInstance>> {
        let mut instances = BookInstanceRepository::list(self).await?;
        instances.retain(|i| i.book == book);
        Ok(instances)
    }

    async fn create(&self, fields: &BookInstanceFields) -> AppResult<BookInstance> {
        let instance = BookInstance::from_fields(Uuid::new_v4(), fields.clone());
        self.inner
            .write()
            .await
            .book_instances
            .insert(instance.id, instance.clone());
        Ok(instance)
    }

    async fn update(&self, id: Uuid, fields: &BookInstanceFields) -> AppResult<Option<BookInstance>> {
        let mut inner = self.inner.write().await;
        Ok(inner.book_instances.get_mut(&id).map(|slot| {
            *slot = BookInstance::from_fields(id, fields.clone());
            slot.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.inner.write().await.book_instances.shift_remove(&id).is_some())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(count(self.inner.read().await.book_instances.len()))
    }

    async fn count_by_status(&self, status: BookInstanceStatus) -> AppResult<i64> {
        let inner = self.inner.read().await;
        Ok(count(
            inner
                .book_instances
                .values()
                .filter(|i| i.status == status)
                .count(),
        ))
    }
}

#[async_trait]
impl GenreRepository for MemoryStore {
    async fn list(&self) -> AppResult<Vec<Genre>> {
        let inner = self.inner.read().await;
        let mut genres: Vec<Genre> = inner.genres.values().cloned().collect();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Genre>> {
        Ok(self.inner.read().await.genres.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str, exclude: Option<Uuid>) -> AppResult<Option<Genre>> {
        let inner = self.inner.read().await;
        Ok(inner
            .genres
            .values()
            .find(|g| g.name == name && Some(g.id) != exclude)
            .cloned())
    }

    async fn create(&self, fields: &GenreFields) -> AppResult<Genre> {
        let genre = Genre {
            id: Uuid::new_v4(),
            name: fields.name.clone(),
        };
        self.inner.write().await.genres.insert(genre.id, genre.clone());
        Ok(genre)
    }

    async fn update(&self, id: Uuid, fields: &GenreFields) -> AppResult<Option<Genre>> {
        let mut inner = self.inner.write().await;
        Ok(inner.genres.get_mut(&id).map(|slot| {
            slot.name = fields.name.clone();
            slot.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.inner.write().await.genres.shift_remove(&id).is_some())
    }

    async fn count(&self) -> AppResult<i64> {
        Ok(count(self.inner.read().await.genres.len()))
    }
}
