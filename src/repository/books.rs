//! Books repository (Postgres).
//!
//! Genre references are kept in a `UUID[]` column, so a book is still a single
//! row and "books of a genre" is an `ANY` lookup.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::BookRepository;
use crate::{
    error::AppResult,
    models::{Book, BookFields},
};

const COLUMNS: &str = "id, title, author, summary, isbn, genre";

#[derive(Clone)]
pub struct PgBookRepository {
    pool: Pool<Postgres>,
}

impl PgBookRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn list(&self) -> AppResult<Vec<Book>> {
        let query = format!("SELECT {} FROM books ORDER BY title", COLUMNS);
        let rows = sqlx::query_as::<_, Book>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Book>> {
        let query = format!("SELECT {} FROM books WHERE id = $1", COLUMNS);
        let row = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_by_author(&self, author: Uuid) -> AppResult<Vec<Book>> {
        let query = format!("SELECT {} FROM books WHERE author = $1 ORDER BY title", COLUMNS);
        let rows = sqlx::query_as::<_, Book>(&query)
            .bind(author)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_by_genre(&self, genre: Uuid) -> AppResult<Vec<Book>> {
        let query = format!("SELECT {} FROM books WHERE $1 = ANY(genre) ORDER BY title", COLUMNS);
        let rows = sqlx::query_as::<_, Book>(&query)
            .bind(genre)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create(&self, fields: &BookFields) -> AppResult<Book> {
        let query = format!(
            r#"
            INSERT INTO books (id, title, author, summary, isbn, genre)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            COLUMNS
        );
        let row = sqlx::query_as::<_, Book>(&query)
            .bind(Uuid::new_v4())
            .bind(&fields.title)
            .bind(fields.author)
            .bind(&fields.summary)
            .bind(&fields.isbn)
            .bind(fields.genre.as_slice())
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, fields: &BookFields) -> AppResult<Option<Book>> {
        let query = format!(
            r#"
            UPDATE books
            SET title = $2, author = $3, summary = $4, isbn = $5, genre = $6
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        );
        let row = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(&fields.title)
            .bind(fields.author)
            .bind(&fields.summary)
            .bind(&fields.isbn)
            .bind(fields.genre.as_slice())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
