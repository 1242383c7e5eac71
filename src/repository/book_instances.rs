//! Book instances repository (Postgres)

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::BookInstanceRepository;
use crate::{
    error::AppResult,
    models::{BookInstance, BookInstanceFields, BookInstanceStatus},
};

const COLUMNS: &str = "id, book, imprint, status, due_back";

#[derive(Clone)]
pub struct PgBookInstanceRepository {
    pool: Pool<Postgres>,
}

impl PgBookInstanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookInstanceRepository for PgBookInstanceRepository {
    async fn list(&self) -> AppResult<Vec<BookInstance>> {
        let query = format!("SELECT {} FROM book_instances ORDER BY due_back, imprint", COLUMNS);
        let rows = sqlx::query_as::<_, BookInstance>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        let query = format!("SELECT {} FROM book_instances WHERE id = $1", COLUMNS);
        let row = sqlx::query_as::<_, BookInstance>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_by_book(&self, book: Uuid) -> AppResult<Vec<BookInstance>> {
        let query = format!(
            "SELECT {} FROM book_instances WHERE book = $1 ORDER BY due_back, imprint",
            COLUMNS
        );
        let rows = sqlx::query_as::<_, BookInstance>(&query)
            .bind(book)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create(&self, fields: &BookInstanceFields) -> AppResult<BookInstance> {
        let query = format!(
            r#"
            INSERT INTO book_instances (id, book, imprint, status, due_back)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            COLUMNS
        );
        let row = sqlx::query_as::<_, BookInstance>(&query)
            .bind(Uuid::new_v4())
            .bind(fields.book)
            .bind(&fields.imprint)
            .bind(fields.status.as_str())
            .bind(fields.due_back)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, fields: &BookInstanceFields) -> AppResult<Option<BookInstance>> {
        let query = format!(
            r#"
            UPDATE book_instances
            SET book = $2, imprint = $3, status = $4, due_back = $5
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        );
        let row = sqlx::query_as::<_, BookInstance>(&query)
            .bind(id)
            .bind(fields.book)
            .bind(&fields.imprint)
            .bind(fields.status.as_str())
            .bind(fields.due_back)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_by_status(&self, status: BookInstanceStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
