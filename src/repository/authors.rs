//! Authors repository (Postgres)

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::AuthorRepository;
use crate::{
    error::AppResult,
    models::{Author, AuthorFields},
};

#[derive(Clone)]
pub struct PgAuthorRepository {
    pool: Pool<Postgres>,
}

impl PgAuthorRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorRepository for PgAuthorRepository {
    async fn list(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(
            r#"
            SELECT id, first_name, family_name, date_of_birth, date_of_death
            FROM authors
            ORDER BY family_name, first_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>(
            "SELECT id, first_name, family_name, date_of_birth, date_of_death FROM authors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create(&self, fields: &AuthorFields) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (id, first_name, family_name, date_of_birth, date_of_death)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, first_name, family_name, date_of_birth, date_of_death
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&fields.first_name)
        .bind(&fields.family_name)
        .bind(fields.date_of_birth)
        .bind(fields.date_of_death)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, fields: &AuthorFields) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors
            SET first_name = $2, family_name = $3, date_of_birth = $4, date_of_death = $5
            WHERE id = $1
            RETURNING id, first_name, family_name, date_of_birth, date_of_death
            "#,
        )
        .bind(id)
        .bind(&fields.first_name)
        .bind(&fields.family_name)
        .bind(fields.date_of_birth)
        .bind(fields.date_of_death)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
