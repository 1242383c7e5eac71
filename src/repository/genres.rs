//! Genres repository (Postgres)

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::GenreRepository;
use crate::{
    error::AppResult,
    models::{Genre, GenreFields},
};

#[derive(Clone)]
pub struct PgGenreRepository {
    pool: Pool<Postgres>,
}

impl PgGenreRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GenreRepository for PgGenreRepository {
    async fn list(&self) -> AppResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Genre>> {
        let row = sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_name(&self, name: &str, exclude: Option<Uuid>) -> AppResult<Option<Genre>> {
        let row = sqlx::query_as::<_, Genre>(
            r#"
            SELECT id, name FROM genres
            WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2)
            LIMIT 1
            "#,
        )
        .bind(name)
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create(&self, fields: &GenreFields) -> AppResult<Genre> {
        let row = sqlx::query_as::<_, Genre>(
            "INSERT INTO genres (id, name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(Uuid::new_v4())
        .bind(&fields.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, fields: &GenreFields) -> AppResult<Option<Genre>> {
        let row = sqlx::query_as::<_, Genre>(
            "UPDATE genres SET name = $2 WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(&fields.name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
