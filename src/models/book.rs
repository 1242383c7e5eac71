//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Book document. `author` and `genre` hold identifiers only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<Uuid>,
}

/// Writable book fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookFields {
    pub title: String,
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<Uuid>,
}

impl Book {
    pub fn from_fields(id: Uuid, fields: BookFields) -> Self {
        Self {
            id,
            title: fields.title,
            author: fields.author,
            summary: fields.summary,
            isbn: fields.isbn,
            genre: fields.genre,
        }
    }
}
