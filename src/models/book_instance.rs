//! Book instance (physical copy) model and status enum

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Circulation status of a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookInstanceStatus {
    Available,
    Maintenance,
    Loaned,
    Reserved,
}

impl BookInstanceStatus {
    /// All statuses, in form display order
    pub const ALL: [BookInstanceStatus; 4] = [
        BookInstanceStatus::Available,
        BookInstanceStatus::Maintenance,
        BookInstanceStatus::Loaned,
        BookInstanceStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::Loaned => "Loaned",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|s| s.as_str()).collect()
    }
}

impl Default for BookInstanceStatus {
    fn default() -> Self {
        BookInstanceStatus::Maintenance
    }
}

impl std::fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown book instance status: {0}")]
pub struct UnknownStatus(pub String);

impl std::str::FromStr for BookInstanceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl TryFrom<String> for BookInstanceStatus {
    type Error = UnknownStatus;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Book instance document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BookInstance {
    pub id: Uuid,
    pub book: Uuid,
    pub imprint: String,
    #[sqlx(try_from = "String")]
    pub status: BookInstanceStatus,
    pub due_back: NaiveDate,
}

/// Writable book instance fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookInstanceFields {
    pub book: Uuid,
    pub imprint: String,
    pub status: BookInstanceStatus,
    pub due_back: NaiveDate,
}

impl BookInstance {
    pub fn from_fields(id: Uuid, fields: BookInstanceFields) -> Self {
        Self {
            id,
            book: fields.book,
            imprint: fields.imprint,
            status: fields.status,
            due_back: fields.due_back,
        }
    }
}
