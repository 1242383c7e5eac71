//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Maximum length of either name part
pub const NAME_MAX_LEN: u64 = 100;

/// Full author document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Writable author fields, used for both create and overwrite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorFields {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    pub fn from_fields(id: Uuid, fields: AuthorFields) -> Self {
        Self {
            id,
            first_name: fields.first_name,
            family_name: fields.family_name,
            date_of_birth: fields.date_of_birth,
            date_of_death: fields.date_of_death,
        }
    }
}
