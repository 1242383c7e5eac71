//! Error types for the Local Library server

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::validation::escape;

/// Main application error type
///
/// Validation failures and guard conditions are not errors: they are rendered
/// as ordinary pages. Only missing documents and collaborator failures end up
/// here.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Not-found error for a document of the given kind
    pub fn not_found(kind: &str) -> Self {
        AppError::NotFound(format!("{} not found", kind))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_)
            | AppError::Migration(_)
            | AppError::Template(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Migration(e) => {
                tracing::error!("Migration error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {:?}", e);
                "Internal server error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
        };

        let body = format!(
            "<!DOCTYPE html>\n<html lang=\"en\"><head><title>{code}</title></head>\
             <body><h1>{message}</h1><h2>{code}</h2><p><a href=\"/catalog\">Home</a></p></body></html>\n",
            code = status.as_u16(),
            message = escape(&message),
        );

        (status, Html(body)).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
