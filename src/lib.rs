//! Local Library catalog server
//!
//! Server-rendered catalog of authors, books, genres and book copies, backed
//! by PostgreSQL or an in-memory store.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod resolver;
pub mod services;
pub mod validation;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub views: Arc<views::Views>,
}
