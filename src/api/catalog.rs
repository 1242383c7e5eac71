//! Home page

use axum::{extract::State, response::Response};

use crate::{error::AppResult, AppState};

pub async fn index(State(state): State<AppState>) -> AppResult<Response> {
    let outcome = state.services.catalog.index().await?;
    state.views.respond(outcome)
}
