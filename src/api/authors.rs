//! Author pages

use axum::{
    extract::{Path, State},
    response::Response,
    Form,
};

use crate::{error::AppResult, AppState};

use super::form_data;

pub async fn list(State(state): State<AppState>) -> AppResult<Response> {
    let outcome = state.services.authors.list().await?;
    state.views.respond(outcome)
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let outcome = state.services.authors.detail(&id).await?;
    state.views.respond(outcome)
}

pub async fn create_form(State(state): State<AppState>) -> AppResult<Response> {
    let outcome = state.services.authors.create_form().await?;
    state.views.respond(outcome)
}

pub async fn create(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let outcome = state.services.authors.create(form_data(pairs)).await?;
    state.views.respond(outcome)
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let outcome = state.services.authors.delete_form(&id).await?;
    state.views.respond(outcome)
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let outcome = state.services.authors.delete(&id).await?;
    state.views.respond(outcome)
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let outcome = state.services.authors.update_form(&id).await?;
    state.views.respond(outcome)
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let outcome = state.services.authors.update(&id, form_data(pairs)).await?;
    state.views.respond(outcome)
}
