//! Book pages

use axum::{
    extract::{Path, State},
    response::Response,
    Form,
};

use crate::{error::AppResult, AppState};

use super::form_data;

pub async fn list(State(state): State<AppState>) -> AppResult<Response> {
    let outcome = state.services.books.list().await?;
    state.views.respond(outcome)
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let outcome = state.services.books.detail(&id).await?;
    state.views.respond(outcome)
}

pub async fn create_form(State(state): State<AppState>) -> AppResult<Response> {
    let outcome = state.services.books.create_form().await?;
    state.views.respond(outcome)
}

pub async fn create(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let outcome = state.services.books.create(form_data(pairs)).await?;
    state.views.respond(outcome)
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let outcome = state.services.books.delete_form(&id).await?;
    state.views.respond(outcome)
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let outcome = state.services.books.delete(&id).await?;
    state.views.respond(outcome)
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let outcome = state.services.books.update_form(&id).await?;
    state.views.respond(outcome)
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    let outcome = state.services.books.update(&id, form_data(pairs)).await?;
    state.views.respond(outcome)
}
