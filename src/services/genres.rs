//! Genre actions

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        display::{genre_url, BookView, GenreView},
        Book, Genre, GenreFields,
    },
    repository::{GenreRepository, Repository},
    resolver::FanOut,
    validation::{parse_id, AsyncCheck, Check, FieldError, FormData, Pipeline, Rule},
};

use super::Outcome;

const LIST_URL: &str = "/catalog/genres";

/// Fails when another genre already carries the submitted name
struct UniqueGenreName {
    genres: Arc<dyn GenreRepository>,
    exclude: Option<Uuid>,
}

#[async_trait]
impl AsyncCheck for UniqueGenreName {
    async fn passes(&self, value: &str) -> AppResult<bool> {
        Ok(self.genres.find_by_name(value, self.exclude).await?.is_none())
    }
}

fn genre_rules() -> Rule {
    Rule::field("name")
        .trim()
        .check(Check::Required, "Genre name is required")
        .escape()
}

fn form_page(title: &str, form: &FormData, errors: &[FieldError]) -> Outcome {
    Outcome::render(
        "genre_form.html",
        json!({ "title": title, "form": form, "errors": errors }),
    )
}

fn delete_page(genre: &Genre, books: &[Book]) -> Outcome {
    let books: Vec<BookView> = books.iter().map(BookView::bare).collect();
    Outcome::render(
        "genre_delete.html",
        json!({
            "title": format!("Delete Genre: {}", genre.name),
            "genre": GenreView::from(genre),
            "genre_books": books,
        }),
    )
}

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    async fn genre_with_books(&self, id: Uuid) -> AppResult<(Option<Genre>, Vec<Book>)> {
        let mut resolved = FanOut::new()
            .task("genre", self.repository.genres.get(id))
            .task("genre_books", self.repository.books.list_by_genre(id))
            .run()
            .await?;
        Ok((resolved.take("genre")?, resolved.take("genre_books")?))
    }

    /// All genres sorted by name
    pub async fn list(&self) -> AppResult<Outcome> {
        let genres = self.repository.genres.list().await?;
        let genres: Vec<GenreView> = genres.iter().map(GenreView::from).collect();
        Ok(Outcome::render(
            "genre_list.html",
            json!({ "title": "Genre List", "genre_list": genres }),
        ))
    }

    pub async fn detail(&self, id: &str) -> AppResult<Outcome> {
        let id = parse_id(id).ok_or_else(|| AppError::not_found("Genre"))?;
        let (genre, books) = self.genre_with_books(id).await?;
        let genre = genre.ok_or_else(|| AppError::not_found("Genre"))?;

        let books: Vec<BookView> = books.iter().map(BookView::bare).collect();
        Ok(Outcome::render(
            "genre_detail.html",
            json!({
                "title": "Genre Detail",
                "genre": GenreView::from(&genre),
                "genre_books": books,
            }),
        ))
    }

    pub async fn create_form(&self) -> AppResult<Outcome> {
        Ok(form_page("Create Genre", &FormData::new(), &[]))
    }

    /// Submitting an existing name leads to that genre instead of a duplicate
    pub async fn create(&self, form: FormData) -> AppResult<Outcome> {
        let validated = Pipeline::new(vec![genre_rules()]).run(form).await?;
        if !validated.is_valid() {
            return Ok(form_page("Create Genre", &validated.form, &validated.errors));
        }

        let name = validated.form.get("name");
        if let Some(existing) = self.repository.genres.find_by_name(name, None).await? {
            tracing::debug!(genre_id = %existing.id, "Genre already exists");
            return Ok(Outcome::redirect(genre_url(existing.id)));
        }

        let genre = self
            .repository
            .genres
            .create(&GenreFields {
                name: name.to_string(),
            })
            .await?;
        tracing::info!(genre_id = %genre.id, "Genre created");
        Ok(Outcome::redirect(genre_url(genre.id)))
    }

    pub async fn delete_form(&self, id: &str) -> AppResult<Outcome> {
        let Some(id) = parse_id(id) else {
            return Ok(Outcome::redirect(LIST_URL));
        };
        match self.genre_with_books(id).await {
            Ok((Some(genre), books)) => Ok(delete_page(&genre, &books)),
            Ok((None, _)) => Ok(Outcome::redirect(LIST_URL)),
            Err(e) => {
                tracing::warn!(genre_id = %id, error = %e, "Genre delete form unavailable");
                Ok(Outcome::redirect(LIST_URL))
            }
        }
    }

    pub async fn delete(&self, id: &str) -> AppResult<Outcome> {
        let Some(id) = parse_id(id) else {
            return Ok(Outcome::redirect(LIST_URL));
        };
        let (genre, books) = self.genre_with_books(id).await?;
        let Some(genre) = genre else {
            return Ok(Outcome::redirect(LIST_URL));
        };

        if !books.is_empty() {
            tracing::info!(genre_id = %id, books = books.len(), "Genre delete refused: books still reference it");
            return Ok(delete_page(&genre, &books));
        }

        self.repository.genres.delete(id).await?;
        tracing::info!(genre_id = %id, "Genre deleted");
        Ok(Outcome::redirect(LIST_URL))
    }

    pub async fn update_form(&self, id: &str) -> AppResult<Outcome> {
        let id = parse_id(id).ok_or_else(|| AppError::not_found("Genre"))?;
        let genre = self
            .repository
            .genres
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Genre"))?;
        let form = FormData::new().with("name", genre.name);
        Ok(form_page("Update Genre", &form, &[]))
    }

    /// Renaming onto another genre's name is a validation error
    pub async fn update(&self, id: &str, form: FormData) -> AppResult<Outcome> {
        let id = parse_id(id).ok_or_else(|| AppError::not_found("Genre"))?;
        let unique = UniqueGenreName {
            genres: self.repository.genres.clone(),
            exclude: Some(id),
        };
        let rules = Pipeline::new(vec![genre_rules().check(
            Check::Custom(Arc::new(unique)),
            "Genre with this name already exists",
        )]);

        let validated = rules.run(form).await?;
        if !validated.is_valid() {
            return Ok(form_page("Update Genre", &validated.form, &validated.errors));
        }

        let genre = self
            .repository
            .genres
            .update(
                id,
                &GenreFields {
                    name: validated.form.get("name").to_string(),
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found("Genre"))?;
        tracing::info!(genre_id = %genre.id, "Genre updated");
        Ok(Outcome::redirect(genre_url(genre.id)))
    }
}
