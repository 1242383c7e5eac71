//! Author actions

use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::NAME_MAX_LEN,
        display::{author_name, author_url, date_formatted_edit, AuthorView, BookView},
        Author, AuthorFields, Book,
    },
    repository::Repository,
    resolver::FanOut,
    validation::{parse_date, parse_id, Check, FieldError, FormData, Pipeline, Rule},
};

use super::Outcome;

const LIST_URL: &str = "/catalog/authors";

/// Rules shared by the create and update forms
fn author_rules() -> Pipeline {
    Pipeline::new(vec![
        Rule::field("first_name")
            .trim()
            .check(Check::Required, "First name is required")
            .check(Check::MaxLength(NAME_MAX_LEN), "First name must be at most 100 characters")
            .check(Check::Alphanumeric, "First name has non-alphanumeric characters.")
            .escape(),
        Rule::field("family_name")
            .trim()
            .check(Check::Required, "Family name is required")
            .check(Check::MaxLength(NAME_MAX_LEN), "Family name must be at most 100 characters")
            .check(Check::Alphanumeric, "Family name has non-alphanumeric characters.")
            .escape(),
        Rule::field("date_of_birth")
            .trim()
            .optional()
            .check(Check::IsoDate, "Invalid date of birth")
            .escape(),
        Rule::field("date_of_death")
            .trim()
            .optional()
            .check(Check::IsoDate, "Invalid date of death")
            .escape(),
    ])
}

fn fields_from_form(form: &FormData) -> AuthorFields {
    AuthorFields {
        first_name: form.get("first_name").to_string(),
        family_name: form.get("family_name").to_string(),
        date_of_birth: parse_date(form.get("date_of_birth")),
        date_of_death: parse_date(form.get("date_of_death")),
    }
}

fn form_from_author(author: &Author) -> FormData {
    FormData::new()
        .with("first_name", author.first_name.as_str())
        .with("family_name", author.family_name.as_str())
        .with("date_of_birth", date_formatted_edit(author.date_of_birth))
        .with("date_of_death", date_formatted_edit(author.date_of_death))
}

fn form_page(title: &str, form: &FormData, errors: &[FieldError]) -> Outcome {
    Outcome::render(
        "author_form.html",
        json!({ "title": title, "form": form, "errors": errors }),
    )
}

fn delete_page(author: &Author, books: &[Book]) -> Outcome {
    let books: Vec<BookView> = books.iter().map(BookView::bare).collect();
    Outcome::render(
        "author_delete.html",
        json!({
            "title": format!("Delete Author: {}", author_name(author)),
            "author": AuthorView::from(author),
            "books": books,
        }),
    )
}

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    async fn author_with_books(&self, id: Uuid) -> AppResult<(Option<Author>, Vec<Book>)> {
        let mut resolved = FanOut::new()
            .task("author", self.repository.authors.get(id))
            .task("books", self.repository.books.list_by_author(id))
            .run()
            .await?;
        Ok((resolved.take("author")?, resolved.take("books")?))
    }

    /// All authors sorted by family name
    pub async fn list(&self) -> AppResult<Outcome> {
        let authors = self.repository.authors.list().await?;
        let authors: Vec<AuthorView> = authors.iter().map(AuthorView::from).collect();
        Ok(Outcome::render(
            "author_list.html",
            json!({ "title": "Author List", "author_list": authors }),
        ))
    }

    /// Author with the books they wrote
    pub async fn detail(&self, id: &str) -> AppResult<Outcome> {
        let id = parse_id(id).ok_or_else(|| AppError::not_found("Author"))?;
        let (author, books) = self.author_with_books(id).await?;
        let author = author.ok_or_else(|| AppError::not_found("Author"))?;

        let books: Vec<BookView> = books.iter().map(BookView::bare).collect();
        Ok(Outcome::render(
            "author_detail.html",
            json!({
                "title": author_name(&author),
                "author": AuthorView::from(&author),
                "books": books,
            }),
        ))
    }

    pub async fn create_form(&self) -> AppResult<Outcome> {
        Ok(form_page("Create Author", &FormData::new(), &[]))
    }

    pub async fn create(&self, form: FormData) -> AppResult<Outcome> {
        let validated = author_rules().run(form).await?;
        if !validated.is_valid() {
            return Ok(form_page("Create Author", &validated.form, &validated.errors));
        }

        let author = self
            .repository
            .authors
            .create(&fields_from_form(&validated.form))
            .await?;
        tracing::info!(author_id = %author.id, "Author created");
        Ok(Outcome::redirect(author_url(author.id)))
    }

    /// Confirmation page listing the books that block deletion
    pub async fn delete_form(&self, id: &str) -> AppResult<Outcome> {
        let Some(id) = parse_id(id) else {
            return Ok(Outcome::redirect(LIST_URL));
        };
        match self.author_with_books(id).await {
            Ok((Some(author), books)) => Ok(delete_page(&author, &books)),
            Ok((None, _)) => Ok(Outcome::redirect(LIST_URL)),
            Err(e) => {
                tracing::warn!(author_id = %id, error = %e, "Author delete form unavailable");
                Ok(Outcome::redirect(LIST_URL))
            }
        }
    }

    pub async fn delete(&self, id: &str) -> AppResult<Outcome> {
        let Some(id) = parse_id(id) else {
            return Ok(Outcome::redirect(LIST_URL));
        };
        let (author, books) = self.author_with_books(id).await?;
        let Some(author) = author else {
            return Ok(Outcome::redirect(LIST_URL));
        };

        if !books.is_empty() {
            tracing::info!(author_id = %id, books = books.len(), "Author delete refused: books still reference it");
            return Ok(delete_page(&author, &books));
        }

        self.repository.authors.delete(id).await?;
        tracing::info!(author_id = %id, "Author deleted");
        Ok(Outcome::redirect(LIST_URL))
    }

    pub async fn update_form(&self, id: &str) -> AppResult<Outcome> {
        let id = parse_id(id).ok_or_else(|| AppError::not_found("Author"))?;
        let author = self
            .repository
            .authors
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Author"))?;
        Ok(form_page("Update Author", &form_from_author(&author), &[]))
    }

    pub async fn update(&self, id: &str, form: FormData) -> AppResult<Outcome> {
        let id = parse_id(id).ok_or_else(|| AppError::not_found("Author"))?;
        let validated = author_rules().run(form).await?;
        if !validated.is_valid() {
            return Ok(form_page("Update Author", &validated.form, &validated.errors));
        }

        let author = self
            .repository
            .authors
            .update(id, &fields_from_form(&validated.form))
            .await?
            .ok_or_else(|| AppError::not_found("Author"))?;
        tracing::info!(author_id = %author.id, "Author updated");
        Ok(Outcome::redirect(author_url(author.id)))
    }
}
