//! Book instance actions

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        display::{book_instance_url, date_formatted_edit, index_by_id, BookInstanceView, BookView},
        Book, BookInstance, BookInstanceFields, BookInstanceStatus,
    },
    repository::{BookRepository, Repository},
    resolver::FanOut,
    validation::{parse_date, parse_id, AsyncCheck, Check, FieldError, FormData, Message, Pipeline, Rule},
};

use super::Outcome;

const LIST_URL: &str = "/catalog/bookinstances";

fn invalid_status(_value: &str) -> String {
    format!(
        "Status is not valid, valid statuses: {}",
        BookInstanceStatus::names().join(", ")
    )
}

/// Fails when the submitted id names no stored book
struct BookExists {
    books: Arc<dyn BookRepository>,
}

#[async_trait]
impl AsyncCheck for BookExists {
    async fn passes(&self, value: &str) -> AppResult<bool> {
        match parse_id(value) {
            Some(id) => Ok(self.books.get(id).await?.is_some()),
            None => Ok(false),
        }
    }
}

fn book_instance_rules(books: Arc<dyn BookRepository>) -> Pipeline {
    Pipeline::new(vec![
        Rule::field("book")
            .trim()
            .check(Check::Required, "Book must be specified")
            .check(Check::Identifier, "Book is not valid")
            .check(Check::Custom(Arc::new(BookExists { books })), "Book is not valid")
            .escape(),
        Rule::field("imprint")
            .trim()
            .check(Check::Required, "Imprint must be specified")
            .escape(),
        Rule::field("status")
            .trim()
            .check(
                Check::OneOf(BookInstanceStatus::names()),
                Message::Computed(invalid_status),
            )
            .escape(),
        Rule::field("due_back")
            .trim()
            .optional()
            .check(Check::IsoDate, "Invalid due date")
            .escape(),
    ])
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn fields_from_form(form: &FormData) -> AppResult<BookInstanceFields> {
    let book = parse_id(form.get("book")).ok_or_else(|| {
        AppError::Internal("validated book instance form has no book id".to_string())
    })?;
    let status = form
        .get("status")
        .parse::<BookInstanceStatus>()
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(BookInstanceFields {
        book,
        imprint: form.get("imprint").to_string(),
        status,
        due_back: parse_date(form.get("due_back")).unwrap_or_else(today),
    })
}

fn form_from_book_instance(instance: &BookInstance) -> FormData {
    FormData::new()
        .with("book", instance.book.to_string())
        .with("imprint", instance.imprint.as_str())
        .with("status", instance.status.as_str())
        .with("due_back", date_formatted_edit(Some(instance.due_back)))
}

fn form_page(title: &str, form: &FormData, books: &[Book], errors: &[FieldError]) -> Outcome {
    let books: Vec<BookView> = books.iter().map(BookView::bare).collect();
    Outcome::render(
        "bookinstance_form.html",
        json!({
            "title": title,
            "form": form,
            "book_list": books,
            "statuses": BookInstanceStatus::names(),
            "errors": errors,
        }),
    )
}

#[derive(Clone)]
pub struct BookInstancesService {
    repository: Repository,
}

impl BookInstancesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Instance with its book populated
    async fn find(&self, id: Uuid) -> AppResult<Option<BookInstanceView>> {
        let Some(instance) = self.repository.book_instances.get(id).await? else {
            return Ok(None);
        };
        let books = self
            .repository
            .books
            .get(instance.book)
            .await?
            .into_iter()
            .map(|book| (book.id, book))
            .collect();
        Ok(Some(BookInstanceView::populate(&instance, &books)))
    }

    pub async fn list(&self) -> AppResult<Outcome> {
        let mut resolved = FanOut::new()
            .task("book_instances", self.repository.book_instances.list())
            .task("books", self.repository.books.list())
            .run()
            .await?;
        let instances: Vec<BookInstance> = resolved.take("book_instances")?;
        let books = index_by_id(resolved.take::<Vec<Book>>("books")?, |b| b.id);

        let instances: Vec<BookInstanceView> = instances
            .iter()
            .map(|instance| BookInstanceView::populate(instance, &books))
            .collect();
        Ok(Outcome::render(
            "bookinstance_list.html",
            json!({ "title": "Book Instance List", "bookinstance_list": instances }),
        ))
    }

    pub async fn detail(&self, id: &str) -> AppResult<Outcome> {
        let id = parse_id(id).ok_or_else(|| AppError::not_found("Book copy"))?;
        let instance = self
            .find(id)
            .await?
            .ok_or_else(|| AppError::not_found("Book copy"))?;

        let title = match &instance.book {
            Some(book) => format!("Copy: {}", book.title),
            None => "Copy".to_string(),
        };
        Ok(Outcome::render(
            "bookinstance_detail.html",
            json!({ "title": title, "bookinstance": instance }),
        ))
    }

    pub async fn create_form(&self) -> AppResult<Outcome> {
        let books = self.repository.books.list().await?;
        let form = FormData::new().with("status", BookInstanceStatus::default().as_str());
        Ok(form_page("Create BookInstance", &form, &books, &[]))
    }

    pub async fn create(&self, form: FormData) -> AppResult<Outcome> {
        let validated = book_instance_rules(self.repository.books.clone())
            .run(form)
            .await?;
        if !validated.is_valid() {
            let books = self.repository.books.list().await?;
            return Ok(form_page(
                "Create BookInstance",
                &validated.form,
                &books,
                &validated.errors,
            ));
        }

        let instance = self
            .repository
            .book_instances
            .create(&fields_from_form(&validated.form)?)
            .await?;
        tracing::info!(book_instance_id = %instance.id, book_id = %instance.book, "Book copy created");
        Ok(Outcome::redirect(book_instance_url(instance.id)))
    }

    pub async fn delete_form(&self, id: &str) -> AppResult<Outcome> {
        let Some(id) = parse_id(id) else {
            return Ok(Outcome::redirect(LIST_URL));
        };
        match self.find(id).await {
            Ok(Some(instance)) => Ok(Outcome::render(
                "bookinstance_delete.html",
                json!({ "title": "Delete BookInstance", "bookinstance": instance }),
            )),
            Ok(None) => Ok(Outcome::redirect(LIST_URL)),
            Err(e) => {
                tracing::warn!(book_instance_id = %id, error = %e, "Book copy delete form unavailable");
                Ok(Outcome::redirect(LIST_URL))
            }
        }
    }

    /// Copies have no dependents, so deletion is never blocked
    pub async fn delete(&self, id: &str) -> AppResult<Outcome> {
        let Some(id) = parse_id(id) else {
            return Ok(Outcome::redirect(LIST_URL));
        };
        if self.repository.book_instances.delete(id).await? {
            tracing::info!(book_instance_id = %id, "Book copy deleted");
        }
        Ok(Outcome::redirect(LIST_URL))
    }

    pub async fn update_form(&self, id: &str) -> AppResult<Outcome> {
        let id = parse_id(id).ok_or_else(|| AppError::not_found("Book copy"))?;
        let mut resolved = FanOut::new()
            .task("book_instance", self.repository.book_instances.get(id))
            .task("books", self.repository.books.list())
            .run()
            .await?;
        let instance: BookInstance = resolved
            .take::<Option<BookInstance>>("book_instance")?
            .ok_or_else(|| AppError::not_found("Book copy"))?;
        let books: Vec<Book> = resolved.take("books")?;

        Ok(form_page(
            "Update BookInstance",
            &form_from_book_instance(&instance),
            &books,
            &[],
        ))
    }

    pub async fn update(&self, id: &str, form: FormData) -> AppResult<Outcome> {
        let id = parse_id(id).ok_or_else(|| AppError::not_found("Book copy"))?;
        let validated = book_instance_rules(self.repository.books.clone())
            .run(form)
            .await?;
        if !validated.is_valid() {
            let books = self.repository.books.list().await?;
            return Ok(form_page(
                "Update BookInstance",
                &validated.form,
                &books,
                &validated.errors,
            ));
        }

        let instance = self
            .repository
            .book_instances
            .update(id, &fields_from_form(&validated.form)?)
            .await?
            .ok_or_else(|| AppError::not_found("Book copy"))?;
        tracing::info!(book_instance_id = %instance.id, "Book copy updated");
        Ok(Outcome::redirect(book_instance_url(instance.id)))
    }
}
