//! Book actions

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        display::{
            book_url, genre_choices, index_by_id, AuthorView, BookInstanceView, BookView,
        },
        Author, Book, BookFields, BookInstance, Genre,
    },
    repository::{AuthorRepository, Repository},
    resolver::FanOut,
    validation::{parse_id, AsyncCheck, Check, FieldError, FormData, Pipeline, Rule},
};

use super::Outcome;

const LIST_URL: &str = "/catalog/books";

/// Fails when the submitted id names no stored author
struct AuthorExists {
    authors: Arc<dyn AuthorRepository>,
}

#[async_trait]
impl AsyncCheck for AuthorExists {
    async fn passes(&self, value: &str) -> AppResult<bool> {
        match parse_id(value) {
            Some(id) => Ok(self.authors.get(id).await?.is_some()),
            None => Ok(false),
        }
    }
}

fn book_rules(authors: Arc<dyn AuthorRepository>) -> Pipeline {
    Pipeline::new(vec![
        Rule::field("title")
            .trim()
            .check(Check::Required, "Title is required")
            .escape(),
        Rule::field("author")
            .trim()
            .check(Check::Required, "Author is required")
            .check(Check::Identifier, "Author is not valid")
            .check(Check::Custom(Arc::new(AuthorExists { authors })), "Author is not valid")
            .escape(),
        Rule::field("summary")
            .trim()
            .check(Check::Required, "Summary is required")
            .escape(),
        Rule::field("isbn")
            .trim()
            .check(Check::Required, "ISBN is required")
            .escape(),
        Rule::field("genre")
            .each()
            .trim()
            .check(Check::Identifier, "Genre is not valid")
            .escape(),
    ])
}

/// Submitted genre ids that parse; used for checked state and persistence
fn selected_genres(form: &FormData) -> Vec<Uuid> {
    form.get_all("genre")
        .iter()
        .filter_map(|value| parse_id(value))
        .collect()
}

/// Build the document fields from a form that passed validation
fn fields_from_form(form: &FormData) -> AppResult<BookFields> {
    let author = parse_id(form.get("author"))
        .ok_or_else(|| AppError::Internal("validated book form has no author id".to_string()))?;
    Ok(BookFields {
        title: form.get("title").to_string(),
        author,
        summary: form.get("summary").to_string(),
        isbn: form.get("isbn").to_string(),
        genre: selected_genres(form),
    })
}

fn form_from_book(book: &Book) -> FormData {
    let mut form = FormData::new()
        .with("title", book.title.as_str())
        .with("author", book.author.to_string())
        .with("summary", book.summary.as_str())
        .with("isbn", book.isbn.as_str());
    form.set_all("genre", book.genre.iter().map(Uuid::to_string).collect());
    form
}

fn form_page(
    title: &str,
    form: &FormData,
    authors: &[Author],
    genres: &[Genre],
    selected: &[Uuid],
    errors: &[FieldError],
) -> Outcome {
    let authors: Vec<AuthorView> = authors.iter().map(AuthorView::from).collect();
    Outcome::render(
        "book_form.html",
        json!({
            "title": title,
            "form": form,
            "authors": authors,
            "genres": genre_choices(genres, selected),
            "errors": errors,
        }),
    )
}

fn delete_page(book: &BookView, instances: &[BookInstance]) -> Outcome {
    let instances: Vec<BookInstanceView> = instances.iter().map(BookInstanceView::bare).collect();
    Outcome::render(
        "book_delete.html",
        json!({
            "title": format!("Delete Book: {}", book.title),
            "book": book,
            "book_instances": instances,
        }),
    )
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Author and genre lists offered by the book form
    async fn choices(&self) -> AppResult<(Vec<Author>, Vec<Genre>)> {
        let mut resolved = FanOut::new()
            .task("authors", self.repository.authors.list())
            .task("genres", self.repository.genres.list())
            .run()
            .await?;
        Ok((resolved.take("authors")?, resolved.take("genres")?))
    }

    async fn book_with_instances(&self, id: Uuid) -> AppResult<(Option<Book>, Vec<BookInstance>)> {
        let mut resolved = FanOut::new()
            .task("book", self.repository.books.get(id))
            .task("book_instances", self.repository.book_instances.list_by_book(id))
            .run()
            .await?;
        Ok((resolved.take("book")?, resolved.take("book_instances")?))
    }

    /// Populate the author and genres of one book
    async fn populate(&self, book: &Book) -> AppResult<BookView> {
        let mut resolved = FanOut::new()
            .task("author", self.repository.authors.get(book.author))
            .task("genres", self.repository.genres.list())
            .run()
            .await?;
        let author: Option<Author> = resolved.take("author")?;
        let authors: HashMap<Uuid, Author> = author.into_iter().map(|a| (a.id, a)).collect();
        let genres = index_by_id(resolved.take::<Vec<Genre>>("genres")?, |g| g.id);
        Ok(BookView::populate(book, &authors, &genres))
    }

    /// All books with their authors, sorted by title
    pub async fn list(&self) -> AppResult<Outcome> {
        let mut resolved = FanOut::new()
            .task("books", self.repository.books.list())
            .task("authors", self.repository.authors.list())
            .run()
            .await?;
        let books: Vec<Book> = resolved.take("books")?;
        let authors = index_by_id(resolved.take::<Vec<Author>>("authors")?, |a| a.id);

        let books: Vec<BookView> = books
            .iter()
            .map(|book| BookView::populate(book, &authors, &HashMap::new()))
            .collect();
        Ok(Outcome::render(
            "book_list.html",
            json!({ "title": "Book List", "book_list": books }),
        ))
    }

    /// Book with author, genres and copies
    pub async fn detail(&self, id: &str) -> AppResult<Outcome> {
        let id = parse_id(id).ok_or_else(|| AppError::not_found("Book"))?;
        let (book, instances) = self.book_with_instances(id).await?;
        let book = book.ok_or_else(|| AppError::not_found("Book"))?;
        let view = self.populate(&book).await?;

        let instances: Vec<BookInstanceView> = instances.iter().map(BookInstanceView::bare).collect();
        Ok(Outcome::render(
            "book_detail.html",
            json!({
                "title": view.title,
                "book": view,
                "book_instances": instances,
            }),
        ))
    }

    pub async fn create_form(&self) -> AppResult<Outcome> {
        let (authors, genres) = self.choices().await?;
        Ok(form_page("Create Book", &FormData::new(), &authors, &genres, &[], &[]))
    }

    pub async fn create(&self, form: FormData) -> AppResult<Outcome> {
        let validated = book_rules(self.repository.authors.clone())
            .run(form)
            .await?;
        if !validated.is_valid() {
            let (authors, genres) = self.choices().await?;
            let selected = selected_genres(&validated.form);
            return Ok(form_page(
                "Create Book",
                &validated.form,
                &authors,
                &genres,
                &selected,
                &validated.errors,
            ));
        }

        let book = self
            .repository
            .books
            .create(&fields_from_form(&validated.form)?)
            .await?;
        tracing::info!(book_id = %book.id, "Book created");
        Ok(Outcome::redirect(book_url(book.id)))
    }

    /// Confirmation page listing the copies that block deletion
    pub async fn delete_form(&self, id: &str) -> AppResult<Outcome> {
        let Some(id) = parse_id(id) else {
            return Ok(Outcome::redirect(LIST_URL));
        };
        let found = match self.book_with_instances(id).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(book_id = %id, error = %e, "Book delete form unavailable");
                return Ok(Outcome::redirect(LIST_URL));
            }
        };
        match found {
            (Some(book), instances) => {
                let view = self.populate(&book).await?;
                Ok(delete_page(&view, &instances))
            }
            (None, _) => Ok(Outcome::redirect(LIST_URL)),
        }
    }

    pub async fn delete(&self, id: &str) -> AppResult<Outcome> {
        let Some(id) = parse_id(id) else {
            return Ok(Outcome::redirect(LIST_URL));
        };
        let (book, instances) = self.book_with_instances(id).await?;
        let Some(book) = book else {
            return Ok(Outcome::redirect(LIST_URL));
        };

        if !instances.is_empty() {
            tracing::info!(book_id = %id, copies = instances.len(), "Book delete refused: copies still reference it");
            let view = self.populate(&book).await?;
            return Ok(delete_page(&view, &instances));
        }

        self.repository.books.delete(id).await?;
        tracing::info!(book_id = %id, "Book deleted");
        Ok(Outcome::redirect(LIST_URL))
    }

    pub async fn update_form(&self, id: &str) -> AppResult<Outcome> {
        let id = parse_id(id).ok_or_else(|| AppError::not_found("Book"))?;
        let mut resolved = FanOut::new()
            .task("book", self.repository.books.get(id))
            .task("authors", self.repository.authors.list())
            .task("genres", self.repository.genres.list())
            .run()
            .await?;
        let book: Book = resolved
            .take::<Option<Book>>("book")?
            .ok_or_else(|| AppError::not_found("Book"))?;
        let authors: Vec<Author> = resolved.take("authors")?;
        let genres: Vec<Genre> = resolved.take("genres")?;

        Ok(form_page(
            "Update Book",
            &form_from_book(&book),
            &authors,
            &genres,
            &book.genre,
            &[],
        ))
    }

    pub async fn update(&self, id: &str, form: FormData) -> AppResult<Outcome> {
        let id = parse_id(id).ok_or_else(|| AppError::not_found("Book"))?;
        let validated = book_rules(self.repository.authors.clone())
            .run(form)
            .await?;
        if !validated.is_valid() {
            let (authors, genres) = self.choices().await?;
            let selected = selected_genres(&validated.form);
            return Ok(form_page(
                "Update Book",
                &validated.form,
                &authors,
                &genres,
                &selected,
                &validated.errors,
            ));
        }

        let book = self
            .repository
            .books
            .update(id, &fields_from_form(&validated.form)?)
            .await?
            .ok_or_else(|| AppError::not_found("Book"))?;
        tracing::info!(book_id = %book.id, "Book updated");
        Ok(Outcome::redirect(book_url(book.id)))
    }
}
