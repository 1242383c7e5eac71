//! Derived display values and view models.
//!
//! Entities carry no behavior; everything a template shows beyond the raw
//! fields (names, URLs, formatted dates, populated references) is computed
//! here by pure functions.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use super::{Author, Book, BookInstance, Genre};

const LIFESPAN_FORMAT: &str = "%d/%m/%Y";
const EDIT_FORMAT: &str = "%Y-%m-%d";

pub fn author_url(id: Uuid) -> String {
    format!("/catalog/author/{}", id)
}

pub fn book_url(id: Uuid) -> String {
    format!("/catalog/book/{}", id)
}

pub fn book_instance_url(id: Uuid) -> String {
    format!("/catalog/bookinstance/{}", id)
}

pub fn genre_url(id: Uuid) -> String {
    format!("/catalog/genre/{}", id)
}

/// "Family, First"
pub fn author_name(author: &Author) -> String {
    format!("{}, {}", author.family_name, author.first_name)
}

/// Birth and death dates as `dd/mm/yyyy - dd/mm/yyyy`; empty without a birth date.
pub fn author_lifespan(author: &Author) -> String {
    match (author.date_of_birth, author.date_of_death) {
        (None, _) => String::new(),
        (Some(birth), None) => birth.format(LIFESPAN_FORMAT).to_string(),
        (Some(birth), Some(death)) => format!(
            "{} - {}",
            birth.format(LIFESPAN_FORMAT),
            death.format(LIFESPAN_FORMAT)
        ),
    }
}

/// Value for an `<input type="date">`
pub fn date_formatted_edit(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(EDIT_FORMAT).to_string())
        .unwrap_or_default()
}

/// Long form used on pages, e.g. `1st Jan 2024`
pub fn date_formatted_view(date: NaiveDate) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{} {}", day, suffix, date.format("%b %Y"))
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorView {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub name: String,
    pub url: String,
    pub lifespan: String,
    pub date_of_birth_formatted_edit: String,
    pub date_of_death_formatted_edit: String,
}

impl From<&Author> for AuthorView {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            name: author_name(author),
            url: author_url(author.id),
            lifespan: author_lifespan(author),
            date_of_birth_formatted_edit: date_formatted_edit(author.date_of_birth),
            date_of_death_formatted_edit: date_formatted_edit(author.date_of_death),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenreView {
    pub id: Uuid,
    pub name: String,
    pub url: String,
}

impl From<&Genre> for GenreView {
    fn from(genre: &Genre) -> Self {
        Self {
            id: genre.id,
            name: genre.name.clone(),
            url: genre_url(genre.id),
        }
    }
}

/// Book with its author and genres populated.
///
/// References that no longer resolve are dropped (`author: None`, missing
/// genres omitted) rather than failing the page.
#[derive(Debug, Clone, Serialize)]
pub struct BookView {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub url: String,
    pub author: Option<AuthorView>,
    pub genre: Vec<GenreView>,
}

impl BookView {
    pub fn populate(
        book: &Book,
        authors: &HashMap<Uuid, Author>,
        genres: &HashMap<Uuid, Genre>,
    ) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            url: book_url(book.id),
            author: authors.get(&book.author).map(AuthorView::from),
            genre: book
                .genre
                .iter()
                .filter_map(|id| genres.get(id))
                .map(GenreView::from)
                .collect(),
        }
    }

    /// Book view without populating references
    pub fn bare(book: &Book) -> Self {
        Self::populate(book, &HashMap::new(), &HashMap::new())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookInstanceView {
    pub id: Uuid,
    pub imprint: String,
    pub status: String,
    pub url: String,
    pub due_back_formatted_view: String,
    pub due_back_formatted_edit: String,
    pub book: Option<BookView>,
}

impl BookInstanceView {
    pub fn populate(instance: &BookInstance, books: &HashMap<Uuid, Book>) -> Self {
        Self {
            id: instance.id,
            imprint: instance.imprint.clone(),
            status: instance.status.to_string(),
            url: book_instance_url(instance.id),
            due_back_formatted_view: date_formatted_view(instance.due_back),
            due_back_formatted_edit: date_formatted_edit(Some(instance.due_back)),
            book: books.get(&instance.book).map(BookView::bare),
        }
    }

    pub fn bare(instance: &BookInstance) -> Self {
        Self::populate(instance, &HashMap::new())
    }
}

/// One entry of a multi-select genre field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreChoice {
    pub id: Uuid,
    pub name: String,
    pub checked: bool,
}

/// Mark each genre as checked iff its id is in `selected`.
pub fn genre_choices(genres: &[Genre], selected: &[Uuid]) -> Vec<GenreChoice> {
    genres
        .iter()
        .map(|genre| GenreChoice {
            id: genre.id,
            name: genre.name.clone(),
            checked: selected.contains(&genre.id),
        })
        .collect()
}

/// Index documents by id for populating references
pub fn index_by_id<T, F>(items: Vec<T>, id: F) -> HashMap<Uuid, T>
where
    F: Fn(&T) -> Uuid,
{
    items.into_iter().map(|item| (id(&item), item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn author(birth: Option<NaiveDate>, death: Option<NaiveDate>) -> Author {
        Author {
            id: Uuid::new_v4(),
            first_name: "Isaac".to_string(),
            family_name: "Asimov".to_string(),
            date_of_birth: birth,
            date_of_death: death,
        }
    }

    #[test]
    fn test_author_name() {
        assert_eq!(author_name(&author(None, None)), "Asimov, Isaac");
    }

    #[test]
    fn test_lifespan() {
        assert_eq!(author_lifespan(&author(None, Some(date(1992, 4, 6)))), "");
        assert_eq!(author_lifespan(&author(Some(date(1920, 1, 2)), None)), "02/01/1920");
        assert_eq!(
            author_lifespan(&author(Some(date(1920, 1, 2)), Some(date(1992, 4, 6)))),
            "02/01/1920 - 06/04/1992"
        );
    }

    #[test]
    fn test_date_formatted_edit() {
        assert_eq!(date_formatted_edit(Some(date(2024, 3, 9))), "2024-03-09");
        assert_eq!(date_formatted_edit(None), "");
    }

    #[test]
    fn test_date_formatted_view_ordinals() {
        assert_eq!(date_formatted_view(date(2024, 1, 1)), "1st Jan 2024");
        assert_eq!(date_formatted_view(date(2024, 2, 2)), "2nd Feb 2024");
        assert_eq!(date_formatted_view(date(2024, 3, 3)), "3rd Mar 2024");
        assert_eq!(date_formatted_view(date(2024, 4, 11)), "11th Apr 2024");
        assert_eq!(date_formatted_view(date(2024, 5, 12)), "12th May 2024");
        assert_eq!(date_formatted_view(date(2024, 6, 13)), "13th Jun 2024");
        assert_eq!(date_formatted_view(date(2024, 7, 21)), "21st Jul 2024");
        assert_eq!(date_formatted_view(date(2024, 8, 22)), "22nd Aug 2024");
        assert_eq!(date_formatted_view(date(2024, 10, 31)), "31st Oct 2024");
    }

    #[test]
    fn test_genre_choices_marks_selected() {
        let genres: Vec<Genre> = ["A", "B", "C"]
            .iter()
            .map(|name| Genre {
                id: Uuid::new_v4(),
                name: name.to_string(),
            })
            .collect();
        let selected = vec![genres[0].id, genres[2].id];

        let checked: Vec<(String, bool)> = genre_choices(&genres, &selected)
            .into_iter()
            .map(|c| (c.name, c.checked))
            .collect();

        assert_eq!(
            checked,
            vec![
                ("A".to_string(), true),
                ("B".to_string(), false),
                ("C".to_string(), true)
            ]
        );
    }

    #[test]
    fn test_book_view_drops_dangling_references() {
        let genre = Genre {
            id: Uuid::new_v4(),
            name: "Fantasy".to_string(),
        };
        let book = Book {
            id: Uuid::new_v4(),
            title: "Title".to_string(),
            author: Uuid::new_v4(),
            summary: "Summary".to_string(),
            isbn: "123".to_string(),
            genre: vec![genre.id, Uuid::new_v4()],
        };
        let genres = index_by_id(vec![genre], |g| g.id);

        let view = BookView::populate(&book, &HashMap::new(), &genres);
        assert!(view.author.is_none());
        assert_eq!(view.genre.len(), 1);
        assert_eq!(view.genre[0].name, "Fantasy");
        assert_eq!(view.url, format!("/catalog/book/{}", book.id));
    }
}
