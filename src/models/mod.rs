//! Data models for the Local Library

pub mod author;
pub mod book;
pub mod book_instance;
pub mod display;
pub mod genre;

// Re-export commonly used types
pub use author::{Author, AuthorFields};
pub use book::{Book, BookFields};
pub use book_instance::{BookInstance, BookInstanceFields, BookInstanceStatus};
pub use genre::{Genre, GenreFields};
