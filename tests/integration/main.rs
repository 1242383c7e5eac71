//! In-process HTTP tests driving the router over the in-memory store

mod common;

mod authors;
mod book_instances;
mod books;
mod catalog;
mod genres;
