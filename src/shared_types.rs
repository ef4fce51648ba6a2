use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A book record. Every field is free-form text; `id` is assigned by the server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub edition: String,
    pub copyright: String,
    pub language: String,
    pub pages: String,
    pub author: String,
    pub publisher: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId {
    pub value: String,
}

impl BookId {
    pub fn new(value: impl Into<String>) -> Self {
        BookId { value: value.into() }
    }
}

impl From<String> for BookId {
    fn from(value: String) -> Self {
        BookId { value }
    }
}

#[tarpc::service]
pub trait BookInfo {
    /// Store a book under a freshly generated id and return that id
    async fn add_book(book: Book) -> Result<BookId, StoreError>;
    /// Fetch a book by id
    async fn get_book(id: BookId) -> Result<Book, StoreError>;
    /// Replace an existing book; `book.id` selects the entry
    async fn update_book(book: Book) -> Result<Book, StoreError>;
    /// Remove a book and return it as it was before removal
    async fn delete_book(id: BookId) -> Result<Book, StoreError>;
}
