use std::sync::Arc;

use futures::future;
use tarpc::context;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::shared_types::{Book, BookId, BookInfo};
use crate::store::BookStore;

/// RPC front of a [`BookStore`]. Clones share the same store.
#[derive(Clone, Default)]
pub struct BookInfoServer {
    store: Arc<BookStore>,
}

impl BookInfoServer {
    pub fn new(store: Arc<BookStore>) -> Self {
        BookInfoServer { store }
    }

    pub fn store(&self) -> &Arc<BookStore> {
        &self.store
    }
}

fn log_failure<T>(op: &'static str, result: &Result<T, StoreError>) {
    if let Err(e) = result {
        match e {
            StoreError::NotFound { id } => debug!(op, %id, "book not found"),
            StoreError::Internal { message } => warn!(op, %message, "request failed"),
        }
    }
}

impl BookInfo for BookInfoServer {
    // Handlers never block, so each future is ready immediately
    type AddBookFut = future::Ready<Result<BookId, StoreError>>;
    type GetBookFut = future::Ready<Result<Book, StoreError>>;
    type UpdateBookFut = future::Ready<Result<Book, StoreError>>;
    type DeleteBookFut = future::Ready<Result<Book, StoreError>>;

    fn add_book(self, _: context::Context, book: Book) -> Self::AddBookFut {
        let result = self.store.create(book);
        match &result {
            Ok(id) => debug!(id = %id.value, "book added"),
            Err(_) => log_failure("add_book", &result),
        }
        future::ready(result)
    }

    fn get_book(self, _: context::Context, id: BookId) -> Self::GetBookFut {
        let result = self.store.read(&id.value);
        log_failure("get_book", &result);
        future::ready(result)
    }

    fn update_book(self, _: context::Context, book: Book) -> Self::UpdateBookFut {
        let id = book.id.clone();
        let result = self.store.update(book);
        if result.is_ok() {
            debug!(%id, "book updated");
        }
        log_failure("update_book", &result);
        future::ready(result)
    }

    fn delete_book(self, _: context::Context, id: BookId) -> Self::DeleteBookFut {
        let result = self.store.delete(&id.value);
        if result.is_ok() {
            debug!(id = %id.value, "book deleted");
        }
        log_failure("delete_book", &result);
        future::ready(result)
    }
}
