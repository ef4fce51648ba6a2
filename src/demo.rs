//! Walkthrough driven by the `client` binary: one full add/get/update/delete
//! round plus an optional bulk upload.

use std::time::{Duration, SystemTime};

use anyhow::{bail, Context as _};
use tarpc::context;
use tracing::info;

use crate::error::ErrorKind;
use crate::shared_types::{Book, BookId, BookInfoClient};

pub fn sample_book() -> Book {
    Book {
        id: "1".to_string(),
        title: "Operating System Concepts".to_string(),
        edition: "9th".to_string(),
        copyright: "2012".to_string(),
        language: "ENGLISH".to_string(),
        pages: "976".to_string(),
        author: "Abraham Silberschatz".to_string(),
        publisher: "John Wiley & Sons".to_string(),
    }
}

fn deadline(timeout: Duration) -> context::Context {
    let mut ctx = context::current();
    ctx.deadline = SystemTime::now() + timeout;
    ctx
}

/// Add the sample book, read it back, bump its edition, delete it and check it
/// is gone. Returns the record the server handed back on delete.
pub async fn walkthrough(client: &BookInfoClient, timeout: Duration) -> anyhow::Result<Book> {
    let id = client
        .add_book(deadline(timeout), sample_book())
        .await
        .context("could not add book")??;
    info!(id = %id.value, "book added");

    let mut book = client
        .get_book(deadline(timeout), id.clone())
        .await
        .context("could not get book")??;
    info!(?book, "book fetched");

    book.edition = "5th".to_string();
    let updated = client
        .update_book(deadline(timeout), book)
        .await
        .context("could not update book")??;
    info!(id = %updated.id, edition = %updated.edition, "book updated");

    let deleted = client
        .delete_book(deadline(timeout), id.clone())
        .await
        .context("could not delete book")??;
    info!(book = ?deleted, "book deleted");

    match client.get_book(deadline(timeout), id).await? {
        Err(e) if e.kind() == ErrorKind::NotFound => info!(error = %e, "book gone after delete"),
        Err(e) => return Err(e.into()),
        Ok(book) => bail!("book {} still present after delete", book.id),
    }
    Ok(deleted)
}

/// Add every book, then fetch each back. Returns the stored records.
pub async fn upload(
    client: &BookInfoClient,
    books: Vec<Book>,
    timeout: Duration,
) -> anyhow::Result<Vec<Book>> {
    let mut stored = Vec::with_capacity(books.len());
    for book in books {
        let title = book.title.clone();
        let BookId { value } = client
            .add_book(deadline(timeout), book)
            .await
            .with_context(|| format!("could not add book {title:?}"))??;
        let book = client
            .get_book(deadline(timeout), BookId::new(value))
            .await
            .context("could not get book")??;
        info!(?book, "book uploaded");
        stored.push(book);
    }
    Ok(stored)
}
