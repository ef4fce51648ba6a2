//! Book record store served over tarpc.

pub mod books_csv;
pub mod config;
pub mod demo;
pub mod error;
pub mod limits;
pub mod logging;
pub mod service;
pub mod shared_types;
pub mod store;

pub use error::{ErrorKind, StoreError};
pub use service::BookInfoServer;
pub use shared_types::*;
pub use store::{BookStore, IdGenerator, UuidGenerator};
