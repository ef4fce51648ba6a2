use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFound,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => f.write_str("not found"),
            ErrorKind::Internal => f.write_str("internal"),
        }
    }
}

/// Error returned to RPC callers. Serializable so it travels inside the response.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum StoreError {
    #[error("book {id} does not exist")]
    NotFound { id: String },
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl StoreError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// The offending book id, when the error concerns one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::NotFound { id } => Some(id),
            Self::Internal { .. } => None,
        }
    }
}
