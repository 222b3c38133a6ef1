use std::io;
use std::result::Result as StdResult;

use thiserror::Error;

/// Errors that can occur in fluxcat
#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl CatalogueError {
    /// Wrap a backend failure that is not worth a dedicated variant.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }

    /// Wrap a database driver failure.
    pub fn database(err: impl std::fmt::Display) -> Self {
        Self::Database(err.to_string())
    }
}

pub type Result<T> = StdResult<T, CatalogueError>;
