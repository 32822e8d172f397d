//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Search template has no {{{{{{s}}}}}} placeholder: {0}")]
    InvalidTemplate(String),

    #[error("Invalid bang table: {0}")]
    BangTable(#[from] serde_json::Error),

    #[error("Failed to read bang table: {0}")]
    Io(#[from] std::io::Error),
}
