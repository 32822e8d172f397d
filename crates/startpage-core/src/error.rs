//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] startpage_storage::StorageError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] startpage_navigation::NavigationError),

    #[error("{0}")]
    Bookmark(#[from] startpage_bookmarks::BookmarkError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Tip error: {0}")]
    Tip(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
