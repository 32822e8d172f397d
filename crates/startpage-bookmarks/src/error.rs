//! Bookmark error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookmarkError {
    #[error("No such bookmark or folder: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not a folder: {0}")]
    NotAFolder(String),

    #[error("Not a bookmark: {0}")]
    NotABookmark(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid shortcut key: {0}")]
    InvalidShortcut(String),

    #[error("Shortcut key {key} clashes with {existing}")]
    ShortcutConflict { key: String, existing: String },

    #[error("Cannot move {0} into itself")]
    InvalidMove(String),

    #[error("Storage error: {0}")]
    Storage(#[from] startpage_storage::StorageError),
}
