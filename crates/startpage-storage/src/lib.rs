//! Startpage Storage Layer
//!
//! SQLite persistence for the bookmark tree and page settings.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
