//! Startpage Bookmarks
//!
//! A folder tree of bookmarks persisted in SQLite. Every node carries a
//! short shortcut key, unique among its siblings, so the start page can
//! open bookmarks by typing the key into the shortcuts field. Commands
//! address nodes with `/`-separated folder titles relative to the current
//! working folder.

mod error;
mod manager;
mod node;

pub use error::BookmarkError;
pub use manager::{BookmarkManager, ShortcutMatch};
pub use node::{favicon_for, normalize_url, BookmarkNode, NodeKind};

pub type Result<T> = std::result::Result<T, BookmarkError>;
