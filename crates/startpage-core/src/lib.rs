//! Startpage Core
//!
//! The start page controller. Rust owns all page state: the frontend
//! forwards keyboard and lifecycle events to [`StartPage`] and mirrors the
//! resulting [`PageView`] and navigations.

mod bookmarks;
mod collaborators;
mod config;
mod error;
mod keys;
mod navigator;
mod page;
mod shortcuts;
mod tip;
mod view;

pub use collaborators::{BookmarkOps, ErrorSink, LogErrorSink, Navigator, TipOps};
pub use config::Config;
pub use error::CoreError;
pub use keys::{Focus, Key, KeyOutcome};
pub use navigator::{Navigation, RecordingNavigator};
pub use page::StartPage;
pub use shortcuts::{ShortcutContext, ShortcutHandler, ShortcutRouter, UnloadGuard};
pub use tip::TipManager;
pub use view::{FieldState, PageView, Panels};

// Re-export the building blocks
pub use startpage_bookmarks::{BookmarkError, BookmarkManager, BookmarkNode, NodeKind, ShortcutMatch};
pub use startpage_navigation::{
    tokenize, BangProvider, BangSession, BangTable, BookmarkCommand, BookmarkOp, Dispatch,
    NavigationError, SearchResolver,
};
pub use startpage_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging on stderr; `RUST_LOG` overrides the `info` default
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
