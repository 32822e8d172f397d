//! Startpage Navigation
//!
//! Interpretation of the search field:
//!   1. Tokenize the line, honoring quoted arguments
//!   2. Bookmark command word (`mkdir`, `rm`, `touch`, `mv`, `echo`, `update`) → bookmark op
//!   3. `tip` → tip op
//!   4. Anything else → search, resolved to a URL, a localhost address,
//!      the active bang provider or the default search engine
//!
//! Bangs (`!name `) are tracked by [`BangSession`], a small state machine
//! driven by keystrokes in the search field.

mod bang;
mod command;
mod error;
mod search;
mod tokenizer;

pub use bang::{BangProvider, BangSession, BangTable};
pub use command::{BookmarkCommand, BookmarkOp, Dispatch};
pub use error::NavigationError;
pub use search::{
    encode_component, validate_template, SearchResolver, DEFAULT_SEARCH_ENGINE,
    QUERY_PLACEHOLDER,
};
pub use tokenizer::tokenize;

pub type Result<T> = std::result::Result<T, NavigationError>;
