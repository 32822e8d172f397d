//! Capabilities the controller calls into

use startpage_navigation::{BookmarkCommand, BookmarkOp};

use crate::error::CoreError;
use crate::Result;

/// Page navigation side effect
pub trait Navigator {
    /// Replace the start page; no history entry is left behind
    fn replace(&mut self, url: &str);

    /// Open in a new tab, keeping the start page
    fn open(&mut self, url: &str);
}

/// Where dispatch and shortcut failures end up. Must not fail itself.
pub trait ErrorSink {
    fn report(&self, error: &CoreError);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogErrorSink;

impl ErrorSink for LogErrorSink {
    fn report(&self, error: &CoreError) {
        tracing::error!(error = %error, "Start page command failed");
    }
}

/// Bookmark tree commands and shortcut openers.
///
/// Mutations receive the raw argument tokens of their command. Shortcut
/// openers return `true` once the typed key completed an interaction and
/// `false` while more input is needed.
pub trait BookmarkOps {
    fn create_folder(&mut self, args: &[String]) -> Result<()>;
    fn remove(&mut self, args: &[String]) -> Result<()>;
    fn create_bookmark(&mut self, args: &[String]) -> Result<()>;
    fn move_node(&mut self, args: &[String]) -> Result<()>;
    fn change_url(&mut self, args: &[String]) -> Result<()>;
    fn update_icon(&mut self, args: &[String]) -> Result<()>;

    fn open_by_shortcut(&mut self, key: &str, navigator: &mut dyn Navigator) -> Result<bool>;
    fn open_group_by_shortcut(&mut self, key: &str, navigator: &mut dyn Navigator)
        -> Result<bool>;
    fn set_folder_by_shortcut(&mut self, key: &str) -> Result<bool>;
    fn open_all(&mut self, navigator: &mut dyn Navigator) -> Result<()>;

    fn apply(&mut self, op: &BookmarkOp) -> Result<()> {
        match op.kind {
            BookmarkCommand::Mkdir => self.create_folder(&op.args),
            BookmarkCommand::Rm => self.remove(&op.args),
            BookmarkCommand::Touch => self.create_bookmark(&op.args),
            BookmarkCommand::Mv => self.move_node(&op.args),
            BookmarkCommand::Echo => self.change_url(&op.args),
            BookmarkCommand::Update => self.update_icon(&op.args),
        }
    }
}

/// Tip panel content. `None` hides the panel.
pub trait TipOps {
    /// Called once when the page starts
    fn generate(&mut self) -> Result<Option<String>>;

    /// The `tip` command
    fn handle(&mut self, args: &[String]) -> Result<Option<String>>;
}
