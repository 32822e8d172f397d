//! Bookmark commands and shortcut openers on top of [`BookmarkManager`]

use startpage_bookmarks::{BookmarkError, BookmarkManager, BookmarkNode, ShortcutMatch};
use startpage_navigation::BookmarkCommand;

use crate::collaborators::{BookmarkOps, Navigator};
use crate::error::CoreError;
use crate::Result;

/// Shortcut-field keys that move the working folder instead of matching a key
const PARENT_FOLDER_KEY: &str = "-";
const ROOT_FOLDER_KEY: &str = "~";

/// Positional arguments: `required` first, then up to `optional` more
fn expect_args(
    args: &[String],
    command: BookmarkCommand,
    required: usize,
    optional: usize,
) -> Result<()> {
    if args.len() < required || args.len() > required + optional {
        return Err(CoreError::Usage(command.usage()));
    }
    Ok(())
}

fn open_folder(
    manager: &BookmarkManager,
    folder: &BookmarkNode,
    navigator: &mut dyn Navigator,
) -> Result<()> {
    let bookmarks = manager.bookmarks_in(Some(&folder.id))?;
    tracing::info!(folder = %folder.title, count = bookmarks.len(), "Opening folder");
    for bookmark in bookmarks {
        if let Some(url) = bookmark.url.as_deref() {
            navigator.open(url);
        }
    }
    Ok(())
}

fn no_match(key: &str) -> Result<bool> {
    // Nothing can match anymore; let the field reset
    tracing::warn!(key, "No bookmark for shortcut");
    Ok(true)
}

impl BookmarkOps for BookmarkManager {
    fn create_folder(&mut self, args: &[String]) -> Result<()> {
        expect_args(args, BookmarkCommand::Mkdir, 1, 1)?;
        BookmarkManager::create_folder(self, &args[0], args.get(1).map(String::as_str))?;
        Ok(())
    }

    fn remove(&mut self, args: &[String]) -> Result<()> {
        expect_args(args, BookmarkCommand::Rm, 1, 0)?;
        BookmarkManager::remove(self, &args[0])?;
        Ok(())
    }

    fn create_bookmark(&mut self, args: &[String]) -> Result<()> {
        expect_args(args, BookmarkCommand::Touch, 2, 1)?;
        BookmarkManager::create_bookmark(self, &args[0], &args[1], args.get(2).map(String::as_str))?;
        Ok(())
    }

    fn move_node(&mut self, args: &[String]) -> Result<()> {
        expect_args(args, BookmarkCommand::Mv, 2, 0)?;
        BookmarkManager::move_node(self, &args[0], &args[1])?;
        Ok(())
    }

    fn change_url(&mut self, args: &[String]) -> Result<()> {
        expect_args(args, BookmarkCommand::Echo, 2, 0)?;
        BookmarkManager::change_url(self, &args[1], &args[0])?;
        Ok(())
    }

    fn update_icon(&mut self, args: &[String]) -> Result<()> {
        expect_args(args, BookmarkCommand::Update, 1, 1)?;
        BookmarkManager::update_icon(self, &args[0], args.get(1).map(String::as_str))?;
        Ok(())
    }

    fn open_by_shortcut(&mut self, key: &str, navigator: &mut dyn Navigator) -> Result<bool> {
        match self.lookup_shortcut(key)? {
            ShortcutMatch::Exact(node) if node.is_folder() => {
                open_folder(self, &node, navigator)?;
                Ok(true)
            }
            ShortcutMatch::Exact(node) => {
                if let Some(url) = node.url.as_deref() {
                    navigator.replace(url);
                }
                Ok(true)
            }
            ShortcutMatch::Partial => Ok(false),
            ShortcutMatch::Missing => no_match(key),
        }
    }

    fn open_group_by_shortcut(
        &mut self,
        key: &str,
        navigator: &mut dyn Navigator,
    ) -> Result<bool> {
        match self.lookup_shortcut(key)? {
            ShortcutMatch::Exact(node) if node.is_folder() => {
                open_folder(self, &node, navigator)?;
                Ok(true)
            }
            ShortcutMatch::Exact(node) => {
                if let Some(url) = node.url.as_deref() {
                    navigator.open(url);
                }
                Ok(true)
            }
            ShortcutMatch::Partial => Ok(false),
            ShortcutMatch::Missing => no_match(key),
        }
    }

    fn set_folder_by_shortcut(&mut self, key: &str) -> Result<bool> {
        match key {
            PARENT_FOLDER_KEY => {
                let parent = match self.working_folder() {
                    Some(id) => self.get(id)?.parent_id,
                    None => None,
                };
                self.set_working_folder(parent)?;
                return Ok(true);
            }
            ROOT_FOLDER_KEY => {
                self.set_working_folder(None)?;
                return Ok(true);
            }
            _ => {}
        }

        match self.lookup_shortcut(key)? {
            ShortcutMatch::Exact(node) if node.is_folder() => {
                self.set_working_folder(Some(node.id))?;
                Ok(true)
            }
            ShortcutMatch::Exact(node) => Err(BookmarkError::NotAFolder(node.title).into()),
            ShortcutMatch::Partial => Ok(false),
            ShortcutMatch::Missing => no_match(key),
        }
    }

    fn open_all(&mut self, navigator: &mut dyn Navigator) -> Result<()> {
        let bookmarks = self.bookmarks_in(self.working_folder())?;
        tracing::info!(count = bookmarks.len(), "Opening all bookmarks");
        for bookmark in bookmarks {
            if let Some(url) = bookmark.url.as_deref() {
                navigator.open(url);
            }
        }
        Ok(())
    }
}
