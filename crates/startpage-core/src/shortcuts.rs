//! Shortcut modal routing
//!
//! The shortcuts field is read by exactly one handler at a time:
//! ```text
//! OpenBookmark (default, no label)
//!   ↓ '?'        ↓ ';'             ↓ ' '
//! Help ("?")   SetFolder ("f")   GroupOpen ("g")
//!   ↓ handler reports the input complete, or Escape
//! OpenBookmark
//! ```

use serde::Serialize;

use crate::collaborators::{BookmarkOps, Navigator};
use crate::view::PageView;
use crate::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortcutHandler {
    /// Open the bookmark whose key was typed
    #[default]
    OpenBookmark,
    /// Toggle the help panels
    Help,
    /// Enter the folder whose key was typed
    SetFolder,
    /// Open every bookmark of the folder whose key was typed
    GroupOpen,
}

/// What a handler may touch while consuming input
pub struct ShortcutContext<'a> {
    pub bookmarks: &'a mut dyn BookmarkOps,
    pub navigator: &'a mut dyn Navigator,
    pub view: &'a mut PageView,
}

impl ShortcutHandler {
    pub fn label(&self) -> &'static str {
        match self {
            ShortcutHandler::OpenBookmark => "",
            ShortcutHandler::Help => "?",
            ShortcutHandler::SetFolder => "f",
            ShortcutHandler::GroupOpen => "g",
        }
    }

    /// `Ok(true)` when the input completed an interaction
    pub fn consume(&self, input: &str, cx: &mut ShortcutContext<'_>) -> Result<bool> {
        match self {
            ShortcutHandler::OpenBookmark => {
                cx.bookmarks.open_by_shortcut(input, &mut *cx.navigator)
            }
            ShortcutHandler::GroupOpen => {
                cx.bookmarks.open_group_by_shortcut(input, &mut *cx.navigator)
            }
            ShortcutHandler::SetFolder => cx.bookmarks.set_folder_by_shortcut(input),
            ShortcutHandler::Help => {
                cx.view.panels.toggle(input);
                Ok(true)
            }
        }
    }
}

/// Set once the page starts unloading so late input cannot navigate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnloadGuard {
    unloading: bool,
}

impl UnloadGuard {
    pub fn begin(&mut self) {
        self.unloading = true;
    }

    pub fn cancel(&mut self) {
        self.unloading = false;
    }

    pub fn is_unloading(&self) -> bool {
        self.unloading
    }
}

#[derive(Debug, Default)]
pub struct ShortcutRouter {
    handler: ShortcutHandler,
}

impl ShortcutRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler(&self) -> ShortcutHandler {
        self.handler
    }

    pub fn switch_to(&mut self, handler: ShortcutHandler, view: &mut PageView) {
        tracing::debug!(from = ?self.handler, to = ?handler, "Switching shortcut handler");
        self.handler = handler;
        view.shortcuts.value.clear();
        view.context_label = handler.label().to_string();
    }

    /// Back to the default handler with an empty field and no label
    pub fn reset(&mut self, view: &mut PageView) {
        self.handler = ShortcutHandler::default();
        view.shortcuts.value.clear();
        view.context_label.clear();
    }

    /// Feed the shortcuts field content to the installed handler.
    ///
    /// Returns whether the input was consumed. A failing handler leaves
    /// the router untouched and hands the error back for reporting.
    pub fn route(
        &mut self,
        input: &str,
        cx: &mut ShortcutContext<'_>,
        guard: &UnloadGuard,
    ) -> Result<bool> {
        if guard.is_unloading() {
            tracing::debug!("Ignoring shortcut input while unloading");
            return Ok(false);
        }

        cx.view.shortcuts.value = input.to_string();
        let done = self.handler.consume(input, cx)?;
        if done {
            self.reset(cx.view);
        }
        Ok(done)
    }
}
