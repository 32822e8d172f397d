//! Page view model
//!
//! Everything the frontend renders. The controller writes it, the frontend
//! copies it into the DOM after each event.

use serde::Serialize;

use crate::keys::Focus;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldState {
    pub value: String,
    pub focused: bool,
}

/// Help panel visibility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Panels {
    pub shortcuts: bool,
    pub commands: bool,
}

impl Panels {
    /// `c` commands, `s` shortcuts, `x` close both; other keys change nothing
    pub fn toggle(&mut self, choice: &str) {
        match choice {
            "c" => {
                self.commands = true;
                self.shortcuts = false;
            }
            "s" => {
                self.shortcuts = true;
                self.commands = false;
            }
            "x" => {
                self.shortcuts = false;
                self.commands = false;
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub search: FieldState,
    pub shortcuts: FieldState,
    /// Single character naming the active shortcut handler, empty by default
    pub context_label: String,
    /// Active bang provider, hidden when `None`
    pub bang_badge: Option<String>,
    pub panels: Panels,
    pub tip: Option<String>,
    /// Last reported failure
    pub status: Option<String>,
}

impl PageView {
    pub fn focus(&self) -> Focus {
        if self.search.focused {
            Focus::Search
        } else if self.shortcuts.focused {
            Focus::Shortcuts
        } else {
            Focus::None
        }
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.search.focused = focus == Focus::Search;
        self.shortcuts.focused = focus == Focus::Shortcuts;
    }
}
