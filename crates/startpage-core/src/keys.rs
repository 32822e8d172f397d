//! Keyboard events as the frontend reports them

use serde::{Deserialize, Serialize};

/// A DOM `KeyboardEvent.key` value
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Key {
    Enter,
    Escape,
    /// A key that produces a single character, including `" "`
    Char(char),
    /// Any other named key (`Tab`, `ArrowUp`, …)
    Named(String),
}

impl Key {
    pub fn parse(key: &str) -> Self {
        match key {
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Named(key.to_string()),
                }
            }
        }
    }
}

impl From<&str> for Key {
    fn from(key: &str) -> Self {
        Key::parse(key)
    }
}

impl From<String> for Key {
    fn from(key: String) -> Self {
        Key::parse(&key)
    }
}

/// Which field holds focus when a document-level key arrives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    #[default]
    None,
    Search,
    Shortcuts,
}

/// Whether the frontend must suppress the key's default action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KeyOutcome {
    pub prevent_default: bool,
}

impl KeyOutcome {
    pub const PASS: KeyOutcome = KeyOutcome {
        prevent_default: false,
    };
    pub const PREVENT: KeyOutcome = KeyOutcome {
        prevent_default: true,
    };
}
