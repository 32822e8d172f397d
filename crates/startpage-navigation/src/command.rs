//! Command resolution for the search field
//!
//! Bookmark commands mirror shell verbs:
//! - `mkdir` create a folder
//! - `rm` remove a bookmark or folder
//! - `touch` create a bookmark
//! - `mv` move a node into a folder
//! - `echo` change a bookmark URL
//! - `update` refresh a bookmark icon
//!
//! `tip` drives the tip panel. Every other line is a search.

use serde::{Deserialize, Serialize};

use crate::tokenizer::tokenize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkCommand {
    Mkdir,
    Rm,
    Touch,
    Mv,
    Echo,
    Update,
}

impl BookmarkCommand {
    pub const ALL: [BookmarkCommand; 6] = [
        BookmarkCommand::Mkdir,
        BookmarkCommand::Rm,
        BookmarkCommand::Touch,
        BookmarkCommand::Mv,
        BookmarkCommand::Echo,
        BookmarkCommand::Update,
    ];

    /// Case-sensitive: `MKDIR foo` is a search.
    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.as_str() == word)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookmarkCommand::Mkdir => "mkdir",
            BookmarkCommand::Rm => "rm",
            BookmarkCommand::Touch => "touch",
            BookmarkCommand::Mv => "mv",
            BookmarkCommand::Echo => "echo",
            BookmarkCommand::Update => "update",
        }
    }

    /// Argument synopsis shown when a command is misused
    pub fn usage(&self) -> &'static str {
        match self {
            BookmarkCommand::Mkdir => "mkdir <path> [key]",
            BookmarkCommand::Rm => "rm <path>",
            BookmarkCommand::Touch => "touch <name> <url> [key]",
            BookmarkCommand::Mv => "mv <path> <folder>",
            BookmarkCommand::Echo => "echo <url> <path>",
            BookmarkCommand::Update => "update <path> [icon-url]",
        }
    }
}

impl std::fmt::Display for BookmarkCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkOp {
    pub kind: BookmarkCommand,
    /// Tokens after the command word
    pub args: Vec<String>,
}

/// What a committed search line asks for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Dispatch {
    Bookmark(BookmarkOp),
    Tip { args: Vec<String> },
    /// The trimmed line, untouched by tokenizing so spacing and quotes survive
    Search { raw_query: String },
}

impl Dispatch {
    pub fn resolve(raw: &str) -> Self {
        let line = raw.trim();
        Self::from_tokens(tokenize(line), line)
    }

    pub fn from_tokens(tokens: Vec<String>, raw_query: &str) -> Self {
        let mut tokens = tokens.into_iter();
        let Some(word) = tokens.next() else {
            return Dispatch::Search {
                raw_query: raw_query.to_string(),
            };
        };

        if let Some(kind) = BookmarkCommand::from_word(&word) {
            return Dispatch::Bookmark(BookmarkOp {
                kind,
                args: tokens.collect(),
            });
        }

        if word == "tip" {
            return Dispatch::Tip {
                args: tokens.collect(),
            };
        }

        Dispatch::Search {
            raw_query: raw_query.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_bookmark_commands() {
        let dispatch = Dispatch::from_tokens(strings(&["rm", "x"]), "rm x");
        assert_eq!(
            dispatch,
            Dispatch::Bookmark(BookmarkOp {
                kind: BookmarkCommand::Rm,
                args: strings(&["x"]),
            })
        );

        for cmd in BookmarkCommand::ALL {
            match Dispatch::resolve(&format!("{cmd} a \"b c\"")) {
                Dispatch::Bookmark(op) => {
                    assert_eq!(op.kind, cmd);
                    assert_eq!(op.args, strings(&["a", "b c"]));
                }
                other => panic!("Expected Bookmark, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_tip_command() {
        assert_eq!(
            Dispatch::resolve("tip add read the docs"),
            Dispatch::Tip {
                args: strings(&["add", "read", "the", "docs"])
            }
        );
        assert_eq!(Dispatch::resolve("tip"), Dispatch::Tip { args: vec![] });
    }

    #[test]
    fn test_search_keeps_original_line() {
        assert_eq!(
            Dispatch::from_tokens(strings(&["foo", "bar"]), "foo   bar"),
            Dispatch::Search {
                raw_query: "foo   bar".to_string()
            }
        );
        assert_eq!(
            Dispatch::resolve("  rust \"borrow checker\"  "),
            Dispatch::Search {
                raw_query: "rust \"borrow checker\"".to_string()
            }
        );
    }

    #[test]
    fn test_command_words_are_case_sensitive() {
        assert!(matches!(
            Dispatch::resolve("MKDIR work"),
            Dispatch::Search { .. }
        ));
        assert!(matches!(Dispatch::resolve("Tip"), Dispatch::Search { .. }));
    }

    #[test]
    fn test_empty_line_is_search() {
        assert_eq!(
            Dispatch::resolve("   "),
            Dispatch::Search {
                raw_query: String::new()
            }
        );
    }
}
