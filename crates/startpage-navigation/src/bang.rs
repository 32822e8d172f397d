//! Bangs: `!name ` in an empty search field selects another search provider
//!
//! ```text
//! Idle
//!   ↓ '!' typed into an empty field
//! Composing
//!   ↓ space, name found in the bang table
//! Active(provider)
//!   ↓ Escape (from Composing or Active)
//! Idle
//! ```
//!
//! A committed search does not leave `Active`; only Escape does.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::search::validate_template;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BangProvider {
    /// Bang name without the leading `!`
    #[serde(default)]
    pub key: String,
    /// Display name, shown lower-cased in the badge
    pub name: String,
    /// Search URL template containing `{{{s}}}`
    pub url: String,
}

impl BangProvider {
    pub fn new(key: &str, name: &str, url: &str) -> Self {
        Self {
            key: key.to_lowercase(),
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    pub fn badge(&self) -> String {
        self.name.to_lowercase()
    }
}

const BUILTIN_BANGS: &[(&str, &str, &str)] = &[
    ("g", "Google", "https://encrypted.google.com/search?q={{{s}}}"),
    ("ddg", "DuckDuckGo", "https://duckduckgo.com/?q={{{s}}}"),
    ("b", "Bing", "https://www.bing.com/search?q={{{s}}}"),
    ("w", "Wikipedia", "https://en.wikipedia.org/wiki/Special:Search?search={{{s}}}"),
    ("gh", "GitHub", "https://github.com/search?q={{{s}}}"),
    ("yt", "YouTube", "https://www.youtube.com/results?search_query={{{s}}}"),
    ("r", "Reddit", "https://www.reddit.com/search?q={{{s}}}"),
    ("so", "Stack Overflow", "https://stackoverflow.com/search?q={{{s}}}"),
    ("a", "Amazon", "https://www.amazon.com/s?k={{{s}}}"),
    ("m", "Google Maps", "https://www.google.com/maps/search/{{{s}}}"),
    ("crates", "crates.io", "https://crates.io/search?q={{{s}}}"),
    ("docs", "docs.rs", "https://docs.rs/releases/search?query={{{s}}}"),
    ("mdn", "MDN", "https://developer.mozilla.org/en-US/search?q={{{s}}}"),
];

/// Bang name → provider. Names are stored and looked up lower-cased.
#[derive(Debug, Clone, Default)]
pub struct BangTable {
    providers: HashMap<String, BangProvider>,
}

impl BangTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (key, name, url) in BUILTIN_BANGS {
            table.insert(BangProvider::new(key, name, url));
        }
        table
    }

    /// Parse `{ "<key>": { "name": …, "url": … }, … }`
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: HashMap<String, BangProvider> = serde_json::from_str(json)?;

        let mut table = Self::empty();
        for (key, mut provider) in entries {
            validate_template(&provider.url)?;
            provider.key = key.to_lowercase();
            table.insert(provider);
        }
        Ok(table)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let table = Self::from_json(&json)?;
        tracing::info!(
            path = %path.as_ref().display(),
            count = table.len(),
            "Loaded bang table"
        );
        Ok(table)
    }

    pub fn insert(&mut self, provider: BangProvider) {
        self.providers.insert(provider.key.clone(), provider);
    }

    /// Add every provider of `other`, replacing entries with the same key
    pub fn merge(&mut self, other: BangTable) {
        self.providers.extend(other.providers);
    }

    pub fn lookup(&self, name: &str) -> Option<&BangProvider> {
        self.providers.get(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BangSession {
    #[default]
    Idle,
    /// `!` typed, provider name not finished yet
    Composing,
    Active(BangProvider),
}

impl BangSession {
    /// Start composing a bang name. Drops any active provider.
    pub fn arm(&mut self) {
        if let BangSession::Active(provider) = self {
            tracing::debug!(bang = %provider.key, "Replacing active bang");
        }
        *self = BangSession::Composing;
    }

    /// Space pressed while composing: look up the field content.
    ///
    /// Returns the newly active provider. An unknown name leaves the
    /// session composing so the user can keep typing.
    pub fn complete(&mut self, field: &str, table: &BangTable) -> Option<&BangProvider> {
        if !self.is_composing() {
            return None;
        }

        let name = field.strip_prefix('!').unwrap_or(field);
        let Some(provider) = table.lookup(name) else {
            tracing::debug!(name, "Unknown bang");
            return None;
        };

        tracing::debug!(bang = %provider.key, "Bang activated");
        *self = BangSession::Active(provider.clone());
        self.active()
    }

    pub fn clear(&mut self) {
        *self = BangSession::Idle;
    }

    pub fn active(&self) -> Option<&BangProvider> {
        match self {
            BangSession::Active(provider) => Some(provider),
            _ => None,
        }
    }

    pub fn is_composing(&self) -> bool {
        matches!(self, BangSession::Composing)
    }

    /// Badge text: the provider name lower-cased while active
    pub fn badge(&self) -> Option<String> {
        self.active().map(BangProvider::badge)
    }
}
