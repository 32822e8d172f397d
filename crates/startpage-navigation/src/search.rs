//! Search resolution for free text
//!
//! First match wins:
//!   1. Looks like it has a TLD → navigate to it (adding `https://`)
//!   2. Starts with `:` → localhost port/path
//!   3. No bang active → default search engine
//!   4. Active bang provider

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use std::sync::LazyLock;

use crate::bang::BangSession;
use crate::error::NavigationError;
use crate::Result;

/// Marker substituted with the encoded query in every search template
pub const QUERY_PLACEHOLDER: &str = "{{{s}}}";

pub const DEFAULT_SEARCH_ENGINE: &str = "https://encrypted.google.com/search?q={{{s}}}";

/// A dot followed by 2-63 letters anywhere in the query
static TLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.[a-zA-Z]{2,63}").unwrap());

/// Characters `encodeURIComponent` leaves alone
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

pub fn validate_template(template: &str) -> Result<()> {
    if template.contains(QUERY_PLACEHOLDER) {
        Ok(())
    } else {
        Err(NavigationError::InvalidTemplate(template.to_string()))
    }
}

fn fill_template(template: &str, query: &str) -> String {
    template.replacen(QUERY_PLACEHOLDER, &encode_component(query), 1)
}

#[derive(Debug, Clone)]
pub struct SearchResolver {
    search_template: String,
}

impl SearchResolver {
    pub fn new() -> Self {
        Self {
            search_template: DEFAULT_SEARCH_ENGINE.to_string(),
        }
    }

    pub fn with_search_engine(template: String) -> Result<Self> {
        validate_template(&template)?;
        Ok(Self {
            search_template: template,
        })
    }

    pub fn set_search_engine(&mut self, template: String) -> Result<()> {
        validate_template(&template)?;
        self.search_template = template;
        Ok(())
    }

    pub fn search_template(&self) -> &str {
        &self.search_template
    }

    /// Turn a search line into the URL the page should be replaced with
    pub fn resolve(&self, query: &str, bang: &BangSession) -> String {
        if TLD_RE.is_match(query) {
            return if query.starts_with("http") {
                query.to_string()
            } else {
                format!("https://{query}")
            };
        }

        if query.starts_with(':') {
            return format!("http://localhost{query}");
        }

        match bang.active() {
            None => fill_template(&self.search_template, query),
            Some(provider) => {
                tracing::debug!(bang = %provider.key, "Searching with bang provider");
                fill_template(&provider.url, query)
            }
        }
    }
}

impl Default for SearchResolver {
    fn default() -> Self {
        Self::new()
    }
}
