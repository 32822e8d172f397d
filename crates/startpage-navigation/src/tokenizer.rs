//! Search field tokenizer
//!
//! Splits a line into whitespace-separated tokens. A `"…"` or `'…'` run is
//! kept together even when it contains spaces, and glues onto unquoted text
//! it touches (`a"b c"` is one token). Unterminated quotes are dropped from
//! matching, so the surrounding text still comes through as plain tokens.

use regex::Regex;
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?:[^\s"']+|"[^"]*"|'[^']*')+"#).unwrap());

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Remove one leading and one trailing quote when the token has both.
/// A quote at only one end is kept: `foo"bar baz"` stays as it is.
fn strip_quotes(token: &str) -> &str {
    let mut chars = token.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if is_quote(first) && is_quote(last) => {
            &token[first.len_utf8()..token.len() - last.len_utf8()]
        }
        _ => token,
    }
}

pub fn tokenize(raw: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(raw)
        .map(|m| strip_quotes(m.as_str()).to_string())
        .collect()
}
