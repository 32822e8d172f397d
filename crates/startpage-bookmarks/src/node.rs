//! Bookmark tree nodes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::error::BookmarkError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Folder,
    Bookmark,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Folder => "folder",
            NodeKind::Bookmark => "bookmark",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "folder" => Ok(NodeKind::Folder),
            "bookmark" => Ok(NodeKind::Bookmark),
            _ => Err(format!("Unknown node kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkNode {
    pub id: String,
    /// `None` for nodes at the root
    pub parent_id: Option<String>,
    pub kind: NodeKind,
    pub title: String,
    /// Always set for bookmarks, never for folders
    pub url: Option<String>,
    pub icon_url: Option<String>,
    /// Lower-case alphanumeric key, unique and prefix-free among siblings
    pub shortcut: Option<String>,
    /// Sort order among siblings
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookmarkNode {
    pub fn folder(parent_id: Option<String>, title: String) -> Self {
        Self::new(parent_id, NodeKind::Folder, title, None)
    }

    pub fn bookmark(parent_id: Option<String>, title: String, url: String) -> Self {
        Self::new(parent_id, NodeKind::Bookmark, title, Some(url))
    }

    fn new(parent_id: Option<String>, kind: NodeKind, title: String, url: Option<String>) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            parent_id,
            kind,
            title,
            url,
            icon_url: None,
            shortcut: None,
            position: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }
}

/// Accept `example.com/x` as well as full URLs; `https://` is assumed.
pub fn normalize_url(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(BookmarkError::InvalidUrl("URL cannot be empty".to_string()));
    }

    let candidate = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{input}")
    };

    Url::parse(&candidate)
        .map(String::from)
        .map_err(|e| BookmarkError::InvalidUrl(format!("{input}: {e}")))
}

/// Conventional icon location for a page: `<origin>/favicon.ico`
pub fn favicon_for(page_url: &str) -> Result<String> {
    let url = Url::parse(page_url)
        .map_err(|e| BookmarkError::InvalidUrl(format!("{page_url}: {e}")))?;

    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(BookmarkError::InvalidUrl(format!(
            "{page_url} has no origin to fetch an icon from"
        )));
    }

    Ok(format!("{}/favicon.ico", origin.ascii_serialization()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("example.com").unwrap(), "https://example.com/");
        assert_eq!(
            normalize_url(" http://localhost:3000/app ").unwrap(),
            "http://localhost:3000/app"
        );
        assert!(normalize_url("").is_err());
        assert!(normalize_url("https://exa mple.com").is_err());
    }

    #[test]
    fn test_favicon_for() {
        assert_eq!(
            favicon_for("https://news.ycombinator.com/item?id=1").unwrap(),
            "https://news.ycombinator.com/favicon.ico"
        );
        assert_eq!(
            favicon_for("http://localhost:8080/a/b").unwrap(),
            "http://localhost:8080/favicon.ico"
        );
        assert!(favicon_for("data:text/plain,hi").is_err());
    }

    #[test]
    fn test_node_kind_roundtrip() {
        for kind in [NodeKind::Folder, NodeKind::Bookmark] {
            assert_eq!(kind.as_str().parse::<NodeKind>().unwrap(), kind);
        }
        assert!("link".parse::<NodeKind>().is_err());
    }
}
