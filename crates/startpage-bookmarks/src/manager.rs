//! Bookmark Manager
//!
//! Owns the bookmark tree and the working folder. Shortcut keys are looked
//! up among the children of the working folder only.

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row};

use startpage_storage::Database;

use crate::error::BookmarkError;
use crate::node::{favicon_for, normalize_url, BookmarkNode, NodeKind};
use crate::Result;

const NODE_COLUMNS: &str =
    "id, parent_id, kind, title, url, icon_url, shortcut, position, created_at, updated_at";

const WORKING_FOLDER_KEY: &str = "working_folder";

/// Outcome of matching typed text against the working folder's shortcut keys
#[derive(Debug, Clone, PartialEq)]
pub enum ShortcutMatch {
    Exact(BookmarkNode),
    /// Typed text is the beginning of at least one key
    Partial,
    Missing,
}

fn parse_time(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn node_from_row(row: &Row<'_>) -> rusqlite::Result<BookmarkNode> {
    let kind: String = row.get(2)?;
    let created_str: String = row.get(8)?;
    let updated_str: String = row.get(9)?;

    Ok(BookmarkNode {
        id: row.get(0)?,
        parent_id: row.get(1)?,
        kind: kind.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, e.into())
        })?,
        title: row.get(3)?,
        url: row.get(4)?,
        icon_url: row.get(5)?,
        shortcut: row.get(6)?,
        position: row.get(7)?,
        created_at: parse_time(&created_str),
        updated_at: parse_time(&updated_str),
    })
}

/// Split `a/b/c` into (`a/b`, `c`). A leading `/` keeps the path absolute.
fn split_path(path: &str) -> (&str, &str) {
    let path = path.trim().trim_end_matches('/');
    match path.rsplit_once('/') {
        Some(("", name)) => ("/", name),
        Some((parent, name)) => (parent, name),
        None => ("", path),
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() || title.contains('/') || title == "." || title == ".." {
        return Err(BookmarkError::InvalidName(title.to_string()));
    }
    Ok(())
}

fn validate_shortcut(key: &str) -> Result<String> {
    let key = key.trim().to_lowercase();
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(BookmarkError::InvalidShortcut(key));
    }
    Ok(key)
}

/// Two keys clash when one is a prefix of the other, since typing the
/// shorter one would always win.
fn clashing<'a>(siblings: &'a [BookmarkNode], key: &str) -> Option<&'a BookmarkNode> {
    siblings.iter().find(|node| {
        node.shortcut
            .as_deref()
            .is_some_and(|s| s.starts_with(key) || key.starts_with(s))
    })
}

/// First free single-character key: letters of the title, then a-z, then 0-9
fn default_shortcut(title: &str, siblings: &[BookmarkNode]) -> Option<String> {
    title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .chain('a'..='z')
        .chain('0'..='9')
        .map(String::from)
        .find(|key| clashing(siblings, key).is_none())
}

pub struct BookmarkManager {
    db: Database,
    /// `None` is the root of the tree
    working_folder: Option<String>,
}

impl BookmarkManager {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            working_folder: None,
        }
    }

    /// Restore the persisted working folder, falling back to the root
    pub fn load(&mut self) -> Result<()> {
        self.working_folder = match self.db.setting(WORKING_FOLDER_KEY)? {
            Some(id) => match self.get(&id) {
                Ok(node) if node.is_folder() => Some(node.id),
                _ => {
                    tracing::warn!(folder_id = %id, "Stored working folder is gone, using root");
                    None
                }
            },
            None => None,
        };

        tracing::info!(working_folder = %self.working_path()?, "Bookmarks loaded");
        Ok(())
    }

    pub fn working_folder(&self) -> Option<&str> {
        self.working_folder.as_deref()
    }

    pub fn set_working_folder(&mut self, folder_id: Option<String>) -> Result<()> {
        match folder_id.as_deref() {
            Some(id) => {
                let node = self.get(id)?;
                if !node.is_folder() {
                    return Err(BookmarkError::NotAFolder(node.title));
                }
                self.db.put_setting(WORKING_FOLDER_KEY, id)?;
            }
            None => self.db.delete_setting(WORKING_FOLDER_KEY)?,
        }

        self.working_folder = folder_id;
        tracing::debug!(working_folder = %self.working_path()?, "Working folder changed");
        Ok(())
    }

    /// Absolute path of the working folder, `/` for the root
    pub fn working_path(&self) -> Result<String> {
        let mut titles = Vec::new();
        let mut current = self.working_folder.clone();
        while let Some(id) = current {
            let node = self.get(&id)?;
            titles.push(node.title);
            current = node.parent_id;
        }
        titles.reverse();
        Ok(format!("/{}", titles.join("/")))
    }

    pub fn get(&self, id: &str) -> Result<BookmarkNode> {
        self.db
            .with_connection(|conn| {
                Ok(conn
                    .query_row(
                        &format!("SELECT {NODE_COLUMNS} FROM bookmarks WHERE id = ?1"),
                        [id],
                        node_from_row,
                    )
                    .optional()?)
            })?
            .ok_or_else(|| BookmarkError::NotFound(id.to_string()))
    }

    /// Direct children of a folder in display order
    pub fn children(&self, parent_id: Option<&str>) -> Result<Vec<BookmarkNode>> {
        Ok(self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {NODE_COLUMNS} FROM bookmarks
                 WHERE parent_id IS ?1
                 ORDER BY position, created_at"
            ))?;

            let nodes = stmt
                .query_map([parent_id], node_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(nodes)
        })?)
    }

    /// Bookmarks (not folders) directly inside a folder
    pub fn bookmarks_in(&self, folder_id: Option<&str>) -> Result<Vec<BookmarkNode>> {
        Ok(self
            .children(folder_id)?
            .into_iter()
            .filter(|node| node.kind == NodeKind::Bookmark)
            .collect())
    }

    fn child_named(&self, parent_id: Option<&str>, title: &str) -> Result<Option<BookmarkNode>> {
        Ok(self.db.with_connection(|conn| {
            Ok(conn
                .query_row(
                    &format!(
                        "SELECT {NODE_COLUMNS} FROM bookmarks WHERE parent_id IS ?1 AND title = ?2"
                    ),
                    rusqlite::params![parent_id, title],
                    node_from_row,
                )
                .optional()?)
        })?)
    }

    /// Walk a folder path from the working folder (or the root for `/…`).
    /// With `create_missing`, absent folders are created along the way.
    fn walk(&self, path: &str, create_missing: bool) -> Result<Option<String>> {
        let (mut current, rest) = match path.trim().strip_prefix('/') {
            Some(rest) => (None, rest),
            None => (self.working_folder.clone(), path.trim()),
        };

        for part in rest.split('/').filter(|p| !p.is_empty() && *p != ".") {
            if part == ".." {
                current = match current {
                    Some(id) => self.get(&id)?.parent_id,
                    None => None,
                };
                continue;
            }

            current = match self.child_named(current.as_deref(), part)? {
                Some(node) if node.is_folder() => Some(node.id),
                Some(_) => return Err(BookmarkError::NotAFolder(part.to_string())),
                None if create_missing => {
                    Some(self.insert(current.as_deref(), NodeKind::Folder, part, None, None)?.id)
                }
                None => return Err(BookmarkError::NotFound(path.to_string())),
            };
        }

        Ok(current)
    }

    /// Find the node a command path names
    pub fn find(&self, path: &str) -> Result<BookmarkNode> {
        let (parent_path, name) = split_path(path);
        validate_title(name)?;

        let parent_id = self.walk(parent_path, false)?;
        self.child_named(parent_id.as_deref(), name)?
            .ok_or_else(|| BookmarkError::NotFound(path.to_string()))
    }

    fn insert(
        &self,
        parent_id: Option<&str>,
        kind: NodeKind,
        title: &str,
        url: Option<String>,
        key: Option<&str>,
    ) -> Result<BookmarkNode> {
        validate_title(title)?;
        let siblings = self.children(parent_id)?;

        if siblings.iter().any(|node| node.title == title) {
            return Err(BookmarkError::AlreadyExists(title.to_string()));
        }

        let shortcut = match key {
            Some(key) => {
                let key = validate_shortcut(key)?;
                if let Some(existing) = clashing(&siblings, &key) {
                    return Err(BookmarkError::ShortcutConflict {
                        key,
                        existing: existing.title.clone(),
                    });
                }
                Some(key)
            }
            None => default_shortcut(title, &siblings),
        };

        let parent = parent_id.map(str::to_string);
        let mut node = match (kind, url) {
            (NodeKind::Bookmark, Some(url)) => BookmarkNode::bookmark(parent, title.to_string(), url),
            (NodeKind::Bookmark, None) => {
                return Err(BookmarkError::InvalidUrl("URL cannot be empty".to_string()))
            }
            (NodeKind::Folder, _) => BookmarkNode::folder(parent, title.to_string()),
        };
        node.shortcut = shortcut;
        node.position = siblings.iter().map(|n| n.position).max().map_or(0, |p| p + 1);

        self.db.with_connection(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO bookmarks ({NODE_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
                ),
                rusqlite::params![
                    node.id,
                    node.parent_id,
                    node.kind.as_str(),
                    node.title,
                    node.url,
                    node.icon_url,
                    node.shortcut,
                    node.position,
                    node.created_at.to_rfc3339(),
                    node.updated_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })?;

        tracing::info!(
            id = %node.id,
            kind = %node.kind,
            title = %node.title,
            shortcut = node.shortcut.as_deref().unwrap_or(""),
            "Created bookmark node"
        );

        Ok(node)
    }

    /// `mkdir`: intermediate folders are created as needed
    pub fn create_folder(&self, path: &str, key: Option<&str>) -> Result<BookmarkNode> {
        let (parent_path, name) = split_path(path);
        validate_title(name)?;

        let parent_id = self.walk(parent_path, true)?;
        self.insert(parent_id.as_deref(), NodeKind::Folder, name, None, key)
    }

    /// `touch`: new bookmark in the working folder
    pub fn create_bookmark(&self, title: &str, url: &str, key: Option<&str>) -> Result<BookmarkNode> {
        let url = normalize_url(url)?;
        self.insert(
            self.working_folder.as_deref(),
            NodeKind::Bookmark,
            title,
            Some(url),
            key,
        )
    }

    /// `rm`: folders take their contents with them
    pub fn remove(&mut self, path: &str) -> Result<BookmarkNode> {
        let node = self.find(path)?;

        self.db.with_connection(|conn| {
            conn.execute("DELETE FROM bookmarks WHERE id = ?1", [&node.id])?;
            Ok(())
        })?;
        tracing::info!(id = %node.id, title = %node.title, "Removed bookmark node");

        if let Some(working) = self.working_folder.clone() {
            if matches!(self.get(&working), Err(BookmarkError::NotFound(_))) {
                self.set_working_folder(None)?;
            }
        }

        Ok(node)
    }

    /// `mv`: re-parent a node, appending it to the destination folder
    pub fn move_node(&self, path: &str, destination: &str) -> Result<BookmarkNode> {
        let mut node = self.find(path)?;
        let dest_id = self.walk(destination, false)?;

        if node.is_folder() {
            let mut cursor = dest_id.clone();
            while let Some(id) = cursor {
                if id == node.id {
                    return Err(BookmarkError::InvalidMove(node.title));
                }
                cursor = self.get(&id)?.parent_id;
            }
        }

        let siblings: Vec<BookmarkNode> = self
            .children(dest_id.as_deref())?
            .into_iter()
            .filter(|n| n.id != node.id)
            .collect();

        if siblings.iter().any(|n| n.title == node.title) {
            return Err(BookmarkError::AlreadyExists(node.title));
        }

        let keeps_key = node
            .shortcut
            .as_deref()
            .is_some_and(|key| clashing(&siblings, key).is_none());
        if !keeps_key {
            node.shortcut = default_shortcut(&node.title, &siblings);
        }

        node.parent_id = dest_id;
        node.position = siblings.iter().map(|n| n.position).max().map_or(0, |p| p + 1);
        node.updated_at = Utc::now();

        self.db.with_connection(|conn| {
            conn.execute(
                "UPDATE bookmarks
                 SET parent_id = ?1, position = ?2, shortcut = ?3, updated_at = ?4
                 WHERE id = ?5",
                rusqlite::params![
                    node.parent_id,
                    node.position,
                    node.shortcut,
                    node.updated_at.to_rfc3339(),
                    node.id,
                ],
            )?;
            Ok(())
        })?;

        tracing::info!(id = %node.id, destination, "Moved bookmark node");
        Ok(node)
    }

    fn find_bookmark(&self, path: &str) -> Result<BookmarkNode> {
        let node = self.find(path)?;
        if node.is_folder() {
            return Err(BookmarkError::NotABookmark(path.to_string()));
        }
        Ok(node)
    }

    /// `echo`: point a bookmark somewhere else
    pub fn change_url(&self, path: &str, url: &str) -> Result<BookmarkNode> {
        let mut node = self.find_bookmark(path)?;
        node.url = Some(normalize_url(url)?);
        node.updated_at = Utc::now();

        self.db.with_connection(|conn| {
            conn.execute(
                "UPDATE bookmarks SET url = ?1, updated_at = ?2 WHERE id = ?3",
                rusqlite::params![node.url, node.updated_at.to_rfc3339(), node.id],
            )?;
            Ok(())
        })?;

        tracing::info!(id = %node.id, url = node.url.as_deref().unwrap_or(""), "Changed bookmark URL");
        Ok(node)
    }

    /// `update`: set the icon, defaulting to the site's `/favicon.ico`
    pub fn update_icon(&self, path: &str, icon_url: Option<&str>) -> Result<BookmarkNode> {
        let mut node = self.find_bookmark(path)?;
        let icon = match icon_url {
            Some(icon) => normalize_url(icon)?,
            None => favicon_for(node.url.as_deref().unwrap_or_default())?,
        };

        node.icon_url = Some(icon);
        node.updated_at = Utc::now();

        self.db.with_connection(|conn| {
            conn.execute(
                "UPDATE bookmarks SET icon_url = ?1, updated_at = ?2 WHERE id = ?3",
                rusqlite::params![node.icon_url, node.updated_at.to_rfc3339(), node.id],
            )?;
            Ok(())
        })?;

        Ok(node)
    }

    /// Match typed text against the keys in the working folder
    pub fn lookup_shortcut(&self, typed: &str) -> Result<ShortcutMatch> {
        let typed = typed.trim().to_lowercase();
        if typed.is_empty() {
            return Ok(ShortcutMatch::Partial);
        }

        let children = self.children(self.working_folder.as_deref())?;
        let mut partial = false;
        for node in children {
            match node.shortcut.as_deref() {
                Some(key) if key == typed => return Ok(ShortcutMatch::Exact(node)),
                Some(key) if key.starts_with(&typed) => partial = true,
                _ => {}
            }
        }

        Ok(if partial {
            ShortcutMatch::Partial
        } else {
            ShortcutMatch::Missing
        })
    }
}
