//! Database migrations
//!
//! v1: settings and the bookmark tree

use crate::{Result, StorageError};
use rusqlite::Connection;

const SCHEMA_VERSION: i32 = 1;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
        [],
    )?;

    let current_version = schema_version(conn)?;
    if current_version > SCHEMA_VERSION {
        return Err(StorageError::Migration {
            version: current_version,
            reason: format!("database is newer than supported version {SCHEMA_VERSION}"),
        });
    }

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [SCHEMA_VERSION],
    )?;
    Ok(())
}

fn schema_version(conn: &Connection) -> Result<i32> {
    match conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
        row.get(0)
    }) {
        Ok(v) => Ok(v),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

fn migrate_v1(conn: &Connection) -> Result<()> {
    tracing::info!("Running migration v1: settings and bookmarks");

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    "#,
    )?;

    // parent_id NULL means the node sits at the root of the tree
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS bookmarks (
            id TEXT PRIMARY KEY,
            parent_id TEXT,
            kind TEXT NOT NULL CHECK (kind IN ('folder', 'bookmark')),
            title TEXT NOT NULL,
            url TEXT,
            icon_url TEXT,
            shortcut TEXT,
            position INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (parent_id) REFERENCES bookmarks(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_bookmarks_parent ON bookmarks(parent_id);
        CREATE INDEX IF NOT EXISTS idx_bookmarks_shortcut ON bookmarks(shortcut);
    "#,
    )
    .map_err(|e| StorageError::Migration {
        version: 1,
        reason: e.to_string(),
    })?;

    Ok(())
}
