use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::error::PersistenceError;
use crate::parser::BeerRecord;

/// Compound index over the `styles` collection (one JSON document per beer).
pub const STYLE_INDEX: &str = "idx_styles_brew_id_beer_id";

pub fn connect(path: &str) -> Result<Connection> {
    if let Some(dir) = Path::new(path).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
    }
    let conn = Connection::open(path).with_context(|| format!("Failed to open {}", path))?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn close(conn: Connection) -> Result<()> {
    conn.close()
        .map_err(|(_, e)| e)
        .context("Failed to close database")
}

pub fn init_schema(conn: &Connection) -> Result<(), PersistenceError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS styles (
            id         INTEGER PRIMARY KEY,
            doc        TEXT NOT NULL CHECK(json_valid(doc)),
            scraped_at TEXT NOT NULL
        );
        ",
    )?;
    Ok(())
}

// ── Loading ──

/// Insert one style's records as a single all-or-nothing batch.
/// No dedup: running twice stores everything twice.
pub fn insert_beers(conn: &Connection, beers: &[BeerRecord]) -> Result<usize, PersistenceError> {
    let scraped_at = chrono::Utc::now().to_rfc3339();
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare("INSERT INTO styles (doc, scraped_at) VALUES (?1, ?2)")?;
        for beer in beers {
            let doc = serde_json::to_string(beer)?;
            count += stmt.execute(rusqlite::params![doc, scraped_at])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

/// Compound (brew_id DESC, beer_id DESC) index. Not unique; safe to call again.
pub fn create_style_index(conn: &Connection) -> Result<(), PersistenceError> {
    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_styles_brew_id_beer_id ON styles (
            json_extract(doc, '$.brew_id') DESC,
            json_extract(doc, '$.beer_id') DESC
        );
        ",
    )?;
    Ok(())
}

// ── Queries ──

pub fn has_style_index(conn: &Connection) -> Result<bool, PersistenceError> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = ?1",
        [STYLE_INDEX],
        |row| row.get(0),
    )?;
    Ok(n > 0)
}

pub fn count_beers(conn: &Connection) -> Result<usize, PersistenceError> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM styles", [], |row| row.get(0))?;
    Ok(n as usize)
}

pub fn load_beers(conn: &Connection, style_id: i64) -> Result<Vec<BeerRecord>, PersistenceError> {
    let mut stmt = conn.prepare(
        "SELECT doc FROM styles WHERE json_extract(doc, '$.style_id') = ?1 ORDER BY id",
    )?;
    let docs = stmt
        .query_map([style_id], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    docs.iter()
        .map(|d| serde_json::from_str(d).map_err(PersistenceError::from))
        .collect()
}

pub struct StyleCount {
    pub style_id: i64,
    pub style_name: String,
    pub beers: usize,
}

pub fn style_counts(conn: &Connection) -> Result<Vec<StyleCount>, PersistenceError> {
    let mut stmt = conn.prepare(
        "SELECT json_extract(doc, '$.style_id'), json_extract(doc, '$.style_name'), COUNT(*)
         FROM styles
         GROUP BY 1, 2
         ORDER BY 3 DESC, 1",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(StyleCount {
                style_id: row.get(0)?,
                style_name: row.get(1)?,
                beers: row.get::<_, i64>(2)? as usize,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
