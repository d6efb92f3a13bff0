//! Append-only research archive.
//!
//! Stores previously fetched records in a local SQLite table keyed by an
//! autoincrement id. Rows are only ever appended or read back in full for
//! display.

use crate::error::Result;
use crate::merge::RankedRow;
use crate::record::NA;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS research_archive (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT,
    authors     TEXT,
    institution TEXT,
    year        TEXT,
    type        TEXT,
    citations   INTEGER,
    doi         TEXT
)
"#;

/// One archived record, as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    pub id: i64,
    pub title: String,
    pub authors: String,
    pub institution: String,
    pub year: String,
    #[serde(rename = "type")]
    pub work_type: String,
    pub citations: i64,
    pub doi: String,
}

/// Archive handle over a SQLite connection
pub struct Archive {
    conn: Connection,
}

/// Default archive location: `~/.research_archive.db`
pub fn default_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".research_archive.db")
}

impl Archive {
    /// Open (or create) the archive at `path`, initializing the schema.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA_SQL)?;
        debug!(path = %path.display(), "Archive opened");
        Ok(Self { conn })
    }

    /// Append one ranked row. Returns the assigned id.
    pub fn append(&self, row: &RankedRow) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO research_archive (title, authors, institution, year, type, citations, doi)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                row.title,
                row.authors,
                row.institution,
                row.year.to_string(),
                row.work_type.as_deref().unwrap_or(NA),
                row.overall_citations as i64,
                row.doi.as_deref().unwrap_or(NA),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Append a batch of ranked rows in one transaction. Returns how many
    /// were written; a failed batch leaves the table untouched.
    pub fn append_all(&self, rows: &[RankedRow]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        for row in rows {
            self.append(row)?;
        }
        tx.commit()?;
        info!(count = rows.len(), "Archived ranked rows");
        Ok(rows.len())
    }

    /// Read the full table contents in insertion order.
    pub fn list(&self) -> Result<Vec<ArchiveRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, authors, institution, year, type, citations, doi
             FROM research_archive ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ArchiveRecord {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    authors: row.get(2)?,
                    institution: row.get(3)?,
                    year: row.get(4)?,
                    work_type: row.get(5)?,
                    citations: row.get(6)?,
                    doi: row.get(7)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
