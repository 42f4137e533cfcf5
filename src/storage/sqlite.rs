//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, OptionalExtension, Transaction};
use serde::Serialize;
use crate::Result;
use crate::model::{HitRow, HspRow, QueryRow};
use super::schema;

/// SQLite-backed storage for search results
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates it and its directory if missing)
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        let store = Self { conn };
        store.ensure_schema(false)?;
        Ok(store)
    }

    /// Create missing tables, optionally dropping the existing ones first
    pub fn ensure_schema(&self, drop_existing: bool) -> Result<()> {
        schema::ensure_schema(&self.conn, drop_existing)
    }

    /// Borrow the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction; it rolls back when dropped without `commit`
    pub fn transaction(&mut self) -> Result<Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }

    // ========== Read Operations ==========

    /// Get a query row by name
    pub fn get_query(&self, name: &str) -> Result<Option<QueryRow>> {
        self.conn
            .query_row(
                "SELECT id, name, length FROM query WHERE name = ?1",
                [name],
                |row| {
                    Ok(QueryRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        length: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// All hits in insertion order
    pub fn hits(&self) -> Result<Vec<HitRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, query_id, sample_id, full_name, short_name, frame, length, bitscore, evalue FROM hit ORDER BY id",
        )?;
        let hits = stmt
            .query_map([], |row| {
                Ok(HitRow {
                    id: row.get(0)?,
                    query_id: row.get(1)?,
                    sample_id: row.get(2)?,
                    full_name: row.get(3)?,
                    short_name: row.get(4)?,
                    frame: row.get(5)?,
                    length: row.get(6)?,
                    bitscore: row.get(7)?,
                    evalue: row.get(8)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(hits)
    }

    /// All HSPs in insertion order
    pub fn hsps(&self) -> Result<Vec<HspRow>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, hit_id, bias, bitscore, evalue, evalue_cond,
                   hit_start, hit_end, hit_strand, query_start, query_end, query_strand
            FROM hsp ORDER BY id
            "#,
        )?;
        let hsps = stmt
            .query_map([], |row| {
                Ok(HspRow {
                    id: row.get(0)?,
                    hit_id: row.get(1)?,
                    bias: row.get(2)?,
                    bitscore: row.get(3)?,
                    evalue: row.get(4)?,
                    evalue_cond: row.get(5)?,
                    hit_start: row.get(6)?,
                    hit_end: row.get(7)?,
                    hit_strand: row.get(8)?,
                    query_start: row.get(9)?,
                    query_end: row.get(10)?,
                    query_strand: row.get(11)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(hsps)
    }

    fn count(&self, table: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            samples: self.count("sample")?,
            queries: self.count("query")?,
            hits: self.count("hit")?,
            hsps: self.count("hsp")?,
        })
    }

    /// Hit counts per sample, by name; unsampled hits come last with no name
    pub fn sample_summaries(&self) -> Result<Vec<SampleSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT s.name, COUNT(h.id)
            FROM sample s LEFT JOIN hit h ON h.sample_id = s.id
            GROUP BY s.id
            ORDER BY s.name
            "#,
        )?;
        let mut summaries = stmt
            .query_map([], |row| {
                let hits: i64 = row.get(1)?;
                Ok(SampleSummary {
                    name: row.get(0)?,
                    hits: hits as usize,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let unsampled: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM hit WHERE sample_id IS NULL",
            [],
            |row| row.get(0),
        )?;
        if unsampled > 0 {
            summaries.push(SampleSummary {
                name: None,
                hits: unsampled as usize,
            });
        }
        Ok(summaries)
    }
}

/// Database statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DbStats {
    pub samples: usize,
    pub queries: usize,
    pub hits: usize,
    pub hsps: usize,
}

/// Number of hits attributed to one sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleSummary {
    pub name: Option<String>,
    pub hits: usize,
}
