//! Database schema definitions

use rusqlite::Connection;
use crate::Result;

/// Tables in child-before-parent order, the order they must be dropped in
pub const TABLES: &[&str] = &["hsp", "hit", "query", "sample"];

/// SQL to create the sample table
pub const CREATE_SAMPLE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sample (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    name TEXT,
    UNIQUE(name)
)
"#;

/// SQL to create the query table
/// Queries are the profiles (or sequences, for hmmscan) that were searched
pub const CREATE_QUERY_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS query (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    name TEXT NOT NULL,
    length INTEGER,
    UNIQUE(name)
)
"#;

/// SQL to create the hit table
/// NULL sample ids never collide, so the unique key only binds sampled hits
pub const CREATE_HIT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS hit (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    query_id INTEGER NOT NULL,
    sample_id INTEGER,
    full_name TEXT NOT NULL,
    short_name TEXT NOT NULL,
    frame TEXT NOT NULL,
    length INTEGER NOT NULL,
    bitscore REAL NOT NULL,
    evalue REAL NOT NULL,
    UNIQUE(sample_id, full_name, short_name),
    FOREIGN KEY (query_id) REFERENCES query (id),
    FOREIGN KEY (sample_id) REFERENCES sample (id)
)
"#;

/// SQL to create the hsp table
pub const CREATE_HSP_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS hsp (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    hit_id INTEGER NOT NULL,
    bias REAL NOT NULL,
    bitscore REAL NOT NULL,
    evalue REAL NOT NULL,
    evalue_cond REAL NOT NULL,
    hit_start INTEGER NOT NULL,
    hit_end INTEGER NOT NULL,
    hit_strand INTEGER NOT NULL,
    query_start INTEGER NOT NULL,
    query_end INTEGER NOT NULL,
    query_strand INTEGER NOT NULL,
    FOREIGN KEY (hit_id) REFERENCES hit (id)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_hit_query ON hit(query_id)",
    "CREATE INDEX IF NOT EXISTS idx_hit_sample ON hit(sample_id)",
    "CREATE INDEX IF NOT EXISTS idx_hit_evalue ON hit(evalue)",
    "CREATE INDEX IF NOT EXISTS idx_hsp_hit ON hsp(hit_id)",
    "CREATE INDEX IF NOT EXISTS idx_hsp_evalue ON hsp(evalue)",
];

/// All schema creation statements, parents first
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_SAMPLE_TABLE,
        CREATE_QUERY_TABLE,
        CREATE_HIT_TABLE,
        CREATE_HSP_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}

/// Create the tables and indexes if missing, optionally dropping them first.
///
/// Safe to call repeatedly.
pub fn ensure_schema(conn: &Connection, drop_existing: bool) -> Result<()> {
    if drop_existing {
        for table in TABLES {
            tracing::debug!("Dropping table {}", table);
            conn.execute(&format!("DROP TABLE IF EXISTS {}", table), [])?;
        }
    }
    for stmt in all_schema_statements() {
        conn.execute(stmt, [])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap();
        let names = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<Vec<String>>>()
            .unwrap();
        names
    }

    #[test]
    fn test_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn, false).unwrap();
        assert_eq!(table_names(&conn), vec!["hit", "hsp", "query", "sample"]);
    }

    #[test]
    fn test_repeated_calls_keep_rows() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn, false).unwrap();
        conn.execute("INSERT INTO sample (name) VALUES ('soil1')", []).unwrap();

        ensure_schema(&conn, false).unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sample", [], |row| row.get(0)).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_drop_existing_clears_rows() {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", true).unwrap();
        ensure_schema(&conn, false).unwrap();
        conn.execute("INSERT INTO sample (name) VALUES ('soil1')", []).unwrap();
        conn.execute("INSERT INTO query (name, length) VALUES ('TIGR00484', 200)", []).unwrap();
        conn.execute(
            "INSERT INTO hit (query_id, sample_id, full_name, short_name, frame, length, bitscore, evalue) VALUES (1, 1, 'c:1', 'c', '1', 10, 1.0, 1.0)",
            [],
        )
        .unwrap();

        ensure_schema(&conn, true).unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM hit", [], |row| row.get(0)).unwrap();
        assert_eq!(count, 0);
        assert_eq!(table_names(&conn).len(), 4);
    }
}
