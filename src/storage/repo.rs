//! Per-entity repositories
//!
//! The loader only talks to these traits. The SQLite implementations borrow
//! a `Connection`; pass a `Transaction` to keep every write in one scope.

use rusqlite::{Connection, OptionalExtension, params};
use crate::model::{NewHit, NewHsp, NewQuery};
use crate::{Error, Result};

/// Outcome of a find-or-create lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    /// An existing row was reused
    Found(i64),
    /// A new row was inserted
    Created(i64),
}

impl Resolved {
    pub fn id(&self) -> i64 {
        match self {
            Resolved::Found(id) | Resolved::Created(id) => *id,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Resolved::Created(_))
    }
}

pub trait SampleRepository {
    fn find_by_name(&self, name: &str) -> Result<Option<i64>>;

    fn insert(&self, name: &str) -> Result<i64>;

    fn insert_or_get(&self, name: &str) -> Result<Resolved> {
        match self.find_by_name(name)? {
            Some(id) => Ok(Resolved::Found(id)),
            None => self.insert(name).map(Resolved::Created),
        }
    }
}

pub trait QueryRepository {
    fn find_by_name(&self, name: &str) -> Result<Option<i64>>;

    fn insert(&self, query: &NewQuery) -> Result<i64>;

    /// First write wins: an existing row keeps its stored length.
    fn insert_or_get(&self, query: &NewQuery) -> Result<Resolved> {
        match self.find_by_name(&query.name)? {
            Some(id) => Ok(Resolved::Found(id)),
            None => self.insert(query).map(Resolved::Created),
        }
    }
}

pub trait HitRepository {
    /// Insert a hit; a unique-key collision is reported as `Error::DuplicateHit`
    fn insert(&self, hit: &NewHit) -> Result<i64>;
}

pub trait HspRepository {
    fn insert(&self, hsp: &NewHsp) -> Result<i64>;
}

/// One repository per table, all sharing a connection
pub struct Repositories<'c> {
    pub samples: Box<dyn SampleRepository + 'c>,
    pub queries: Box<dyn QueryRepository + 'c>,
    pub hits: Box<dyn HitRepository + 'c>,
    pub hsps: Box<dyn HspRepository + 'c>,
}

impl<'c> Repositories<'c> {
    pub fn sqlite(conn: &'c Connection) -> Self {
        Self {
            samples: Box::new(SqliteSamples { conn }),
            queries: Box::new(SqliteQueries { conn }),
            hits: Box::new(SqliteHits { conn }),
            hsps: Box::new(SqliteHsps { conn }),
        }
    }
}

pub struct SqliteSamples<'c> {
    conn: &'c Connection,
}

impl SampleRepository for SqliteSamples<'_> {
    fn find_by_name(&self, name: &str) -> Result<Option<i64>> {
        self.conn
            .query_row("SELECT id FROM sample WHERE name = ?1", [name], |row| row.get(0))
            .optional()
            .map_err(Into::into)
    }

    fn insert(&self, name: &str) -> Result<i64> {
        let id = self
            .conn
            .prepare_cached("INSERT INTO sample (name) VALUES (?1)")?
            .insert([name])?;
        Ok(id)
    }
}

pub struct SqliteQueries<'c> {
    conn: &'c Connection,
}

impl QueryRepository for SqliteQueries<'_> {
    fn find_by_name(&self, name: &str) -> Result<Option<i64>> {
        self.conn
            .prepare_cached("SELECT id FROM query WHERE name = ?1")?
            .query_row([name], |row| row.get(0))
            .optional()
            .map_err(Into::into)
    }

    fn insert(&self, query: &NewQuery) -> Result<i64> {
        let id = self
            .conn
            .prepare_cached("INSERT INTO query (name, length) VALUES (?1, ?2)")?
            .insert(params![query.name, query.length])?;
        Ok(id)
    }
}

pub struct SqliteHits<'c> {
    conn: &'c Connection,
}

impl HitRepository for SqliteHits<'_> {
    fn insert(&self, hit: &NewHit) -> Result<i64> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            INSERT INTO hit (query_id, sample_id, full_name, short_name, frame, length, bitscore, evalue)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )?;
        let inserted = stmt.insert(params![
            hit.query_id,
            hit.sample_id,
            hit.full_name,
            hit.short_name,
            hit.frame,
            hit.length,
            hit.bitscore,
            hit.evalue,
        ]);
        match inserted {
            Ok(id) => Ok(id),
            Err(e) if is_unique_violation(&e) => Err(Error::DuplicateHit {
                full_name: hit.full_name.clone(),
                sample_id: hit.sample_id,
            }),
            Err(e) => Err(e.into()),
        }
    }
}

pub struct SqliteHsps<'c> {
    conn: &'c Connection,
}

impl HspRepository for SqliteHsps<'_> {
    fn insert(&self, hsp: &NewHsp) -> Result<i64> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            INSERT INTO hsp (hit_id, bias, bitscore, evalue, evalue_cond,
                             hit_start, hit_end, hit_strand, query_start, query_end, query_strand)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )?;
        let id = stmt.insert(params![
            hsp.hit_id,
            hsp.bias,
            hsp.bitscore,
            hsp.evalue,
            hsp.evalue_cond,
            hsp.hit_start,
            hsp.hit_end,
            hsp.hit_strand,
            hsp.query_start,
            hsp.query_end,
            hsp.query_strand,
        ])?;
        Ok(id)
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStore;

    #[test]
    fn test_sample_insert_or_get_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();
        let repos = Repositories::sqlite(store.connection());

        let first = repos.samples.insert_or_get("soil1").unwrap();
        let second = repos.samples.insert_or_get("soil1").unwrap();
        assert!(first.is_created());
        assert_eq!(second, Resolved::Found(first.id()));
        assert_eq!(repos.samples.find_by_name("soil2").unwrap(), None);
    }

    #[test]
    fn test_query_first_write_wins() {
        let store = SqliteStore::open_in_memory().unwrap();
        let repos = Repositories::sqlite(store.connection());

        let created = repos
            .queries
            .insert_or_get(&NewQuery { name: "TIGR00484".into(), length: 200 })
            .unwrap();
        let found = repos
            .queries
            .insert_or_get(&NewQuery { name: "TIGR00484".into(), length: 999 })
            .unwrap();
        assert_eq!(found, Resolved::Found(created.id()));

        let stored = store.get_query("TIGR00484").unwrap().unwrap();
        assert_eq!(stored.length, Some(200));
    }

    #[test]
    fn test_duplicate_hit_is_reported() {
        let store = SqliteStore::open_in_memory().unwrap();
        let repos = Repositories::sqlite(store.connection());
        let sample_id = repos.samples.insert("soil1").unwrap();
        let query_id = repos.queries.insert(&NewQuery { name: "q".into(), length: 10 }).unwrap();

        let hit = NewHit::new(query_id, Some(sample_id), "contig5:frame+1", 150, 55.2, 1e-10);
        repos.hits.insert(&hit).unwrap();
        match repos.hits.insert(&hit) {
            Err(Error::DuplicateHit { full_name, sample_id: sid }) => {
                assert_eq!(full_name, "contig5:frame+1");
                assert_eq!(sid, Some(sample_id));
            }
            other => panic!("expected duplicate hit, got {:?}", other),
        }
    }

    #[test]
    fn test_unsampled_hits_never_collide() {
        let store = SqliteStore::open_in_memory().unwrap();
        let repos = Repositories::sqlite(store.connection());
        let query_id = repos.queries.insert(&NewQuery { name: "q".into(), length: 10 }).unwrap();

        let hit = NewHit::new(query_id, None, "contig5:frame+1", 150, 55.2, 1e-10);
        let a = repos.hits.insert(&hit).unwrap();
        let b = repos.hits.insert(&hit).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hit_requires_existing_query() {
        let store = SqliteStore::open_in_memory().unwrap();
        let repos = Repositories::sqlite(store.connection());

        let hit = NewHit::new(42, None, "contig5:1", 150, 55.2, 1e-10);
        let err = repos.hits.insert(&hit).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }
}
