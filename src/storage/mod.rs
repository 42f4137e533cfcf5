//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - sample(name)
//! - query(name, length)
//! - hit(query_id, sample_id, full_name, short_name, frame, length, bitscore, evalue)
//! - hsp(hit_id, bias, bitscore, evalue, evalue_cond, coordinates, strands)

pub mod repo;
pub mod schema;
pub mod sqlite;

pub use repo::{
    HitRepository, HspRepository, QueryRepository, Repositories, Resolved, SampleRepository,
};
pub use sqlite::{DbStats, SampleSummary, SqliteStore};
