//! # hmmdb - HMMER search results in SQLite
//!
//! Loads HMMER3 domain tables (`--domtblout`) into a four-table
//! relational schema: samples, queries, hits and HSPs.
//!
//! hmmdb provides:
//! - A lazy reader for `hmmsearch` and `hmmscan` domain tables
//! - SQLite-backed storage with one repository per entity
//! - A transactional loader with find-or-create semantics for samples and queries

pub mod domtab;
pub mod storage;
pub mod loader;
pub mod model;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use domtab::{DomtabReader, QueryResult, TableFormat};
pub use loader::{DuplicateHitPolicy, LoadOptions, LoadReport, Loader, load_files, load_files_with};
pub use model::HitName;
pub use storage::SqliteStore;

/// Result type alias for hmmdb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for hmmdb operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Domain table error at line {line}: {message}")]
    Domtab { line: usize, message: String },

    #[error("Duplicate hit {full_name} (sample id {sample_id:?})")]
    DuplicateHit {
        full_name: String,
        sample_id: Option<i64>,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
