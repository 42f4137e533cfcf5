//! HMMER3 domain tables
//!
//! `hmmsearch --domtblout` and `hmmscan --domtblout` both write one row per
//! domain. Rows are grouped back into the query → hit → HSP hierarchy:
//! - `QueryResult`: one per consecutive run of rows sharing a query name
//! - `Hit`: one per consecutive run of rows sharing a target name
//! - `Hsp`: one per row

pub mod reader;

pub use reader::DomtabReader;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which program wrote the table.
///
/// The two layouts share columns but differ in which side the profile sits
/// on, which decides whether the `hmm from/to` columns are query or hit
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// Profile queries searched against a sequence database
    #[default]
    HmmSearch,
    /// Sequence queries scanned against a profile database
    HmmScan,
}

impl TableFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableFormat::HmmSearch => "hmmsearch",
            TableFormat::HmmScan => "hmmscan",
        }
    }
}

impl FromStr for TableFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "hmmsearch" | "hmmsearch3-domtab" => Ok(TableFormat::HmmSearch),
            "hmmscan" | "hmmscan3-domtab" => Ok(TableFormat::HmmScan),
            _ => Err(Error::InvalidArgument(format!("Unknown table format: {}", s))),
        }
    }
}

impl std::fmt::Display for TableFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// All hits reported for one query.
///
/// Domain tables carry no query description, so the reader leaves
/// `description` empty.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub id: String,
    pub accession: Option<String>,
    pub description: Option<String>,
    pub seq_len: u32,
    pub hits: Vec<Hit>,
}

impl QueryResult {
    pub fn new(id: impl Into<String>, seq_len: u32) -> Self {
        Self {
            id: id.into(),
            accession: None,
            description: None,
            seq_len,
            hits: Vec::new(),
        }
    }

    pub fn with_hit(mut self, hit: Hit) -> Self {
        self.hits.push(hit);
        self
    }

    pub fn hsp_count(&self) -> usize {
        self.hits.iter().map(|h| h.hsps.len()).sum()
    }
}

/// A target matched by the query, with full-sequence scores.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub id: String,
    pub accession: Option<String>,
    pub description: Option<String>,
    pub seq_len: u32,
    pub bitscore: f64,
    pub evalue: f64,
    pub bias: f64,
    pub hsps: Vec<Hsp>,
}

impl Hit {
    pub fn new(id: impl Into<String>, seq_len: u32, bitscore: f64, evalue: f64) -> Self {
        Self {
            id: id.into(),
            accession: None,
            description: None,
            seq_len,
            bitscore,
            evalue,
            bias: 0.0,
            hsps: Vec::new(),
        }
    }

    pub fn with_hsp(mut self, hsp: Hsp) -> Self {
        self.hsps.push(hsp);
        self
    }
}

/// One aligned domain.
///
/// Coordinates are 0-based, end-exclusive. `evalue` is the independent
/// E-value and `evalue_cond` the conditional one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Hsp {
    pub domain_index: u32,
    pub bias: f64,
    pub bitscore: f64,
    pub evalue: f64,
    pub evalue_cond: f64,
    pub hit_start: i64,
    pub hit_end: i64,
    pub hit_strand: i64,
    pub query_start: i64,
    pub query_end: i64,
    pub query_strand: i64,
    pub env_start: i64,
    pub env_end: i64,
    pub acc_avg: f64,
}
