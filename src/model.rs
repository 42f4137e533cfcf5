//! Row types for the four tables
//!
//! The loader builds `New*` records from parsed domain-table results and
//! hands them to the repositories; the plain row types are what the
//! repositories read back.

use serde::Serialize;

/// A hit identifier split into its short name and reading frame.
///
/// Identifiers are colon-delimited: the last segment is the frame and the
/// remaining segments, rejoined with `:`, are the short name. An identifier
/// without a colon is all frame and has an empty short name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitName {
    pub short_name: String,
    pub frame: String,
}

impl HitName {
    pub fn split(full_name: &str) -> Self {
        match full_name.rsplit_once(':') {
            Some((short_name, frame)) => Self {
                short_name: short_name.to_string(),
                frame: frame.to_string(),
            },
            None => Self {
                short_name: String::new(),
                frame: full_name.to_string(),
            },
        }
    }
}

/// Query row to insert
#[derive(Debug, Clone)]
pub struct NewQuery {
    pub name: String,
    pub length: u32,
}

/// Hit row to insert
#[derive(Debug, Clone)]
pub struct NewHit {
    pub query_id: i64,
    pub sample_id: Option<i64>,
    pub full_name: String,
    pub short_name: String,
    pub frame: String,
    pub length: u32,
    pub bitscore: f64,
    pub evalue: f64,
}

impl NewHit {
    /// Build a hit row, deriving the short name and frame from `full_name`
    pub fn new(
        query_id: i64,
        sample_id: Option<i64>,
        full_name: &str,
        length: u32,
        bitscore: f64,
        evalue: f64,
    ) -> Self {
        let HitName { short_name, frame } = HitName::split(full_name);
        Self {
            query_id,
            sample_id,
            full_name: full_name.to_string(),
            short_name,
            frame,
            length,
            bitscore,
            evalue,
        }
    }
}

/// HSP row to insert
#[derive(Debug, Clone)]
pub struct NewHsp {
    pub hit_id: i64,
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
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRow {
    pub id: i64,
    pub name: String,
    pub length: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitRow {
    pub id: i64,
    pub query_id: i64,
    pub sample_id: Option<i64>,
    pub full_name: String,
    pub short_name: String,
    pub frame: String,
    pub length: u32,
    pub bitscore: f64,
    pub evalue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HspRow {
    pub id: i64,
    pub hit_id: i64,
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
}
