//! Loader - walks domain-table results into the four tables
//!
//! One load is one transaction. The sample is resolved once when the loader
//! starts, queries are found or created on first sight, and every hit and
//! HSP is inserted fresh under its parent's id. Any error aborts the load;
//! the only tolerated failure is a duplicate hit under `DuplicateHitPolicy::Skip`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domtab::{DomtabReader, Hit, QueryResult, TableFormat};
use crate::model::{NewHit, NewHsp, NewQuery};
use crate::storage::{Repositories, SqliteStore};
use crate::{Error, Result};

/// What to do when a hit collides with one already stored for the sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateHitPolicy {
    /// Abort the load and roll everything back
    #[default]
    Reject,
    /// Log it, skip the hit and its HSPs, keep going
    Skip,
}

impl DuplicateHitPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateHitPolicy::Reject => "reject",
            DuplicateHitPolicy::Skip => "skip",
        }
    }
}

impl FromStr for DuplicateHitPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "reject" | "fail" | "abort" => Ok(DuplicateHitPolicy::Reject),
            "skip" | "ignore" => Ok(DuplicateHitPolicy::Skip),
            _ => Err(Error::InvalidArgument(format!("Unknown duplicate hit policy: {}", s))),
        }
    }
}

impl std::fmt::Display for DuplicateHitPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Sample to tag every hit with; `None` leaves hits unsampled
    pub sample: Option<String>,
    pub format: TableFormat,
    pub duplicate_hits: DuplicateHitPolicy,
}

/// Counts of what one load wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub sample_id: Option<i64>,
    pub files: usize,
    pub queries_created: usize,
    pub queries_reused: usize,
    pub hits_inserted: usize,
    pub hits_skipped: usize,
    pub hsps_inserted: usize,
}

pub struct Loader<'c> {
    repos: Repositories<'c>,
    options: LoadOptions,
    sample_id: Option<i64>,
    /// Query ids resolved so far in this load
    queries: HashMap<String, i64>,
    report: LoadReport,
}

impl<'c> Loader<'c> {
    /// Resolve the sample (creating it if named and missing) and return a ready loader
    pub fn start(repos: Repositories<'c>, options: LoadOptions) -> Result<Self> {
        let sample_id = match options.sample.as_deref() {
            Some(name) => {
                let resolved = repos.samples.insert_or_get(name)?;
                if resolved.is_created() {
                    info!("Created sample '{}' (id {})", name, resolved.id());
                } else {
                    info!("Reusing sample '{}' (id {})", name, resolved.id());
                }
                Some(resolved.id())
            }
            None => None,
        };

        Ok(Self {
            repos,
            options,
            sample_id,
            queries: HashMap::new(),
            report: LoadReport {
                sample_id,
                ..LoadReport::default()
            },
        })
    }

    pub fn sample_id(&self) -> Option<i64> {
        self.sample_id
    }

    /// Load every query result in a domain table on disk
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        info!("Loading {} ({})", path.display(), self.options.format);
        let reader = DomtabReader::open(path, self.options.format)?;
        self.load_results(reader)?;
        self.report.files += 1;
        Ok(())
    }

    /// Load a sequence of query results, stopping at the first error
    pub fn load_results<I>(&mut self, results: I) -> Result<()>
    where
        I: IntoIterator<Item = Result<QueryResult>>,
    {
        for result in results {
            self.load_query(&result?)?;
        }
        Ok(())
    }

    /// Resolve the query row, then insert its hits and their HSPs
    pub fn load_query(&mut self, result: &QueryResult) -> Result<()> {
        let query_id = self.resolve_query(result)?;
        debug!(
            "Query {} (id {}): {} hits, {} HSPs",
            result.id,
            query_id,
            result.hits.len(),
            result.hsp_count()
        );
        for hit in &result.hits {
            self.load_hit(query_id, hit)?;
        }
        Ok(())
    }

    fn resolve_query(&mut self, result: &QueryResult) -> Result<i64> {
        if let Some(&id) = self.queries.get(&result.id) {
            return Ok(id);
        }

        let resolved = self.repos.queries.insert_or_get(&NewQuery {
            name: result.id.clone(),
            length: result.seq_len,
        })?;
        if resolved.is_created() {
            self.report.queries_created += 1;
        } else {
            self.report.queries_reused += 1;
        }
        self.queries.insert(result.id.clone(), resolved.id());
        Ok(resolved.id())
    }

    fn load_hit(&mut self, query_id: i64, hit: &Hit) -> Result<()> {
        let row = NewHit::new(
            query_id,
            self.sample_id,
            &hit.id,
            hit.seq_len,
            hit.bitscore,
            hit.evalue,
        );

        let hit_id = match self.repos.hits.insert(&row) {
            Ok(id) => id,
            Err(Error::DuplicateHit { full_name, sample_id })
                if self.options.duplicate_hits == DuplicateHitPolicy::Skip =>
            {
                warn!(
                    "Skipping duplicate hit {} (sample id {:?}) and its {} HSPs",
                    full_name,
                    sample_id,
                    hit.hsps.len()
                );
                self.report.hits_skipped += 1;
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        self.report.hits_inserted += 1;

        for hsp in &hit.hsps {
            self.repos.hsps.insert(&NewHsp {
                hit_id,
                bias: hsp.bias,
                bitscore: hsp.bitscore,
                evalue: hsp.evalue,
                evalue_cond: hsp.evalue_cond,
                hit_start: hsp.hit_start,
                hit_end: hsp.hit_end,
                hit_strand: hsp.hit_strand,
                query_start: hsp.query_start,
                query_end: hsp.query_end,
                query_strand: hsp.query_strand,
            })?;
            self.report.hsps_inserted += 1;
        }
        Ok(())
    }

    pub fn finish(self) -> LoadReport {
        self.report
    }
}

/// Load domain tables into `store` as a single transaction.
///
/// Files are read in the order given. Nothing is committed unless every
/// file loads.
pub fn load_files(store: &mut SqliteStore, paths: &[PathBuf], options: &LoadOptions) -> Result<LoadReport> {
    load_files_with(store, paths, options, |_, _| {})
}

/// Like `load_files`, calling `on_file(index, path)` before each file
pub fn load_files_with<F>(
    store: &mut SqliteStore,
    paths: &[PathBuf],
    options: &LoadOptions,
    mut on_file: F,
) -> Result<LoadReport>
where
    F: FnMut(usize, &Path),
{
    let tx = store.transaction()?;
    let report = {
        let mut loader = Loader::start(Repositories::sqlite(&tx), options.clone())?;
        for (i, path) in paths.iter().enumerate() {
            on_file(i, path);
            loader.load_file(path)?;
        }
        loader.finish()
    };
    tx.commit()?;

    info!(
        "Committed {} queries ({} new), {} hits, {} HSPs from {} files",
        report.queries_created + report.queries_reused,
        report.queries_created,
        report.hits_inserted,
        report.hsps_inserted,
        report.files
    );
    Ok(report)
}
