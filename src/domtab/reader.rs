//! Streaming domain-table reader

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;
use std::str::FromStr;

use super::{Hit, Hsp, QueryResult, TableFormat};
use crate::{Error, Result};

/// Number of fixed columns before the free-text description
const FIXED_COLUMNS: usize = 22;

/// Lazily yields one `QueryResult` per run of rows sharing a query name.
///
/// The reader holds at most one row of lookahead. After the first error it
/// stops yielding.
pub struct DomtabReader<R> {
    lines: Lines<R>,
    format: TableFormat,
    line_no: usize,
    pending: Option<Row>,
    done: bool,
}

impl DomtabReader<BufReader<File>> {
    /// Open a domain table on disk
    pub fn open(path: &Path, format: TableFormat) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), format))
    }
}

impl<R: BufRead> DomtabReader<R> {
    pub fn new(reader: R, format: TableFormat) -> Self {
        Self {
            lines: reader.lines(),
            format,
            line_no: 0,
            pending: None,
            done: false,
        }
    }

    /// Next data row, skipping comments and blank lines
    fn read_row(&mut self) -> Result<Option<Row>> {
        for line in self.lines.by_ref() {
            self.line_no += 1;
            let line = line.map_err(|e| match e.kind() {
                io::ErrorKind::InvalidData => Error::Domtab {
                    line: self.line_no,
                    message: "line is not valid UTF-8".to_string(),
                },
                _ => Error::Io(e),
            })?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Row::parse(trimmed, self.line_no).map(Some);
        }
        Ok(None)
    }

    fn next_result(&mut self) -> Result<Option<QueryResult>> {
        let first = match self.pending.take() {
            Some(row) => row,
            None => match self.read_row()? {
                Some(row) => row,
                None => return Ok(None),
            },
        };

        let mut result = QueryResult {
            id: first.query_name.clone(),
            accession: first.query_accession.clone(),
            description: None,
            seq_len: first.qlen,
            hits: Vec::new(),
        };
        let mut seen = HashSet::new();
        self.push_row(&mut result, &mut seen, first)?;

        while let Some(row) = self.read_row()? {
            if row.query_name != result.id {
                self.pending = Some(row);
                break;
            }
            self.push_row(&mut result, &mut seen, row)?;
        }

        Ok(Some(result))
    }

    /// Rows for one target must be contiguous within a query
    fn push_row(&self, result: &mut QueryResult, seen: &mut HashSet<String>, row: Row) -> Result<()> {
        let hsp = row.to_hsp(self.format);
        if let Some(last) = result.hits.last_mut() {
            if last.id == row.target_name {
                last.hsps.push(hsp);
                return Ok(());
            }
        }
        if !seen.insert(row.target_name.clone()) {
            return Err(Error::Domtab {
                line: self.line_no,
                message: format!(
                    "target '{}' appears again under query '{}' after other targets",
                    row.target_name, result.id
                ),
            });
        }
        result.hits.push(Hit {
            id: row.target_name,
            accession: row.target_accession,
            description: row.description,
            seq_len: row.tlen,
            bitscore: row.score,
            evalue: row.evalue,
            bias: row.bias,
            hsps: vec![hsp],
        });
        Ok(())
    }
}

impl<R: BufRead> Iterator for DomtabReader<R> {
    type Item = Result<QueryResult>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_result() {
            Ok(Some(result)) => Some(Ok(result)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// One parsed data line
#[derive(Debug, Clone)]
struct Row {
    target_name: String,
    target_accession: Option<String>,
    tlen: u32,
    query_name: String,
    query_accession: Option<String>,
    qlen: u32,
    evalue: f64,
    score: f64,
    bias: f64,
    domain_index: u32,
    c_evalue: f64,
    i_evalue: f64,
    dom_score: f64,
    dom_bias: f64,
    hmm_from: i64,
    hmm_to: i64,
    ali_from: i64,
    ali_to: i64,
    env_from: i64,
    env_to: i64,
    acc: f64,
    description: Option<String>,
}

impl Row {
    fn parse(line: &str, line_no: usize) -> Result<Self> {
        let mut fields = Vec::with_capacity(FIXED_COLUMNS);
        let mut rest = line;
        while fields.len() < FIXED_COLUMNS {
            rest = rest.trim_start();
            if rest.is_empty() {
                return Err(Error::Domtab {
                    line: line_no,
                    message: format!(
                        "expected at least {} columns, found {}",
                        FIXED_COLUMNS,
                        fields.len()
                    ),
                });
            }
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            fields.push(&rest[..end]);
            rest = &rest[end..];
        }
        let description = rest.trim();

        let num = |idx: usize, name: &str| -> Result<f64> { parse_field(&fields, idx, name, line_no) };
        let int = |idx: usize, name: &str| -> Result<i64> { parse_field(&fields, idx, name, line_no) };
        let len = |idx: usize, name: &str| -> Result<u32> { parse_field(&fields, idx, name, line_no) };

        Ok(Self {
            target_name: fields[0].to_string(),
            target_accession: accession(fields[1]),
            tlen: len(2, "tlen")?,
            query_name: fields[3].to_string(),
            query_accession: accession(fields[4]),
            qlen: len(5, "qlen")?,
            evalue: num(6, "E-value")?,
            score: num(7, "score")?,
            bias: num(8, "bias")?,
            domain_index: len(9, "domain #")?,
            c_evalue: num(11, "c-Evalue")?,
            i_evalue: num(12, "i-Evalue")?,
            dom_score: num(13, "domain score")?,
            dom_bias: num(14, "domain bias")?,
            hmm_from: int(15, "hmm from")?,
            hmm_to: int(16, "hmm to")?,
            ali_from: int(17, "ali from")?,
            ali_to: int(18, "ali to")?,
            env_from: int(19, "env from")?,
            env_to: int(20, "env to")?,
            acc: num(21, "acc")?,
            description: match description {
                "" | "-" => None,
                text => Some(text.to_string()),
            },
        })
    }

    fn to_hsp(&self, format: TableFormat) -> Hsp {
        // Alignment columns are 1-based inclusive.
        let hmm = (self.hmm_from - 1, self.hmm_to);
        let ali = (self.ali_from - 1, self.ali_to);
        let ((query_start, query_end), (hit_start, hit_end)) = match format {
            TableFormat::HmmSearch => (hmm, ali),
            TableFormat::HmmScan => (ali, hmm),
        };
        Hsp {
            domain_index: self.domain_index,
            bias: self.dom_bias,
            bitscore: self.dom_score,
            evalue: self.i_evalue,
            evalue_cond: self.c_evalue,
            hit_start,
            hit_end,
            hit_strand: 0,
            query_start,
            query_end,
            query_strand: 0,
            env_start: self.env_from - 1,
            env_end: self.env_to,
            acc_avg: self.acc,
        }
    }
}

fn accession(field: &str) -> Option<String> {
    if field == "-" { None } else { Some(field.to_string()) }
}

fn parse_field<T: FromStr>(fields: &[&str], idx: usize, name: &str, line_no: usize) -> Result<T> {
    fields[idx].parse().map_err(|_| Error::Domtab {
        line: line_no,
        message: format!("invalid {} value '{}'", name, fields[idx]),
    })
}
