use crate::storage::{DbStats, SampleSummary};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Table")]
    pub label: String,
    #[tabled(rename = "Rows")]
    pub value: String,
}

#[derive(Tabled)]
struct SampleRow {
    #[tabled(rename = "Sample")]
    name: String,
    #[tabled(rename = "Hits")]
    hits: usize,
}

#[derive(Default)]
pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            label: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }
        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

/// Row counts per table
pub fn stats_table(stats: &DbStats) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("sample", &stats.samples.to_string());
    builder.add_row("query", &stats.queries.to_string());
    builder.add_row("hit", &stats.hits.to_string());
    builder.add_row("hsp", &stats.hsps.to_string());
    builder.build()
}

/// Hit counts per sample; unsampled hits are listed as "(none)"
pub fn samples_table(summaries: &[SampleSummary]) -> String {
    if summaries.is_empty() {
        return String::new();
    }
    let rows: Vec<SampleRow> = summaries
        .iter()
        .map(|s| SampleRow {
            name: s.name.clone().unwrap_or_else(|| "(none)".to_string()),
            hits: s.hits,
        })
        .collect();
    Table::new(rows).with(Style::rounded()).to_string()
}
