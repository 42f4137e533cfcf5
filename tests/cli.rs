//! End-to-end tests for the hmmdb binary: exit codes and what ends up stored

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ROWS: &str = "\
# target name        accession   tlen query name           accession   qlen   E-value  score  bias   #  of  c-Evalue  i-Evalue  score  bias  from    to  from    to  from    to  acc description of target
contig5:frame+1      -            150 TIGR00484            TIGR00484    200     1e-10   55.2   0.1   1   1     1e-09     1e-10   55.2   0.3     1    50    11    60     9    62 0.95 -
";

/// Runs the binary inside a temp dir so no stray `hmmdb.toml` is picked up
fn hmmdb(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("hmmdb").unwrap();
    cmd.current_dir(dir).env("HMMDB_QUIET", "1").env("NO_COLOR", "1");
    cmd
}

fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path
}

/// Row counts as reported by `stats --json`
fn counts(dir: &Path) -> (u64, u64, u64, u64) {
    let output = hmmdb(dir).args(["stats", "--json"]).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tables = &json["tables"];
    let count = |key: &str| tables[key].as_u64().unwrap();
    (count("samples"), count("queries"), count("hits"), count("hsps"))
}

#[test]
fn load_succeeds_and_stats_reports_rows() {
    let dir = TempDir::new().unwrap();
    let table = write(dir.path(), "a.domtab", ROWS);

    hmmdb(dir.path())
        .args(["load", "--sample", "soil1"])
        .arg(&table)
        .assert()
        .success()
        .stdout(predicate::str::contains("Finished with no errors"));

    assert_eq!(counts(dir.path()), (1, 1, 1, 1));
}

#[test]
fn malformed_table_exits_non_zero_and_stores_nothing() {
    let dir = TempDir::new().unwrap();
    let good = write(dir.path(), "a.domtab", ROWS);
    let bad = write(dir.path(), "bad.domtab", "contig9:1 - 100 TIGR00001 - 50 not-a-number\n");
    hmmdb(dir.path()).arg("init").assert().success();

    hmmdb(dir.path())
        .args(["load", "--sample", "soil1"])
        .arg(&good)
        .arg(&bad)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("line 1"));

    assert_eq!(counts(dir.path()), (0, 0, 0, 0));
}

#[test]
fn missing_input_exits_non_zero_and_stores_nothing() {
    let dir = TempDir::new().unwrap();
    let good = write(dir.path(), "a.domtab", ROWS);
    hmmdb(dir.path()).arg("init").assert().success();

    hmmdb(dir.path())
        .arg("load")
        .arg(&good)
        .arg(dir.path().join("missing.domtab"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("input file not found"));

    assert_eq!(counts(dir.path()), (0, 0, 0, 0));
}

#[test]
fn init_drop_clears_previous_loads() {
    let dir = TempDir::new().unwrap();
    let table = write(dir.path(), "a.domtab", ROWS);
    hmmdb(dir.path()).arg("load").arg(&table).assert().success();
    assert_eq!(counts(dir.path()), (0, 1, 1, 1));

    hmmdb(dir.path()).arg("init").assert().success();
    assert_eq!(counts(dir.path()), (0, 1, 1, 1));

    hmmdb(dir.path()).args(["init", "--drop"]).assert().success();
    assert_eq!(counts(dir.path()), (0, 0, 0, 0));
}

#[test]
fn stats_without_database_fails() {
    let dir = TempDir::new().unwrap();
    hmmdb(dir.path())
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("database not found"));
}
