use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domtab::TableFormat;
use crate::loader::{DuplicateHitPolicy, LoadOptions};
use crate::{Error, Result};

pub const DEFAULT_DATABASE: &str = "hmm.db";

/// Settings read from `hmmdb.toml`; command-line flags take precedence
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct HmmdbConfig {
    pub database: Option<String>,
    pub sample: Option<String>,
    pub format: Option<TableFormat>,
    pub duplicate_hits: Option<DuplicateHitPolicy>,
}

impl HmmdbConfig {
    /// Database path: flag, then config, then `hmm.db`
    pub fn database_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.database.as_ref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE))
    }

    /// Merge flags over config values into loader options
    pub fn load_options(
        &self,
        sample: Option<String>,
        format: Option<TableFormat>,
        duplicate_hits: Option<DuplicateHitPolicy>,
    ) -> LoadOptions {
        LoadOptions {
            sample: sample.or_else(|| self.sample.clone()),
            format: format.or(self.format).unwrap_or_default(),
            duplicate_hits: duplicate_hits.or(self.duplicate_hits).unwrap_or_default(),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("hmmdb.toml")
}

/// Read the config file; a missing file is not an error
pub fn load_config(path: Option<&Path>) -> Result<HmmdbConfig> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(HmmdbConfig::default());
    }

    let contents = std::fs::read_to_string(&path)?;
    toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, HmmdbConfig::default());
        assert_eq!(config.database_path(None), PathBuf::from("hmm.db"));
    }

    #[test]
    fn test_parses_all_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hmmdb.toml");
        std::fs::write(
            &path,
            "database = \"results/soil.db\"\nsample = \"soil1\"\nformat = \"hmmscan\"\nduplicate_hits = \"skip\"\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.database.as_deref(), Some("results/soil.db"));
        assert_eq!(config.format, Some(TableFormat::HmmScan));
        assert_eq!(config.duplicate_hits, Some(DuplicateHitPolicy::Skip));
    }

    #[test]
    fn test_invalid_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hmmdb.toml");
        std::fs::write(&path, "format = \"blast\"\n").unwrap();
        assert!(matches!(load_config(Some(&path)), Err(Error::Config(_))));
    }

    #[test]
    fn test_flags_override_config() {
        let config = HmmdbConfig {
            database: Some("from_config.db".into()),
            sample: Some("soil1".into()),
            format: Some(TableFormat::HmmScan),
            duplicate_hits: None,
        };

        assert_eq!(config.database_path(Some("flag.db".into())), PathBuf::from("flag.db"));
        assert_eq!(config.database_path(None), PathBuf::from("from_config.db"));

        let options = config.load_options(Some("soil2".into()), None, Some(DuplicateHitPolicy::Skip));
        assert_eq!(options.sample.as_deref(), Some("soil2"));
        assert_eq!(options.format, TableFormat::HmmScan);
        assert_eq!(options.duplicate_hits, DuplicateHitPolicy::Skip);

        let options = HmmdbConfig::default().load_options(None, None, None);
        assert_eq!(options.sample, None);
        assert_eq!(options.format, TableFormat::HmmSearch);
        assert_eq!(options.duplicate_hits, DuplicateHitPolicy::Reject);
    }
}
