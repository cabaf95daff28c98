//! Configuration loading from wersig.toml
//!
//! WerSig configuration can be specified in a `wersig.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.

use crate::input::{DEFAULT_DELIMITER, PAIRED_DELIMITER};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wersig_stats::{DEFAULT_CONFIDENCE_LEVEL, DEFAULT_SAMPLES_PER_BATCH, DEFAULT_TOTAL_BATCH};

/// Name of the configuration file looked up during discovery
pub const CONFIG_FILE_NAME: &str = "wersig.toml";

/// WerSig configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WersigConfig {
    /// Bootstrap configuration
    #[serde(default)]
    pub bootstrap: BootstrapSection,
    /// Input parsing configuration
    #[serde(default)]
    pub input: InputConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Bootstrap and interval settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapSection {
    /// Number of bootstrap batches (10^2 to 10^4 are typical)
    #[serde(default = "default_total_batch")]
    pub total_batch: usize,
    /// Records drawn with replacement per batch
    #[serde(default = "default_samples_per_batch")]
    pub samples_per_batch: usize,
    /// Confidence level (e.g., 0.95 for 95%)
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
    /// Interval method: "percentile" or "gaussian"
    #[serde(default = "default_method")]
    pub method: String,
    /// Resample within each block instead of across the pooled dataset
    #[serde(default)]
    pub stratify: bool,
    /// Fixed seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
    /// Run bootstrap batches in parallel
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// Worker threads for parallel resampling (0 = all cores)
    #[serde(default)]
    pub threads: usize,
}

impl Default for BootstrapSection {
    fn default() -> Self {
        Self {
            total_batch: default_total_batch(),
            samples_per_batch: default_samples_per_batch(),
            confidence_level: default_confidence_level(),
            method: default_method(),
            stratify: false,
            seed: None,
            parallel: default_parallel(),
            threads: 0,
        }
    }
}

fn default_total_batch() -> usize {
    DEFAULT_TOTAL_BATCH
}
fn default_samples_per_batch() -> usize {
    DEFAULT_SAMPLES_PER_BATCH
}
fn default_confidence_level() -> f64 {
    DEFAULT_CONFIDENCE_LEVEL
}
fn default_method() -> String {
    "percentile".to_string()
}
fn default_parallel() -> bool {
    true
}

/// Input file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Field delimiter of annotated files and of model A's file
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Field delimiter of model B's file in paired mode
    #[serde(default = "default_paired_delimiter")]
    pub paired_delimiter: char,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            paired_delimiter: default_paired_delimiter(),
        }
    }
}

fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}
fn default_paired_delimiter() -> char {
    PAIRED_DELIMITER
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "csv"
    #[serde(default = "default_format")]
    pub format: String,
    /// Exit with status 1 unless model B is significantly better
    #[serde(default)]
    pub fail_on_insignificant: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            fail_on_insignificant: false,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl WersigConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Find `wersig.toml` by walking up from `start`
    pub fn find_from(start: impl AsRef<Path>) -> Option<PathBuf> {
        let mut dir = start.as_ref().to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Some(config_path);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let dir = std::env::current_dir().ok()?;
        let path = Self::find_from(dir)?;
        match Self::load(&path) {
            Ok(config) => {
                tracing::debug!("Loaded configuration from {}", path.display());
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Ignoring invalid {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# WerSig Configuration

[bootstrap]
# Number of bootstrap batches (typical values: 100, 1000, 10000)
total_batch = 1000
# Items drawn with replacement per batch
samples_per_batch = 1000
# Confidence level (0.0 to 1.0, exclusive)
confidence_level = 0.95
# Interval method: "percentile" or "gaussian" (gaussian supports 0.90, 0.95, 0.99)
method = "percentile"
# Resample within each block (e.g. speaker) instead of the pooled dataset
stratify = false
# Fixed seed for reproducible runs (uncomment to enable)
# seed = 42
# Run bootstrap batches in parallel
parallel = true
# Worker threads for parallel resampling (0 = all cores)
threads = 0

[input]
# Field delimiter of annotated files and of model A's file
delimiter = ","
# Field delimiter of model B's file in paired mode
paired_delimiter = "|"

[output]
# Default output format: human, json, csv
format = "human"
# Exit with status 1 unless model B is significantly better
fail_on_insignificant = false
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WersigConfig::default();
        assert_eq!(config.bootstrap.total_batch, 1000);
        assert_eq!(config.bootstrap.method, "percentile");
        assert!(config.bootstrap.parallel);
        assert_eq!(config.input.delimiter, ',');
        assert_eq!(config.input.paired_delimiter, '|');
        assert!(!config.output.fail_on_insignificant);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [bootstrap]
            total_batch = 10000
            method = "gaussian"
            seed = 7

            [input]
            delimiter = "|"
        "#;

        let config: WersigConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bootstrap.total_batch, 10000);
        assert_eq!(config.bootstrap.method, "gaussian");
        assert_eq!(config.bootstrap.seed, Some(7));
        assert_eq!(config.input.delimiter, '|');
        // Defaults should still apply
        assert_eq!(config.bootstrap.samples_per_batch, 1000);
        assert_eq!(config.output.format, "human");
    }

    #[test]
    fn test_default_toml_parses() {
        let config: WersigConfig = toml::from_str(&WersigConfig::default_toml()).unwrap();
        assert_eq!(config.bootstrap.total_batch, 1000);
        assert_eq!(config.bootstrap.seed, None);
        assert_eq!(config.input.paired_delimiter, '|');
    }

    #[test]
    fn test_find_from_walks_up() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(root.path().join(CONFIG_FILE_NAME), "[bootstrap]\ntotal_batch = 50\n")
            .unwrap();

        let found = WersigConfig::find_from(&nested).unwrap();
        assert_eq!(found, root.path().join(CONFIG_FILE_NAME));
        assert_eq!(WersigConfig::load(found).unwrap().bootstrap.total_batch, 50);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[bootstrap]\ntotal_batch = \"many\"\n").unwrap();
        assert!(WersigConfig::load(&path).is_err());
    }
}
