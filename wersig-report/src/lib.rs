#![warn(missing_docs)]
//! WerSig Report - Output Formats
//!
//! Generates machine-readable renditions of a significance test:
//! - JSON (full schema, suitable as a stored artifact)
//! - CSV (one row per comparison, for spreadsheets)
//!
//! Human-readable terminal output lives in `wersig-cli`.

mod csv;
mod json;
mod report;

pub use csv::{CSV_HEADER, generate_csv_report};
pub use json::generate_json_report;
pub use report::{
    CorpusReport, Report, ReportConfig, ReportMeta, ReportSchema, SCHEMA_ID, SCHEMA_VERSION,
    SignificanceReport,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON with full schema
    Json,
    /// CSV for spreadsheets
    Csv,
    /// Human-readable terminal output
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
