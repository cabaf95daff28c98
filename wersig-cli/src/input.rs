//! Input Readers
//!
//! Two file shapes are accepted:
//!
//! - **Annotated**: one item per line, `errors_a<sep>errors_b<sep>reference_count`
//!   with an optional fourth `block_id` column. All lines must have the same
//!   number of fields.
//! - **Paired** (legacy): one file per model, each line
//!   `edit_distance<sep>reference_count`. Lines are matched by position and
//!   must agree on the reference count.
//!
//! Blank lines are skipped; fields are trimmed.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use wersig_stats::{Dataset, DatasetError, ModelCounts, Record};

/// Default field delimiter
pub const DEFAULT_DELIMITER: char = ',';

/// Delimiter of model B's file in the legacy paired layout
pub const PAIRED_DELIMITER: char = '|';

/// Errors raised while building a dataset from input files
#[derive(Debug, Error)]
pub enum InputError {
    /// Input file could not be opened
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Read failure mid-stream
    #[error("Failed to read input: {0}")]
    Read(#[from] std::io::Error),

    /// Wrong number of delimited fields
    #[error("Line {line}: expected {expected} fields, found {got}")]
    FieldCount {
        line: usize,
        expected: String,
        got: usize,
    },

    /// Count field that is not a non-negative integer
    #[error("Line {line}: {field} is not a non-negative integer: '{value}'")]
    InvalidCount {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// Fourth column present but blank
    #[error("Line {line}: empty block id")]
    EmptyBlockId { line: usize },

    /// Line-level error tagged with its file
    #[error("{}: {source}", .path.display())]
    InFile {
        path: PathBuf,
        source: Box<InputError>,
    },

    /// Parsed records do not form a valid dataset
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

impl InputError {
    fn in_file(self, path: &Path) -> Self {
        match self {
            e @ (InputError::Open { .. } | InputError::Dataset(_)) => e,
            e => InputError::InFile {
                path: path.to_path_buf(),
                source: Box::new(e),
            },
        }
    }
}

fn parse_count(line: usize, field: &'static str, value: &str) -> Result<u32, InputError> {
    value.trim().parse().map_err(|_| InputError::InvalidCount {
        line,
        field,
        value: value.trim().to_string(),
    })
}

/// Non-blank lines with their 1-based line numbers
fn numbered_lines<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = Result<(usize, String), InputError>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(i, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(Ok((i + 1, line))),
            Err(e) => Some(Err(InputError::Read(e))),
        })
}

/// Parse an annotated file (triples, or quadruples with a block id)
pub fn parse_annotated<R: BufRead>(reader: R, delimiter: char) -> Result<Dataset, InputError> {
    let mut shape: Option<usize> = None;
    let mut records = Vec::new();

    for entry in numbered_lines(reader) {
        let (line_no, line) = entry?;
        let fields: Vec<&str> = line.split(delimiter).collect();

        let expected = *shape.get_or_insert(fields.len());
        if fields.len() != expected || !(3..=4).contains(&fields.len()) {
            return Err(InputError::FieldCount {
                line: line_no,
                expected: if (3..=4).contains(&expected) {
                    expected.to_string()
                } else {
                    "3 or 4".to_string()
                },
                got: fields.len(),
            });
        }

        let record = Record::new(
            parse_count(line_no, "errors_a", fields[0])?,
            parse_count(line_no, "errors_b", fields[1])?,
            parse_count(line_no, "reference_count", fields[2])?,
        );
        let block = match fields.get(3).map(|b| b.trim()) {
            Some("") => return Err(InputError::EmptyBlockId { line: line_no }),
            Some(b) => Some(b.to_string()),
            None => None,
        };
        records.push((block, record));
    }

    Ok(Dataset::from_tagged(records)?)
}

/// Parse one model's `edit_distance<sep>reference_count` lines
pub fn parse_model_counts<R: BufRead>(
    reader: R,
    delimiter: char,
) -> Result<Vec<ModelCounts>, InputError> {
    numbered_lines(reader)
        .map(|entry| {
            let (line_no, line) = entry?;
            let fields: Vec<&str> = line.split(delimiter).collect();
            if fields.len() != 2 {
                return Err(InputError::FieldCount {
                    line: line_no,
                    expected: "2".to_string(),
                    got: fields.len(),
                });
            }
            Ok(ModelCounts {
                edit_distance: parse_count(line_no, "edit_distance", fields[0])?,
                reference_count: parse_count(line_no, "reference_count", fields[1])?,
            })
        })
        .collect()
}

fn open(path: &Path) -> Result<BufReader<File>, InputError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| InputError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Read an annotated file from disk
pub fn read_annotated(path: impl AsRef<Path>, delimiter: char) -> Result<Dataset, InputError> {
    let path = path.as_ref();
    parse_annotated(open(path)?, delimiter).map_err(|e| e.in_file(path))
}

/// Read the legacy two-file layout and merge it into one dataset
pub fn read_paired(
    path_a: impl AsRef<Path>,
    path_b: impl AsRef<Path>,
    delimiter_a: char,
    delimiter_b: char,
) -> Result<Dataset, InputError> {
    let (path_a, path_b) = (path_a.as_ref(), path_b.as_ref());
    let model_a = parse_model_counts(open(path_a)?, delimiter_a).map_err(|e| e.in_file(path_a))?;
    let model_b = parse_model_counts(open(path_b)?, delimiter_b).map_err(|e| e.in_file(path_b))?;
    Ok(Dataset::merge_paired(&model_a, &model_b)?)
}
