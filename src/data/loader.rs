// Interaction log parsing.
//
// One record per line: userId, itemId, rating, timestamp separated by a fixed
// delimiter (MovieLens ratings.dat uses "::"). Rating and timestamp are
// checked for presence only; the signal is implicit, so every record counts
// as a single positive interaction.
//
// A malformed line aborts the whole load with its line number. Skipping bad
// lines would silently change the train/test split.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;

use crate::error::{CofiError, Result};

/// Default field delimiter (MovieLens 1M format).
pub const DEFAULT_DELIMITER: &str = "::";

const FIELD_COUNT: usize = 4;

/// One parsed (user, item) interaction with raw identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub user: String,
    pub item: String,
}

/// Parse a single line. Returns Ok(None) for blank lines.
///
/// `line_no` is 1-based and only used for error messages.
pub fn parse_line(line: &str, delimiter: &str, line_no: usize) -> Result<Option<Record>> {
    if delimiter.is_empty() {
        return Err(CofiError::invalid(line_no, "delimiter must not be empty"));
    }

    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split(delimiter).collect();
    if fields.len() != FIELD_COUNT {
        return Err(CofiError::invalid(
            line_no,
            format!(
                "expected {FIELD_COUNT} fields separated by {delimiter:?}, found {}",
                fields.len()
            ),
        ));
    }

    let user = fields[0].trim();
    let item = fields[1].trim();
    if user.is_empty() {
        return Err(CofiError::invalid(line_no, "empty user id"));
    }
    if item.is_empty() {
        return Err(CofiError::invalid(line_no, "empty item id"));
    }

    Ok(Some(Record {
        user: user.to_string(),
        item: item.to_string(),
    }))
}

/// Parse every line from a reader.
pub fn read_records<R: BufRead>(reader: R, delimiter: &str) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if let Some(record) = parse_line(&line, delimiter, idx + 1)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Open and parse an interaction log file.
pub fn load_file(path: &Path, delimiter: &str) -> Result<Vec<Record>> {
    let file = File::open(path)?;
    let records = read_records(BufReader::new(file), delimiter)?;
    info!(
        path = %path.display(),
        records = records.len(),
        "Loaded interaction log"
    );
    Ok(records)
}
