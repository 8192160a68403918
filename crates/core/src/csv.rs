//! Parser for the vocabulary data file.
//!
//! The format is a header line followed by rows of
//! `id,question,answer,status`. The question and answer fields may be
//! quote-wrapped to allow embedded commas; quotes are stripped and the field
//! trimmed. Rows that fail to parse and blank lines are skipped, they never
//! abort the load.

use crate::model::{RecordStatus, VocabRecord};
use thiserror::Error;

/// Reason a single data row was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseRowError {
    #[error("expected at least 4 fields, found {found}")]
    MissingFields { found: usize },

    #[error("record id is not a number")]
    InvalidId,

    #[error("unknown status value {0}")]
    InvalidStatus(String),

    #[error("question or answer field is empty")]
    EmptyField,
}

/// Parses the full data file, discarding the header row.
///
/// Records are returned in file order. Malformed rows are dropped silently.
#[must_use]
pub fn parse_records(text: &str) -> Vec<VocabRecord> {
    text.lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| parse_row(line).ok())
        .collect()
}

/// Parses the data file and keeps only active records.
#[must_use]
pub fn parse_active_records(text: &str) -> Vec<VocabRecord> {
    let mut records = parse_records(text);
    records.retain(VocabRecord::is_active);
    records
}

/// Parses one data row.
///
/// # Errors
///
/// Returns `ParseRowError` describing why the row was rejected.
pub fn parse_row(line: &str) -> Result<VocabRecord, ParseRowError> {
    let fields = split_fields(line);
    if fields.len() < 4 {
        return Err(ParseRowError::MissingFields {
            found: fields.len(),
        });
    }

    let id: u64 = fields[0]
        .trim()
        .parse()
        .map_err(|_| ParseRowError::InvalidId)?;
    let question = fields[1].trim();
    let answer = fields[2].trim();
    let raw = fields[3].trim();
    let status = raw
        .parse::<i64>()
        .ok()
        .and_then(RecordStatus::from_raw)
        .ok_or_else(|| ParseRowError::InvalidStatus(raw.to_owned()))?;

    if question.is_empty() || answer.is_empty() {
        return Err(ParseRowError::EmptyField);
    }

    Ok(VocabRecord::new(id, question, answer, status))
}

/// Splits one row into fields.
///
/// A field is either a quote-wrapped run (returned without its quotes, commas
/// inside preserved) or a run of characters up to the next comma. Empty
/// fields between consecutive commas are not produced, so short rows fall
/// below the required field count and get skipped by the caller.
fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b',' => i += 1,
            b'"' => {
                let start = i + 1;
                let end = line[start..].find('"').map_or(line.len(), |q| start + q);
                fields.push(&line[start..end]);
                i = end.saturating_add(1);
            }
            _ => {
                let start = i;
                let end = line[start..].find(',').map_or(line.len(), |c| start + c);
                fields.push(&line[start..end]);
                i = end;
            }
        }
    }

    fields
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
