//! Batch parsing of JSON record payloads
//!
//! A batch is rejected only when it is not a JSON array. Elements that do not
//! fit the record type are skipped and counted.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AnalyticsResult;

/// Records parsed from one payload
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBatch<T> {
    pub records: Vec<T>,
    /// Elements left out because they did not match the record shape
    pub skipped: usize,
}

/// Parse a JSON array of records, skipping malformed elements
pub fn parse_records<T: DeserializeOwned>(json: &str) -> AnalyticsResult<ParsedBatch<T>> {
    let values: Vec<Value> = serde_json::from_str(json)?;
    let total = values.len();
    let records: Vec<T> = values
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    let skipped = total - records.len();

    if skipped > 0 {
        tracing::warn!(skipped, total, "Skipped malformed records");
    }

    Ok(ParsedBatch { records, skipped })
}
