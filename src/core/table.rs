//! CSV parsing and the feature-column schema check.

use crate::domain::model::{FeatureRow, UploadedTable, FEATURE_COLUMNS};
use crate::utils::error::{RfmError, Result, SchemaError};

/// Parses comma-separated bytes with a mandatory header row.
///
/// Short records are padded with empty cells up to the header width;
/// records wider than the header are rejected.
pub fn parse_csv(content: &[u8]) -> Result<UploadedTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(RfmError::MalformedUpload {
            message: "CSV file has no header row".to_string(),
        });
    }

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() > headers.len() {
            return Err(RfmError::MalformedUpload {
                message: format!(
                    "row {} has {} fields but the header has {}",
                    i + 1,
                    record.len(),
                    headers.len()
                ),
            });
        }

        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    tracing::debug!(columns = headers.len(), rows = rows.len(), "Parsed CSV upload");
    Ok(UploadedTable { headers, rows })
}

/// Checks that all feature columns exist without touching row values.
pub fn check_schema(table: &UploadedTable) -> std::result::Result<[usize; 3], SchemaError> {
    let indices = FEATURE_COLUMNS.map(|name| table.column_index(name));

    match indices {
        [Some(recency), Some(frequency), Some(monetary)] => Ok([recency, frequency, monetary]),
        _ => Err(SchemaError::MissingColumns {
            missing: FEATURE_COLUMNS
                .iter()
                .zip(indices)
                .filter(|(_, index)| index.is_none())
                .map(|(name, _)| name.to_string())
                .collect(),
        }),
    }
}

/// Extracts typed feature rows, failing on a missing column or a bad cell.
pub fn extract_features(table: &UploadedTable) -> Result<Vec<FeatureRow>> {
    let [recency, frequency, monetary] = check_schema(table)?;

    if table.is_empty() {
        return Err(RfmError::MalformedUpload {
            message: "CSV contains no data rows".to_string(),
        });
    }

    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            Ok(FeatureRow {
                recency: parse_cell(row, recency, i + 1, FEATURE_COLUMNS[0])?,
                frequency: parse_cell(row, frequency, i + 1, FEATURE_COLUMNS[1])?,
                monetary: parse_cell(row, monetary, i + 1, FEATURE_COLUMNS[2])?,
            })
        })
        .collect()
}

fn parse_cell(row: &[String], index: usize, row_number: usize, column: &str) -> Result<f64> {
    let raw = row.get(index).map(|s| s.trim()).unwrap_or_default();
    let parse_error = |message: String| RfmError::ParseError {
        row: row_number,
        column: column.to_string(),
        message,
    };

    if raw.is_empty() {
        return Err(parse_error("is empty".to_string()));
    }

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(parse_error(format!("value '{}' is not a finite number", raw))),
        Err(_) => Err(parse_error(format!("value '{}' is not a number", raw))),
    }
}
