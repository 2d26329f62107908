//! JSONL loading and JSON-array conversion.

use serde_json::Value;
use std::io::Write;
use std::path::Path;
use yak_types::DatasetError;

/// Load a JSONL dataset: one JSON value per non-empty line.
pub fn load_jsonl(path: &Path) -> Result<Vec<Value>, DatasetError> {
    let data = std::fs::read_to_string(path)?;
    let mut dataset = Vec::new();
    for (i, line) in data.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value = serde_json::from_str(line).map_err(|e| DatasetError::InvalidLine {
            line: i + 1,
            message: e.to_string(),
        })?;
        dataset.push(value);
    }
    if dataset.is_empty() {
        return Err(DatasetError::Empty);
    }
    Ok(dataset)
}

/// Convert a JSON array file to JSONL, one entry per line. Returns the
/// number of entries written.
pub fn convert_json_to_jsonl(input: &Path, output: &Path) -> Result<usize, DatasetError> {
    let data = std::fs::read_to_string(input)?;
    let value: Value = serde_json::from_str(&data).map_err(|e| DatasetError::InvalidLine {
        line: 1,
        message: e.to_string(),
    })?;
    let entries = value.as_array().ok_or_else(|| DatasetError::NotAnArray {
        path: input.display().to_string(),
    })?;

    let mut file = std::fs::File::create(output)?;
    for entry in entries {
        serde_json::to_writer(&mut file, entry)
            .map_err(|e| DatasetError::Io(std::io::Error::other(e)))?;
        writeln!(file)?;
    }
    Ok(entries.len())
}
