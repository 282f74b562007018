//! Record loading from JSON files.
//!
//! Input is a JSON array of objects, each with a numeric `tickets` field.
//! Everything else in an object is carried through untouched.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use trendify_core::{Entry, RecordError};

/// Errors from the loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not open input file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected an array of objects in the input")]
    NotAnArray,
    #[error("record {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: RecordError,
    },
}

/// Load entries from a JSON file.
pub fn load_entries(path: &Path) -> Result<Vec<Entry>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parse_entries(&content)?;
    debug!(path = %path.display(), count = entries.len(), "loaded entries");
    Ok(entries)
}

/// Parse entries from JSON text.
pub fn parse_entries(content: &str) -> Result<Vec<Entry>, LoadError> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Array(items) = value else {
        return Err(LoadError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            Entry::from_value(item).map_err(|source| LoadError::Record { index, source })
        })
        .collect()
}
