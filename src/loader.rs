//! Result file loading
//!
//! Reads the runner's `result.json` job array. A missing file is an
//! empty run, not an error; anything else unreadable or malformed is
//! fatal.

use std::fs;
use std::io;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// Loader errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("top-level value in {path} is not an array")]
    NotAnArray { path: String },
}

/// Load the job array from `path`.
///
/// Jobs are returned as raw values; field validation happens during
/// normalization so that a misshapen job and a malformed file surface
/// as distinct errors.
pub fn load_jobs(path: &Path) -> Result<Vec<Value>, LoadError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let display = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: display.clone(),
        source,
    })?;

    let value: Value = serde_json::from_str(&contents).map_err(|source| LoadError::Json {
        path: display.clone(),
        source,
    })?;

    match value {
        Value::Array(jobs) => Ok(jobs),
        _ => Err(LoadError::NotAnArray { path: display }),
    }
}
