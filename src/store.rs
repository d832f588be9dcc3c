//! JSON sample store.
//!
//! A sample file holds one JSON object whose keys are parameter names and
//! whose values are equal-length arrays of numbers:
//!
//! ```json
//! { "mass1": [12.5, 30.1, 18.0], "mass2": [10.2, 11.7, 9.9] }
//! ```
//!
//! Columns are returned in file order. The file is read under a shared
//! lock so that a concurrent writer holding an exclusive lock is waited on.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use fs2::FileExt;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Reads named sample columns from the JSON object stored at `path`.
///
/// With `filter`, only those parameters are returned, in filter order;
/// otherwise every stored parameter is returned, in file order.
///
/// # Errors
///
/// Returns [`Error::SampleStore`] if the file cannot be opened, locked or
/// parsed, or a column is not an array of numbers, and
/// [`Error::MissingParameter`] if a filtered name is not stored.
pub fn read_samples(path: &Path, filter: Option<&[&str]>) -> Result<Vec<(String, Vec<f64>)>> {
    let file = File::open(path).map_err(|e| Error::SampleStore(e.to_string()))?;
    file.lock_shared().map_err(|e| Error::SampleStore(e.to_string()))?;

    let parsed: serde_json::Result<Map<String, Value>> =
        serde_json::from_reader(BufReader::new(&file));

    file.unlock().map_err(|e| Error::SampleStore(e.to_string()))?;
    let mut stored = parsed.map_err(|e| Error::SampleStore(e.to_string()))?;

    let names: Vec<String> = match filter {
        Some(names) => names.iter().map(|&p| p.to_owned()).collect(),
        None => stored.keys().cloned().collect(),
    };
    trace_debug!(path = %path.display(), columns = names.len(), "reading sample store");

    let mut columns = Vec::with_capacity(names.len());
    for name in names {
        let value = stored
            .remove(&name)
            .ok_or_else(|| Error::MissingParameter(name.clone()))?;
        let column: Vec<f64> = serde_json::from_value(value)
            .map_err(|e| Error::SampleStore(format!("column '{name}': {e}")))?;
        columns.push((name, column));
    }
    Ok(columns)
}
