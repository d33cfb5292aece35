//! Reading records from JSON or YAML files.
//!
//! Records are read once at startup; nothing is ever written back.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Result, RosterError};
use crate::person::Person;

/// Supported record file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Format> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            _ => Err(RosterError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Parses a list of people from `text`.
///
/// `origin` only labels errors.
pub fn parse_records(text: &str, format: Format, origin: &Path) -> Result<Vec<Person>> {
    match format {
        Format::Json => serde_json::from_str(text).map_err(|source| RosterError::Json {
            path: origin.to_path_buf(),
            source,
        }),
        Format::Yaml => serde_yaml::from_str(text).map_err(|source| RosterError::Yaml {
            path: origin.to_path_buf(),
            source,
        }),
    }
}

/// Reads a list of people from a `.json`, `.yaml`, or `.yml` file.
pub fn load_records(path: &Path) -> Result<Vec<Person>> {
    let format = Format::from_path(path)?;
    let text = fs::read_to_string(path).map_err(|source| RosterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_records(&text, format, path)?;
    info!(count = records.len(), path = %path.display(), "loaded records");
    Ok(records)
}
