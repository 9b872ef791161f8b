//! Metadata header parsing.
//!
//! The header is TOML front matter. Its schema version must equal the
//! single supported version; everything else about release gating is an
//! external access-control decision, so the timestamp is carried opaquely.

use riddleforge_foundation::{Error, Result};

/// The single schema version this build compiles.
pub const SUPPORTED_VERSION: i64 = 2;

/// Parsed, version-checked metadata header of one source document.
#[derive(Clone, Debug, PartialEq)]
pub struct DocHeader {
    /// Declared schema version. Always equals [`SUPPORTED_VERSION`].
    pub version: i64,
    /// Document title.
    pub title: String,
    /// Release timestamp, carried opaquely for the caller.
    pub released: String,
    /// Declared inventory-item ids.
    pub items: Vec<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Optional top-level solved-condition, parsed later by the condition
    /// layer.
    pub solved_when: Option<toml::Value>,
}

impl DocHeader {
    /// Parses and validates a raw header.
    ///
    /// # Errors
    /// Returns an unsupported-version error when the version field is any
    /// integer other than [`SUPPORTED_VERSION`], a parse error for malformed
    /// TOML, and a structural error for missing or mistyped fields.
    pub fn parse(text: &str) -> Result<Self> {
        let table: toml::Table = text
            .parse()
            .map_err(|e| Error::parse(format!("malformed header: {e}")))?;

        let version = table
            .get("version")
            .ok_or_else(|| Error::structural("header field `version` is required"))?
            .as_integer()
            .ok_or_else(|| Error::structural("header field `version` must be an integer"))?;
        if version != SUPPORTED_VERSION {
            return Err(Error::unsupported_version(version, SUPPORTED_VERSION));
        }

        let title = require_string(&table, "title")?;
        let released = require_string(&table, "released")?;
        let items = string_list(&table, "items")?;
        let tags = string_list(&table, "tags")?;
        let solved_when = table.get("solved_when").cloned();

        Ok(Self {
            version,
            title,
            released,
            items,
            tags,
            solved_when,
        })
    }
}

fn require_string(table: &toml::Table, field: &str) -> Result<String> {
    let value = table
        .get(field)
        .ok_or_else(|| Error::structural(format!("header field `{field}` is required")))?;
    let s = value
        .as_str()
        .ok_or_else(|| Error::structural(format!("header field `{field}` must be a string")))?;
    if s.trim().is_empty() {
        return Err(Error::structural(format!(
            "header field `{field}` must not be empty"
        )));
    }
    Ok(s.to_string())
}

fn string_list(table: &toml::Table, field: &str) -> Result<Vec<String>> {
    let Some(value) = table.get(field) else {
        return Ok(Vec::new());
    };
    let array = value
        .as_array()
        .ok_or_else(|| Error::structural(format!("header field `{field}` must be an array")))?;
    array
        .iter()
        .map(|entry| {
            entry.as_str().map(str::to_string).ok_or_else(|| {
                Error::structural(format!("header field `{field}` must contain only strings"))
            })
        })
        .collect()
}
