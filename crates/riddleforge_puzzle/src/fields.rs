//! Field alias probing and value coercion.
//!
//! The source format accepts several alias spellings per logical field.
//! Each field resolves through a small ordered alias list exactly once
//! during normalization; nothing re-probes later.

use riddleforge_foundation::{Error, Result};

/// Ordered aliases for id fields on options, items, sockets, cards, lists.
pub const ID_ALIASES: &[&str] = &["id", "value", "key"];
/// Ordered aliases for display labels.
pub const LABEL_ALIASES: &[&str] = &["label", "name", "text"];
/// Ordered aliases for solutions.
pub const SOLUTION_ALIASES: &[&str] = &["solution", "answer", "correct"];
/// Ordered aliases for the multi-choice selection minimum.
pub const MIN_SELECTIONS_ALIASES: &[&str] = &["min_selections", "minSelections", "min"];
/// Ordered aliases for background images.
pub const BACKGROUND_ALIASES: &[&str] = &["background_image", "backgroundImage", "background"];
/// Ordered aliases for socket accept-lists.
pub const ACCEPTS_ALIASES: &[&str] = &["accepts", "accept", "allowed"];
/// Ordered aliases for image fields.
pub const IMAGE_ALIASES: &[&str] = &["image", "img", "src"];

/// Returns the first alias present in the table, with its value.
#[must_use]
pub fn probe<'a>(table: &'a toml::Table, aliases: &[&str]) -> Option<&'a toml::Value> {
    aliases.iter().find_map(|alias| table.get(*alias))
}

/// Resolves an optional string field.
///
/// # Errors
/// Fails when the field is present but not a string.
pub fn probe_string(
    table: &toml::Table,
    aliases: &[&str],
    context: &str,
) -> Result<Option<String>> {
    match probe(table, aliases) {
        None => Ok(None),
        Some(value) => value.as_str().map(|s| Some(s.to_string())).ok_or_else(|| {
            Error::structural(format!(
                "{context}: field `{}` must be a string",
                aliases[0]
            ))
        }),
    }
}

/// Resolves a required string field.
///
/// # Errors
/// Fails when the field is absent, not a string, or empty.
pub fn require_string(table: &toml::Table, aliases: &[&str], context: &str) -> Result<String> {
    let value = probe_string(table, aliases, context)?.ok_or_else(|| {
        Error::structural(format!("{context}: field `{}` is required", aliases[0]))
    })?;
    if value.trim().is_empty() {
        return Err(Error::structural(format!(
            "{context}: field `{}` must not be empty",
            aliases[0]
        )));
    }
    Ok(value)
}

/// Resolves an optional numeric field, coercing integers, floats, and
/// numeric strings.
///
/// # Errors
/// Fails when the field is present but not numeric.
pub fn probe_number(table: &toml::Table, aliases: &[&str], context: &str) -> Result<Option<f64>> {
    let Some(value) = probe(table, aliases) else {
        return Ok(None);
    };
    coerce_number(value).map(Some).ok_or_else(|| {
        Error::structural(format!(
            "{context}: field `{}` must be a number",
            aliases[0]
        ))
    })
}

/// Resolves a required numeric field.
///
/// # Errors
/// Fails when the field is absent or not numeric.
pub fn require_number(table: &toml::Table, aliases: &[&str], context: &str) -> Result<f64> {
    probe_number(table, aliases, context)?.ok_or_else(|| {
        Error::structural(format!("{context}: field `{}` is required", aliases[0]))
    })
}

/// Coerces a TOML value to a number, accepting numeric strings.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn coerce_number(value: &toml::Value) -> Option<f64> {
    match value {
        toml::Value::Integer(n) => Some(*n as f64),
        toml::Value::Float(n) => Some(*n),
        toml::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Resolves an optional list of strings.
///
/// # Errors
/// Fails when the field is present but not an array of strings.
pub fn probe_string_list(
    table: &toml::Table,
    aliases: &[&str],
    context: &str,
) -> Result<Option<Vec<String>>> {
    let Some(value) = probe(table, aliases) else {
        return Ok(None);
    };
    let array = value.as_array().ok_or_else(|| {
        Error::structural(format!("{context}: field `{}` must be a list", aliases[0]))
    })?;
    array
        .iter()
        .map(|entry| {
            entry.as_str().map(str::to_string).ok_or_else(|| {
                Error::structural(format!(
                    "{context}: field `{}` must contain only strings",
                    aliases[0]
                ))
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

/// Resolves a required list of tables (e.g. `options`, `items`).
///
/// # Errors
/// Fails when the field is absent, not an array, empty, or contains
/// non-table entries.
pub fn require_table_list<'a>(
    table: &'a toml::Table,
    aliases: &[&str],
    context: &str,
) -> Result<Vec<&'a toml::Table>> {
    let value = probe(table, aliases).ok_or_else(|| {
        Error::structural(format!("{context}: field `{}` is required", aliases[0]))
    })?;
    let array = value.as_array().ok_or_else(|| {
        Error::structural(format!("{context}: field `{}` must be a list", aliases[0]))
    })?;
    if array.is_empty() {
        return Err(Error::structural(format!(
            "{context}: field `{}` must not be empty",
            aliases[0]
        )));
    }
    array
        .iter()
        .map(|entry| {
            entry.as_table().ok_or_else(|| {
                Error::structural(format!(
                    "{context}: field `{}` must contain only tables",
                    aliases[0]
                ))
            })
        })
        .collect()
}
