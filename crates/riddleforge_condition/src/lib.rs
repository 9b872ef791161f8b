//! Gating conditions for Riddleforge.
//!
//! A [`WhenCondition`] is a small boolean expression tree evaluated against
//! the set of puzzle ids a player has solved and the set of puzzle ids a
//! document declares. Parsing and evaluation are pure; the tree is immutable
//! once parsed.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use riddleforge_foundation::{Error, Result};

/// A boolean gating-condition tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhenCondition {
    /// Every puzzle declared by the document is solved.
    All,
    /// At least one puzzle is solved — anywhere, not scoped to the
    /// document's declared ids. The asymmetry with [`WhenCondition::All`]
    /// is preserved faithfully from the observed behavior.
    Any,
    /// A single puzzle is solved.
    Puzzle(String),
    /// Every sub-condition holds.
    And(Vec<WhenCondition>),
    /// At least one sub-condition holds.
    Or(Vec<WhenCondition>),
}

impl WhenCondition {
    /// Parses a condition from a raw TOML value.
    ///
    /// Accepts a bare string (`"all"`, `"any"`, or a puzzle-id leaf) or a
    /// table with exactly one of the keys `and`/`or` holding a single
    /// condition or a non-empty list.
    ///
    /// # Errors
    /// Returns a parse error for any other shape.
    pub fn parse(value: &toml::Value) -> Result<Self> {
        match value {
            toml::Value::String(s) => Ok(Self::leaf(s)),
            toml::Value::Table(table) => {
                let mut entries = table.iter();
                let Some((key, inner)) = entries.next() else {
                    return Err(Error::parse(
                        "condition table must have exactly one `and` or `or` key",
                    ));
                };
                if entries.next().is_some() {
                    return Err(Error::parse(
                        "condition table must have exactly one `and` or `or` key",
                    ));
                }
                let children = Self::parse_children(inner)?;
                match key.as_str() {
                    "and" => Ok(Self::And(children)),
                    "or" => Ok(Self::Or(children)),
                    other => Err(Error::parse(format!(
                        "unknown condition operator `{other}` (expected `and` or `or`)"
                    ))),
                }
            }
            other => Err(Error::parse(format!(
                "condition must be a string or an and/or table, got {}",
                other.type_str()
            ))),
        }
    }

    /// Parses a bare leaf: `all`, `any`, or a puzzle id (with an optional
    /// `puzzle:` prefix).
    #[must_use]
    pub fn leaf(text: &str) -> Self {
        let text = text.trim();
        match text {
            "all" => Self::All,
            "any" => Self::Any,
            _ => Self::Puzzle(
                text.strip_prefix("puzzle:").map_or(text, str::trim).to_string(),
            ),
        }
    }

    fn parse_children(value: &toml::Value) -> Result<Vec<Self>> {
        match value {
            toml::Value::Array(entries) => {
                if entries.is_empty() {
                    return Err(Error::parse("and/or requires at least one sub-condition"));
                }
                entries.iter().map(Self::parse).collect()
            }
            single => Ok(vec![Self::parse(single)?]),
        }
    }

    /// Evaluates the condition.
    ///
    /// `solved` is the player's solved-id set; `declared` is the set of all
    /// puzzle ids the document declares.
    #[must_use]
    pub fn is_met(&self, solved: &HashSet<String>, declared: &[String]) -> bool {
        match self {
            Self::All => declared.iter().all(|id| solved.contains(id)),
            Self::Any => !solved.is_empty(),
            Self::Puzzle(id) => solved.contains(id),
            Self::And(children) => children.iter().all(|c| c.is_met(solved, declared)),
            Self::Or(children) => children.iter().any(|c| c.is_met(solved, declared)),
        }
    }

    /// Returns every puzzle id the tree references, in encounter order.
    #[must_use]
    pub fn referenced_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids<'a>(&'a self, ids: &mut Vec<&'a str>) {
        match self {
            Self::All | Self::Any => {}
            Self::Puzzle(id) => {
                if !ids.contains(&id.as_str()) {
                    ids.push(id);
                }
            }
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_ids(ids);
                }
            }
        }
    }

    /// Returns a copy of the tree with every puzzle-id leaf rewritten.
    pub fn map_ids(&self, f: &mut impl FnMut(&str) -> String) -> Self {
        match self {
            Self::All => Self::All,
            Self::Any => Self::Any,
            Self::Puzzle(id) => Self::Puzzle(f(id)),
            Self::And(children) => Self::And(children.iter().map(|c| c.map_ids(f)).collect()),
            Self::Or(children) => Self::Or(children.iter().map(|c| c.map_ids(f)).collect()),
        }
    }
}
