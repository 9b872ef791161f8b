//! Error types for the Riddleforge pipeline.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Compilation is all-or-nothing per day variant: every error here is fatal
//! for the variant it names, except that [`ErrorKind::NotFound`] marks the
//! routine "content not yet authored" condition callers are expected to
//! handle separately.

use std::fmt;

use thiserror::Error;

use crate::context::DayContext;

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for content compilation.
#[derive(Debug, Error)]
#[error("{kind}{}", .context.as_ref().map(|c| format!(" ({c})")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context naming the document variant and block.
    pub context: Option<DocContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds document context to this error.
    #[must_use]
    pub fn with_context(mut self, context: DocContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a not-found error for the given day variant.
    #[must_use]
    pub fn not_found(ctx: DayContext) -> Self {
        Self::new(ErrorKind::NotFound(ctx))
    }

    /// Creates an unsupported-version error.
    #[must_use]
    pub fn unsupported_version(found: i64, supported: i64) -> Self {
        Self::new(ErrorKind::UnsupportedVersion { found, supported })
    }

    /// Creates a structural-validation error.
    #[must_use]
    pub fn structural(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Structural(message.into()))
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse(message.into()))
    }

    /// Returns true if this is the routine not-found condition.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound(_))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// No source document exists for the requested day variant.
    #[error("no source document for {0}")]
    NotFound(DayContext),

    /// The document declares a schema version this build does not support.
    #[error("unsupported schema version {found} (supported: {supported})")]
    UnsupportedVersion {
        /// The version the document declared.
        found: i64,
        /// The single version this build supports.
        supported: i64,
    },

    /// A required field is missing, an id is duplicated, a reference names
    /// an unknown id, or a numeric field is out of range.
    #[error("{0}")]
    Structural(String),

    /// A condition expression or structured definition is malformed.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Context about which document and block an error occurred in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocContext {
    /// The day variant being compiled.
    pub ctx: DayContext,
    /// The block id the error occurred in, if known.
    pub block: Option<String>,
}

impl DocContext {
    /// Creates context for a day variant.
    #[must_use]
    pub fn new(ctx: DayContext) -> Self {
        Self { ctx, block: None }
    }

    /// Sets the block id.
    #[must_use]
    pub fn with_block(mut self, block: impl Into<String>) -> Self {
        self.block = Some(block.into());
        self
    }
}

impl fmt::Display for DocContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ctx)?;
        if let Some(block) = &self.block {
            write!(f, " in block '{block}'")?;
        }
        Ok(())
    }
}
