//! Document sources.
//!
//! A [`DocumentSource`] loads the raw per-(day, locale, mode) source text.
//! Documents are re-read on every request; caching, if any, is an external
//! concern.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use riddleforge_foundation::{DayContext, Error, Result};

/// One raw source unit: the metadata header text and the body text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaySource {
    /// Raw TOML text of the metadata header (between the `+++` fences).
    pub header: String,
    /// Body text after the closing `+++` fence.
    pub body: String,
}

/// Loads raw source documents for day variants.
pub trait DocumentSource {
    /// Loads the document for the given day variant.
    ///
    /// # Errors
    /// Returns a not-found error if no document exists for the variant.
    fn load(&self, ctx: &DayContext) -> Result<DaySource>;
}

/// Splits a raw document into front matter and body.
///
/// The document must begin with a `+++` line; the header runs until the
/// next `+++` line and the body is everything after it.
///
/// # Errors
/// Returns a parse error if either fence is missing.
pub fn split_front_matter(raw: &str) -> Result<DaySource> {
    let mut lines = raw.lines();
    match lines.next() {
        Some(first) if first.trim_end() == "+++" => {}
        _ => return Err(Error::parse("document must begin with a `+++` header fence")),
    }

    let mut header = String::new();
    let mut closed = false;
    for line in lines.by_ref() {
        if line.trim_end() == "+++" {
            closed = true;
            break;
        }
        header.push_str(line);
        header.push('\n');
    }
    if !closed {
        return Err(Error::parse("unterminated `+++` header fence"));
    }

    let mut body = String::new();
    for line in lines {
        body.push_str(line);
        body.push('\n');
    }

    Ok(DaySource { header, body })
}

/// Filesystem source reading `<root>/<locale>/day-NN.<mode>.md`.
#[derive(Clone, Debug)]
pub struct FsDocumentSource {
    root: PathBuf,
}

impl FsDocumentSource {
    /// Creates a source rooted at the given content directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the path a variant would be read from.
    #[must_use]
    pub fn path_for(&self, ctx: &DayContext) -> PathBuf {
        self.root
            .join(&ctx.locale)
            .join(format!("day-{:02}.{}.md", ctx.day, ctx.mode))
    }

    /// Returns the content root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentSource for FsDocumentSource {
    fn load(&self, ctx: &DayContext) -> Result<DaySource> {
        let path = self.path_for(ctx);
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::not_found(ctx.clone())
            } else {
                Error::structural(format!("failed to read {}: {e}", path.display()))
            }
        })?;
        split_front_matter(&raw)
    }
}

/// In-memory source keyed by day context. Used by tests and preview tooling.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    docs: HashMap<DayContext, String>,
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a raw document (front matter included) for a variant.
    pub fn insert(&mut self, ctx: DayContext, raw: impl Into<String>) {
        self.docs.insert(ctx, raw.into());
    }

    /// Builder form of [`MemorySource::insert`].
    #[must_use]
    pub fn with(mut self, ctx: DayContext, raw: impl Into<String>) -> Self {
        self.insert(ctx, raw);
        self
    }
}

impl DocumentSource for MemorySource {
    fn load(&self, ctx: &DayContext) -> Result<DaySource> {
        let raw = self
            .docs
            .get(ctx)
            .ok_or_else(|| Error::not_found(ctx.clone()))?;
        split_front_matter(raw)
    }
}
