//! Document loading and structural segmentation for Riddleforge.
//!
//! This crate turns one raw source document into typed structural blocks:
//! - [`DocumentSource`] - loads raw text for a (day, locale, mode) variant
//! - [`DocHeader`] - the parsed, version-checked metadata header
//! - [`segment_blocks`] - splits the body into story/puzzle/reward/gate blocks
//! - [`MarkupRenderer`] - the pure prose-to-markup seam

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod blocks;
mod header;
mod markup;
mod source;

pub use blocks::{
    GateBlock, PuzzleBlock, RewardBlock, StoryBlock, StructuralBlock, segment_blocks,
};
pub use header::{DocHeader, SUPPORTED_VERSION};
pub use markup::{MarkupRenderer, ParagraphRenderer};
pub use source::{DaySource, DocumentSource, FsDocumentSource, MemorySource, split_front_matter};
