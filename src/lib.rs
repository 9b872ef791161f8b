//! Riddleforge - content compilation core for an advent-calendar riddle game
//!
//! This crate re-exports all layers of the Riddleforge system for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: riddleforge_compile    — Segments, visibility, tokenizer, pipeline
//! Layer 2: riddleforge_puzzle     — Puzzle definition variants + normalizer
//!          riddleforge_condition  — Gating-condition grammar + evaluator
//! Layer 1: riddleforge_document   — Document source, header, block segmenter
//! Layer 0: riddleforge_foundation — Core types (DayContext, Error, inventory)
//! ```

pub use riddleforge_compile as compile;
pub use riddleforge_condition as condition;
pub use riddleforge_document as document;
pub use riddleforge_foundation as foundation;
pub use riddleforge_puzzle as puzzle;
