//! The Riddleforge compile pipeline.
//!
//! Walks one source document from raw text to a tokenized [`DayContent`]:
//! segments partition at continuation-gates, visibility resolves through the
//! sequential gate machine, and every internal identifier and asset
//! reference is replaced by a deterministic keyed-hash token before the
//! result leaves the server.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod assets;
mod output;
mod pipeline;
mod segment;
mod token;
mod tokenize;
mod visibility;

pub use assets::{AssetTokenCache, rewrite_markup_assets};
pub use output::{DayBlock, DayContent};
pub use pipeline::{CompileRequest, CompiledDay, Compiler};
pub use token::{RealValue, TOKEN_LEN, TokenForge, TokenKind, TokenTable, TokenTableBuilder};
