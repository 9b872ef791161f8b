//! Core types for the Riddleforge content pipeline.
//!
//! This crate provides:
//! - [`DayContext`] - The (day, locale, mode) tuple identifying one source document
//! - [`Error`] - The typed error taxonomy shared by every pipeline stage
//! - [`InventoryItem`] - The localized record supplied by the inventory resolver

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod context;
mod error;
mod inventory;

pub use context::DayContext;
pub use error::{DocContext, Error, ErrorKind, Result};
pub use inventory::{InventoryItem, InventoryMap};
