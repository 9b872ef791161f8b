//! Inventory item records.
//!
//! The inventory resolver is an external collaborator: it maps a reward's
//! declared item id to a localized record. This crate only defines the
//! record shape and the read-only lookup map the pipeline consumes.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A localized inventory item, as supplied by the inventory resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InventoryItem {
    /// The item id as declared in source documents.
    pub id: String,
    /// Localized display name.
    pub name: String,
    /// Localized description, if any.
    pub description: Option<String>,
    /// Icon asset path, if any. Rewritten to an asset token on output.
    pub icon: Option<String>,
}

impl InventoryItem {
    /// Creates an item with a name only.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            icon: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the icon asset path.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Read-only lookup from item id to localized record. May be empty.
pub type InventoryMap = HashMap<String, InventoryItem>;
