//! Public output types.
//!
//! A [`DayContent`] is the compiled, tokenized value handed to the serving
//! layer: every identifier it carries is already an opaque token for the
//! target context.

use serde::{Deserialize, Serialize};

use riddleforge_condition::WhenCondition;
use riddleforge_foundation::InventoryItem;
use riddleforge_puzzle::PuzzleSpec;

/// One output block with its resolved visibility.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum DayBlock {
    /// Narrative prose.
    Story {
        /// Tokenized block id.
        id: String,
        /// Optional title.
        title: Option<String>,
        /// Rendered markup with asset references tokenized.
        markup: String,
        /// Natural visibility under the gate machine.
        visible: bool,
    },
    /// An interactive puzzle.
    Puzzle {
        /// Tokenized block id.
        id: String,
        /// Optional title.
        title: Option<String>,
        /// Rendered markup with asset references tokenized.
        markup: String,
        /// Natural visibility under the gate machine.
        visible: bool,
        /// The normalized, tokenized puzzle payload.
        puzzle: PuzzleSpec,
    },
    /// An unlockable reward.
    Reward {
        /// Tokenized block id.
        id: String,
        /// Optional title.
        title: Option<String>,
        /// Rendered markup with asset references tokenized.
        markup: String,
        /// Natural visibility: segment visibility and the reward's own
        /// unlock condition.
        visible: bool,
        /// The resolved localized item, id and icon tokenized.
        item: Option<InventoryItem>,
    },
}

impl DayBlock {
    /// Returns the block id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Story { id, .. } | Self::Puzzle { id, .. } | Self::Reward { id, .. } => id,
        }
    }

    /// Returns the natural visibility flag.
    #[must_use]
    pub const fn visible(&self) -> bool {
        match self {
            Self::Story { visible, .. }
            | Self::Puzzle { visible, .. }
            | Self::Reward { visible, .. } => *visible,
        }
    }
}

/// The compiled, tokenized content of one day variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayContent {
    /// Document title from the metadata header.
    pub title: String,
    /// Free-form tags from the metadata header.
    pub tags: Vec<String>,
    /// Output blocks in document order.
    pub blocks: Vec<DayBlock>,
    /// Tokenized ids of every puzzle the document declares.
    pub puzzle_ids: Vec<String>,
    /// Tokenized top-level solved-condition, if the document declares one.
    pub solved_condition: Option<WhenCondition>,
}
