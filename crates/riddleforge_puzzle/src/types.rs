//! The closed set of puzzle-type variants.
//!
//! Every consuming stage matches these exhaustively, so adding a puzzle
//! type is a compile-time-checked, total change.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical puzzle type names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PuzzleKind {
    /// Free-text answer.
    Text,
    /// Exactly one option is correct.
    SingleChoice,
    /// One or more options are correct.
    MultiChoice,
    /// Items dragged onto sockets over a background image.
    DragSockets,
    /// Card-pair matching.
    Memory,
    /// A path traced over an implicit grid.
    GridPath,
}

impl PuzzleKind {
    /// Returns the canonical name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::SingleChoice => "single-choice",
            Self::MultiChoice => "multi-choice",
            Self::DragSockets => "drag-sockets",
            Self::Memory => "memory",
            Self::GridPath => "grid-path",
        }
    }
}

impl fmt::Display for PuzzleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A selectable option of a choice puzzle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOption {
    /// Option id, unique within the puzzle.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Optional image asset path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A draggable item of a drag-sockets puzzle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragItem {
    /// Item id, unique within the puzzle.
    pub id: String,
    /// Shape name used by the client to pick a silhouette.
    pub shape: String,
    /// Optional image asset path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A drop target positioned over the background image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Socket {
    /// Socket id, unique within the puzzle.
    pub id: String,
    /// Normalized horizontal position in `[0, 1]`.
    pub x: f64,
    /// Normalized vertical position in `[0, 1]`.
    pub y: f64,
    /// Item ids this socket accepts.
    pub accepts: Vec<String>,
}

/// An unpositioned drop list target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropList {
    /// List id, unique within the puzzle.
    pub id: String,
    /// Optional display label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// The target half of a solution assignment.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignTarget {
    /// A positioned socket.
    Socket(String),
    /// A drop list.
    List(String),
}

impl AssignTarget {
    /// Returns the target id regardless of target kind.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Socket(id) | Self::List(id) => id,
        }
    }
}

/// One solution assignment: an item placed on a socket or list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocketAssignment {
    /// Where the item goes.
    pub target: AssignTarget,
    /// The item id.
    pub item: String,
}

/// A memory card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryCard {
    /// Card id, unique within the puzzle.
    pub id: String,
    /// Optional display label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Optional image asset path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Free-text puzzle payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPuzzle {
    /// The expected answer.
    pub solution: String,
}

/// Single-choice puzzle payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleChoicePuzzle {
    /// Selectable options.
    pub options: Vec<ChoiceOption>,
    /// The correct option id.
    pub solution: String,
}

/// Multi-choice puzzle payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiChoicePuzzle {
    /// Selectable options.
    pub options: Vec<ChoiceOption>,
    /// The correct option ids.
    pub solution: Vec<String>,
    /// Minimum selections the client must allow, clamped to
    /// `[1, option count]`.
    pub min_selections: u32,
}

/// Drag-sockets puzzle payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragSocketsPuzzle {
    /// Draggable items.
    pub items: Vec<DragItem>,
    /// Positioned drop targets.
    pub sockets: Vec<Socket>,
    /// Unpositioned drop lists.
    pub lists: Vec<DropList>,
    /// Background image asset path.
    pub background_image: String,
    /// Normalized solution assignments.
    pub solution: Vec<SocketAssignment>,
}

/// Memory puzzle payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryPuzzle {
    /// The cards on the board.
    pub cards: Vec<MemoryCard>,
    /// The declared pairing solution.
    pub pairs: Vec<(String, String)>,
}

/// Grid-path puzzle payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPathPuzzle {
    /// Background image asset path.
    pub background_image: String,
    /// Grid column count.
    pub columns: u32,
    /// Grid row count.
    pub rows: u32,
    /// Optional path solution, carried opaquely as cell ids.
    pub solution: Vec<String>,
}

/// A normalized puzzle definition: one variant per puzzle type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PuzzleSpec {
    /// Free-text answer.
    Text(TextPuzzle),
    /// Exactly one option is correct.
    SingleChoice(SingleChoicePuzzle),
    /// One or more options are correct.
    MultiChoice(MultiChoicePuzzle),
    /// Items dragged onto sockets.
    DragSockets(DragSocketsPuzzle),
    /// Card-pair matching.
    Memory(MemoryPuzzle),
    /// A path over an implicit grid.
    GridPath(GridPathPuzzle),
}

impl PuzzleSpec {
    /// Returns the canonical kind of this definition.
    #[must_use]
    pub const fn kind(&self) -> PuzzleKind {
        match self {
            Self::Text(_) => PuzzleKind::Text,
            Self::SingleChoice(_) => PuzzleKind::SingleChoice,
            Self::MultiChoice(_) => PuzzleKind::MultiChoice,
            Self::DragSockets(_) => PuzzleKind::DragSockets,
            Self::Memory(_) => PuzzleKind::Memory,
            Self::GridPath(_) => PuzzleKind::GridPath,
        }
    }
}
