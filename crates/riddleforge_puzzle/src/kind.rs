//! Informal type-name resolution.
//!
//! Source documents name puzzle types loosely. Synonyms resolve to the
//! canonical kind; anything unrecognized defaults to `text`, the permissive
//! fallback of the observed format.

use crate::types::PuzzleKind;

/// Resolves an informal type name to a canonical kind.
///
/// Matching ignores case and `-`/`_`/space separators, so `Single-Choice`,
/// `single_choice`, and `singlechoice` are the same name.
#[must_use]
pub fn resolve_kind(raw: &str) -> PuzzleKind {
    let normalized: String = raw
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect();

    match normalized.as_str() {
        "singlechoice" | "single" | "choice" | "radio" => PuzzleKind::SingleChoice,
        "multichoice" | "multiplechoice" | "multi" | "multiple" | "checkbox" | "multiselect" => {
            PuzzleKind::MultiChoice
        }
        "dragsockets" | "drag" | "sockets" | "draganddrop" | "dragdrop" | "dragndrop" => {
            PuzzleKind::DragSockets
        }
        "memory" | "pairs" | "matching" => PuzzleKind::Memory,
        "gridpath" | "path" | "grid" | "maze" => PuzzleKind::GridPath,
        // "text", "input", "freetext", "solution", and anything unrecognized
        _ => PuzzleKind::Text,
    }
}
