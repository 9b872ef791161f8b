//! Segment visibility resolution.
//!
//! A state machine over the ordered segment list: the first segment is
//! always visible; each gate evaluates in order, and once a gate's
//! condition is false, evaluation stops — no later segment becomes visible
//! even if its own gate would hold. This is a strict sequential AND of all
//! gates up to the first failure, not a per-segment independent check.

use std::collections::HashSet;

use tracing::debug;

use riddleforge_foundation::InventoryMap;

use crate::output::DayBlock;
use crate::segment::{ResolvedBlock, ResolvedSegment};

/// Read-only inputs to visibility resolution.
pub(crate) struct VisibilityEnv<'a> {
    /// Puzzle ids the player has solved.
    pub solved: &'a HashSet<String>,
    /// Every puzzle id the document declares.
    pub declared: &'a [String],
    /// Localized inventory records for the target locale.
    pub inventory: &'a InventoryMap,
}

/// Flags every block with its natural visibility.
///
/// Rewards whose declared item does not resolve are dropped entirely; the
/// diagnostics collaborator, not this layer, flags dangling references.
pub(crate) fn resolve_visibility(
    segments: &[ResolvedSegment],
    env: &VisibilityEnv<'_>,
) -> Vec<DayBlock> {
    let mut out = Vec::new();
    let mut gates_open = true;

    for segment in segments {
        let segment_visible = match &segment.condition {
            None => true,
            Some(condition) => {
                if gates_open {
                    gates_open = condition.is_met(env.solved, env.declared);
                }
                gates_open
            }
        };

        for block in &segment.blocks {
            match block {
                ResolvedBlock::Story { id, title, markup } => out.push(DayBlock::Story {
                    id: id.clone(),
                    title: title.clone(),
                    markup: markup.clone(),
                    visible: segment_visible,
                }),
                ResolvedBlock::Puzzle {
                    id,
                    title,
                    markup,
                    spec,
                } => out.push(DayBlock::Puzzle {
                    id: id.clone(),
                    title: title.clone(),
                    markup: markup.clone(),
                    visible: segment_visible,
                    puzzle: spec.clone(),
                }),
                ResolvedBlock::Reward {
                    id,
                    title,
                    markup,
                    item,
                    unlock,
                } => {
                    let resolved = match item {
                        None => None,
                        Some(item_id) => match env.inventory.get(item_id) {
                            Some(record) => Some(record.clone()),
                            None => {
                                debug!(reward = %id, item = %item_id, "dropping reward with unresolvable item");
                                continue;
                            }
                        },
                    };
                    let unlocked = unlock
                        .as_ref()
                        .is_none_or(|c| c.is_met(env.solved, env.declared));
                    out.push(DayBlock::Reward {
                        id: id.clone(),
                        title: title.clone(),
                        markup: markup.clone(),
                        visible: segment_visible && unlocked,
                        item: resolved,
                    });
                }
            }
        }
    }

    out
}
