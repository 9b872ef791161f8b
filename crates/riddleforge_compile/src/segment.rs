//! Segment resolution.
//!
//! Converts the parse-time block list into gate-partitioned segments with
//! fully typed contents: puzzle definitions normalized, gate and reward
//! conditions parsed. Fail-fast: the first invalid block aborts the whole
//! day variant.

use riddleforge_condition::WhenCondition;
use riddleforge_document::StructuralBlock;
use riddleforge_foundation::{Error, Result};
use riddleforge_puzzle::{PuzzleSpec, normalize};

/// One typed block between gates.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ResolvedBlock {
    Story {
        id: String,
        title: Option<String>,
        markup: String,
    },
    Puzzle {
        id: String,
        title: Option<String>,
        markup: String,
        spec: PuzzleSpec,
    },
    Reward {
        id: String,
        title: Option<String>,
        markup: String,
        item: Option<String>,
        unlock: Option<WhenCondition>,
    },
}

/// A maximal run of non-gate blocks. The first segment has no condition.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ResolvedSegment {
    pub condition: Option<WhenCondition>,
    pub blocks: Vec<ResolvedBlock>,
}

/// The fully typed document body.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ResolvedDocument {
    pub segments: Vec<ResolvedSegment>,
    /// Every puzzle id the document declares, in order.
    pub puzzle_ids: Vec<String>,
}

/// Types every block and partitions the list at continuation-gates.
pub(crate) fn resolve_document(blocks: Vec<StructuralBlock>) -> Result<ResolvedDocument> {
    let mut segments = vec![ResolvedSegment {
        condition: None,
        blocks: Vec::new(),
    }];
    let mut puzzle_ids: Vec<String> = Vec::new();

    for block in blocks {
        match block {
            StructuralBlock::Gate(gate) => {
                let condition = WhenCondition::parse(&gate.when)?;
                segments.push(ResolvedSegment {
                    condition: Some(condition),
                    blocks: Vec::new(),
                });
            }
            StructuralBlock::Story(story) => {
                push_block(
                    &mut segments,
                    ResolvedBlock::Story {
                        id: story.id,
                        title: story.title,
                        markup: story.markup,
                    },
                );
            }
            StructuralBlock::Puzzle(puzzle) => {
                if puzzle_ids.contains(&puzzle.id) {
                    return Err(Error::structural(format!(
                        "duplicate puzzle id '{}'",
                        puzzle.id
                    )));
                }
                let spec = normalize(&puzzle.id, &puzzle.definition)?;
                puzzle_ids.push(puzzle.id.clone());
                push_block(
                    &mut segments,
                    ResolvedBlock::Puzzle {
                        id: puzzle.id,
                        title: puzzle.title,
                        markup: puzzle.markup,
                        spec,
                    },
                );
            }
            StructuralBlock::Reward(reward) => {
                let unlock = reward
                    .unlock_when
                    .as_ref()
                    .map(WhenCondition::parse)
                    .transpose()?;
                push_block(
                    &mut segments,
                    ResolvedBlock::Reward {
                        id: reward.id,
                        title: reward.title,
                        markup: reward.markup,
                        item: reward.item,
                        unlock,
                    },
                );
            }
        }
    }

    Ok(ResolvedDocument {
        segments,
        puzzle_ids,
    })
}

fn push_block(segments: &mut Vec<ResolvedSegment>, block: ResolvedBlock) {
    if let Some(segment) = segments.last_mut() {
        segment.blocks.push(block);
    }
}
