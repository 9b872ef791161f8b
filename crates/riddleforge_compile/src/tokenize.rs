//! Output tokenization.
//!
//! Walks the flagged block list in document order and replaces every
//! structural identifier and local asset reference with its deterministic
//! token. Solution payloads are translated into their tokenized
//! equivalents so grading can compare a submitted token against a
//! re-derived one without ever shipping a real value.

use riddleforge_condition::WhenCondition;
use riddleforge_foundation::InventoryItem;
use riddleforge_puzzle::{
    AssignTarget, ChoiceOption, DragItem, DragSocketsPuzzle, DropList, GridPathPuzzle,
    MemoryCard, MemoryPuzzle, MultiChoicePuzzle, PuzzleSpec, SingleChoicePuzzle, Socket,
    SocketAssignment, TextPuzzle,
};

use crate::assets::rewrite_markup_assets;
use crate::output::DayBlock;
use crate::token::{TokenKind, TokenTableBuilder};

/// Tokenizes the block list, the document-level puzzle-id list, and the
/// top-level solved-condition tree.
pub(crate) fn tokenize_day(
    builder: &mut TokenTableBuilder<'_>,
    blocks: Vec<DayBlock>,
    puzzle_ids: &[String],
    solved_condition: Option<&WhenCondition>,
) -> (Vec<DayBlock>, Vec<String>, Option<WhenCondition>) {
    let blocks = blocks
        .into_iter()
        .map(|block| tokenize_block(builder, block))
        .collect();

    let puzzle_ids = puzzle_ids
        .iter()
        .map(|id| builder.token(TokenKind::Block, id))
        .collect();

    let solved_condition =
        solved_condition.map(|c| c.map_ids(&mut |id| builder.token(TokenKind::Block, id)));

    (blocks, puzzle_ids, solved_condition)
}

fn tokenize_block(builder: &mut TokenTableBuilder<'_>, block: DayBlock) -> DayBlock {
    match block {
        DayBlock::Story {
            id,
            title,
            markup,
            visible,
        } => DayBlock::Story {
            id: builder.token(TokenKind::Block, &id),
            title,
            markup: tokenize_markup(builder, &markup),
            visible,
        },
        DayBlock::Puzzle {
            id,
            title,
            markup,
            visible,
            puzzle,
        } => DayBlock::Puzzle {
            id: builder.token(TokenKind::Block, &id),
            title,
            markup: tokenize_markup(builder, &markup),
            visible,
            puzzle: tokenize_puzzle(builder, puzzle),
        },
        DayBlock::Reward {
            id,
            title,
            markup,
            visible,
            item,
        } => DayBlock::Reward {
            id: builder.token(TokenKind::Block, &id),
            title,
            markup: tokenize_markup(builder, &markup),
            visible,
            item: item.map(|record| tokenize_item_record(builder, record)),
        },
    }
}

fn tokenize_markup(builder: &mut TokenTableBuilder<'_>, markup: &str) -> String {
    rewrite_markup_assets(markup, &mut |path| builder.asset(path))
}

fn tokenize_item_record(
    builder: &mut TokenTableBuilder<'_>,
    record: InventoryItem,
) -> InventoryItem {
    InventoryItem {
        id: builder.token(TokenKind::Item, &record.id),
        name: record.name,
        description: record.description,
        icon: record.icon.map(|path| builder.asset(&path)),
    }
}

fn tokenize_puzzle(builder: &mut TokenTableBuilder<'_>, puzzle: PuzzleSpec) -> PuzzleSpec {
    match puzzle {
        PuzzleSpec::Text(TextPuzzle { solution }) => PuzzleSpec::Text(TextPuzzle {
            solution: builder.token(TokenKind::Answer, &solution),
        }),
        PuzzleSpec::SingleChoice(SingleChoicePuzzle { options, solution }) => {
            PuzzleSpec::SingleChoice(SingleChoicePuzzle {
                options: tokenize_options(builder, options),
                solution: builder.token(TokenKind::Option, &solution),
            })
        }
        PuzzleSpec::MultiChoice(MultiChoicePuzzle {
            options,
            solution,
            min_selections,
        }) => PuzzleSpec::MultiChoice(MultiChoicePuzzle {
            options: tokenize_options(builder, options),
            solution: solution
                .iter()
                .map(|id| builder.token(TokenKind::Option, id))
                .collect(),
            min_selections,
        }),
        PuzzleSpec::DragSockets(DragSocketsPuzzle {
            items,
            sockets,
            lists,
            background_image,
            solution,
        }) => PuzzleSpec::DragSockets(DragSocketsPuzzle {
            items: items
                .into_iter()
                .map(|item| DragItem {
                    id: builder.token(TokenKind::Item, &item.id),
                    shape: item.shape,
                    image: item.image.map(|path| builder.asset(&path)),
                })
                .collect(),
            sockets: sockets
                .into_iter()
                .map(|socket| Socket {
                    id: builder.token(TokenKind::Socket, &socket.id),
                    x: socket.x,
                    y: socket.y,
                    accepts: socket
                        .accepts
                        .iter()
                        .map(|id| builder.token(TokenKind::Item, id))
                        .collect(),
                })
                .collect(),
            lists: lists
                .into_iter()
                .map(|list| DropList {
                    id: builder.token(TokenKind::List, &list.id),
                    label: list.label,
                })
                .collect(),
            background_image: builder.asset(&background_image),
            solution: solution
                .into_iter()
                .map(|assignment| SocketAssignment {
                    target: match assignment.target {
                        AssignTarget::Socket(id) => {
                            AssignTarget::Socket(builder.token(TokenKind::Socket, &id))
                        }
                        AssignTarget::List(id) => {
                            AssignTarget::List(builder.token(TokenKind::List, &id))
                        }
                    },
                    item: builder.token(TokenKind::Item, &assignment.item),
                })
                .collect(),
        }),
        PuzzleSpec::Memory(MemoryPuzzle { cards, pairs }) => PuzzleSpec::Memory(MemoryPuzzle {
            cards: cards
                .into_iter()
                .map(|card| MemoryCard {
                    id: builder.token(TokenKind::Card, &card.id),
                    label: card.label,
                    image: card.image.map(|path| builder.asset(&path)),
                })
                .collect(),
            pairs: pairs
                .iter()
                .map(|(a, b)| {
                    (
                        builder.token(TokenKind::Card, a),
                        builder.token(TokenKind::Card, b),
                    )
                })
                .collect(),
        }),
        PuzzleSpec::GridPath(GridPathPuzzle {
            background_image,
            columns,
            rows,
            solution,
        }) => PuzzleSpec::GridPath(GridPathPuzzle {
            background_image: builder.asset(&background_image),
            columns,
            rows,
            solution: solution
                .iter()
                .map(|cell| builder.token(TokenKind::Answer, cell))
                .collect(),
        }),
    }
}

fn tokenize_options(
    builder: &mut TokenTableBuilder<'_>,
    options: Vec<ChoiceOption>,
) -> Vec<ChoiceOption> {
    options
        .into_iter()
        .map(|option| ChoiceOption {
            id: builder.token(TokenKind::Option, &option.id),
            label: option.label,
            image: option.image.map(|path| builder.asset(&path)),
        })
        .collect()
}
