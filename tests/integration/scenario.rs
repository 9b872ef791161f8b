//! Whole-pipeline scenarios: one authored day served to a player.

use std::collections::HashSet;

use riddleforge::compile::{CompileRequest, CompiledDay, Compiler, DayBlock, TokenForge, TokenKind};
use riddleforge::document::{MemorySource, ParagraphRenderer};
use riddleforge::foundation::{DayContext, InventoryItem, InventoryMap};
use riddleforge::puzzle::PuzzleSpec;

const DAY_FOUR: &str = r#"+++
version = 2
title = "The Frozen Lock"
released = "2024-12-04T06:00:00Z"
items = ["lantern", "sled"]
tags = ["outdoor"]
solved_when = "all"
+++

## story: Morning
The snow creaked underfoot. <img src="images/yard.png">

## puzzle: The Lock
id: lock
The cellar door is frozen shut.
```
type = "single-choice"
options = [ { id = "warm", label = "Warm the lock" }, { id = "kick", label = "Kick it" } ]
solution = "warm"
```

## continue when: lock

## story: Inside
The door creaks open.

## puzzle: Pairs
id: pairs
```
type = "memory"
cards = [ { id = "c1", image = "cards/holly.png" }, { id = "c2", image = "cards/holly.png" }, { id = "c3" }, { id = "c4" } ]
pairs = [ ["c1", "c2"], ["c3", "c4"] ]
```

## wait for: pairs

## reward: A Lantern
Well earned.
```
item = "lantern"
```

## reward: Ghost Prize
```
item = "not-in-inventory"
```
"#;

fn inventory() -> InventoryMap {
    let mut map = InventoryMap::new();
    map.insert(
        "lantern".into(),
        InventoryItem::new("lantern", "Laterne").with_icon("items/lantern.png"),
    );
    map
}

fn compile(solved: &[&str], include_hidden: bool) -> CompiledDay {
    let ctx = DayContext::new(4, "de", "default");
    let source = MemorySource::new().with(ctx.clone(), DAY_FOUR);
    let compiler = Compiler::new(source, ParagraphRenderer, TokenForge::from_secret("scenario"));
    let solved: HashSet<String> = solved.iter().map(ToString::to_string).collect();
    let inventory = inventory();
    compiler
        .compile(&CompileRequest {
            ctx,
            solved: &solved,
            include_hidden,
            inventory: &inventory,
        })
        .expect("compile failed")
}

#[test]
fn a_fresh_player_sees_only_the_first_segment() {
    let day = compile(&[], false);
    assert_eq!(day.content.title, "The Frozen Lock");
    assert_eq!(day.content.tags, vec!["outdoor".to_string()]);
    // Morning story + lock puzzle; everything behind the gate is absent.
    assert_eq!(day.content.blocks.len(), 2);
    assert!(day.content.blocks.iter().all(|b| b.visible()));
}

#[test]
fn progress_opens_segments_in_order() {
    let after_lock = compile(&["lock"], false);
    // Inside story + pairs puzzle appear; the reward still waits on pairs.
    assert_eq!(after_lock.content.blocks.len(), 4);

    let after_pairs = compile(&["lock", "pairs"], false);
    // The lantern reward appears; the ghost reward is dropped silently.
    assert_eq!(after_pairs.content.blocks.len(), 5);
    let DayBlock::Reward { item, .. } = &after_pairs.content.blocks[4] else {
        panic!("expected the reward last");
    };
    assert_eq!(item.as_ref().map(|i| i.name.as_str()), Some("Laterne"));
}

#[test]
fn dangling_reward_never_surfaces_even_in_preview() {
    let preview = compile(&[], true);
    // 6 authored non-gate blocks minus the dangling reward.
    assert_eq!(preview.content.blocks.len(), 5);
    let visibilities: Vec<bool> = preview.content.blocks.iter().map(DayBlock::visible).collect();
    assert_eq!(visibilities, vec![true, true, false, false, false]);
}

#[test]
fn preview_and_player_views_agree_on_tokens() {
    let preview = compile(&[], true);
    let player = compile(&[], false);
    // Token assignment walks all blocks before filtering, so the views
    // agree on every token.
    assert_eq!(preview.tokens, player.tokens);
    assert_eq!(
        preview.content.blocks[0].id(),
        player.content.blocks[0].id()
    );
}

#[test]
fn the_served_day_is_fully_opaque() {
    let day = compile(&["lock", "pairs"], false);
    let json = serde_json::to_string(&day.content).expect("serialize");

    for internal in [
        "\"lock\"", "\"pairs\"", "\"warm\"", "\"kick\"", "\"c1\"", "\"c2\"",
        "\"lantern\"", "images/yard.png", "cards/holly.png", "items/lantern.png",
    ] {
        assert!(!json.contains(internal), "leaked {internal}");
    }

    // Yet everything needed for play is present and consistent.
    let DayBlock::Puzzle {
        puzzle: PuzzleSpec::SingleChoice(choice),
        ..
    } = &day.content.blocks[1]
    else {
        panic!("expected the lock puzzle");
    };
    assert!(choice.options.iter().any(|o| o.id == choice.solution));
    assert_eq!(choice.options[0].label, "Warm the lock");
}

#[test]
fn grading_a_submission_reproduces_the_token() {
    let served = compile(&[], false);
    let DayBlock::Puzzle {
        puzzle: PuzzleSpec::SingleChoice(choice),
        ..
    } = &served.content.blocks[1]
    else {
        panic!("expected the lock puzzle");
    };
    let submitted = choice.solution.clone();

    // The grader re-runs the pipeline and re-derives the expected token.
    let regraded = compile(&[], false);
    let expected = regraded
        .tokens
        .token_for(TokenKind::Option, "warm")
        .expect("solution tokenized");
    assert_eq!(submitted, expected);
}

#[test]
fn repeated_cards_share_one_asset_token() {
    let day = compile(&["lock"], false);
    let DayBlock::Puzzle {
        puzzle: PuzzleSpec::Memory(memory),
        ..
    } = &day.content.blocks[3]
    else {
        panic!("expected the memory puzzle");
    };
    // c1 and c2 use the same image; the asset token is shared while the
    // card ids stay distinct.
    assert_eq!(memory.cards[0].image, memory.cards[1].image);
    assert_ne!(memory.cards[0].id, memory.cards[1].id);
}
