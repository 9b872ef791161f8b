//! Integration tests for tokenization through the full pipeline.

use std::collections::HashSet;

use riddleforge_compile::{
    CompileRequest, CompiledDay, Compiler, DayBlock, TOKEN_LEN, TokenForge, TokenKind,
};
use riddleforge_document::{MemorySource, ParagraphRenderer};
use riddleforge_foundation::{DayContext, ErrorKind, InventoryItem, InventoryMap};
use riddleforge_puzzle::PuzzleSpec;

const DOC: &str = r#"+++
version = 2
title = "Token Day"
released = "2024-12-04T06:00:00Z"
solved_when = { and = ["lock", "sort"] }
+++

## story: Morning
Look at this: <img src="images/scene.png" srcset="images/scene.png 1x, images/scene@2x.png 2x">

## puzzle: The Lock
id: lock
```
type = "text"
solution = "fox"
```

## puzzle: Sorting
id: sort
```
type = "drag-sockets"
background_image = "images/board.png"
items = [ { id = "i1", shape = "star" }, { id = "i2", shape = "moon" } ]
sockets = [
    { id = "s1", x = 0.2, y = 0.5, accepts = ["i1"] },
    { id = "s2", x = 0.8, y = 0.5, accepts = ["i2"] },
]
solution = [ { socket = "s1", item = "i1" }, { socket = "s2", item = "i2" } ]
```

## reward: A Gift
```
item = "lantern"
```
"#;

fn day_ctx(locale: &str) -> DayContext {
    DayContext::new(4, locale, "default")
}

fn compile_with(secret: &str, locale: &str) -> CompiledDay {
    let ctx = day_ctx(locale);
    let source = MemorySource::new().with(ctx.clone(), DOC);
    let compiler = Compiler::new(source, ParagraphRenderer, TokenForge::from_secret(secret));
    let solved = HashSet::new();
    let mut inventory = InventoryMap::new();
    inventory.insert(
        "lantern".into(),
        InventoryItem::new("lantern", "Lantern").with_icon("images/lantern.png"),
    );
    compiler
        .compile(&CompileRequest {
            ctx,
            solved: &solved,
            include_hidden: false,
            inventory: &inventory,
        })
        .expect("compile failed")
}

#[test]
fn repeat_compiles_are_byte_identical() {
    let first = compile_with("determinism", "de");
    let second = compile_with("determinism", "de");

    let a = serde_json::to_string(&first.content).expect("serialize");
    let b = serde_json::to_string(&second.content).expect("serialize");
    assert_eq!(a, b);
    assert_eq!(first.tokens, second.tokens);
}

#[test]
fn tokens_are_injective_within_a_document() {
    let day = compile_with("injective", "de");
    // The table maps token -> real value; every forward pair must round-trip,
    // so no two distinct real values share a token.
    let mut seen = HashSet::new();
    for (token, real) in day.tokens.iter() {
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(seen.insert(token.clone()), "token reused: {token}");
        assert_eq!(
            day.tokens.token_for(real.kind, &real.value),
            Some(token.as_str())
        );
    }
}

#[test]
fn grading_round_trips_without_the_old_table() {
    let served = compile_with("grading", "de");
    let DayBlock::Puzzle {
        puzzle: PuzzleSpec::Text(text),
        ..
    } = &served.content.blocks[1]
    else {
        panic!("expected the text puzzle");
    };
    let client_token = text.solution.clone();

    // A later submission re-runs the pipeline and re-derives the token for
    // the candidate answer; equality grades the submission.
    let regraded = compile_with("grading", "de");
    assert_eq!(
        regraded.tokens.token_for(TokenKind::Answer, "fox"),
        Some(client_token.as_str())
    );
    assert_eq!(regraded.tokens.token_for(TokenKind::Answer, "wolf"), None);
}

#[test]
fn no_real_identifier_or_path_reaches_the_output() {
    let day = compile_with("leakage", "de");
    let json = serde_json::to_string(&day.content).expect("serialize");
    for needle in [
        "\"lock\"", "\"sort\"", "\"i1\"", "\"i2\"", "\"s1\"", "\"s2\"", "\"lantern\"",
        "images/scene.png", "images/board.png", "images/lantern.png",
    ] {
        assert!(!json.contains(needle), "leaked {needle} in {json}");
    }
}

#[test]
fn markup_asset_references_share_the_story_tokens() {
    let day = compile_with("markup", "de");
    let DayBlock::Story { markup, .. } = &day.content.blocks[0] else {
        panic!("expected story first");
    };
    let scene_token = day
        .tokens
        .token_for(TokenKind::Asset, "images/scene.png")
        .expect("scene tokenized");
    assert!(markup.contains(&format!("src=\"{scene_token}\"")));
    assert!(markup.contains(&format!("srcset=\"{scene_token} 1x")));
}

#[test]
fn identifier_tokens_scope_per_context_but_assets_are_global() {
    let de = compile_with("scopes", "de");
    let en = compile_with("scopes", "en");

    // Identifier scope: same real id, different context, different token.
    assert_ne!(
        de.tokens.token_for(TokenKind::Block, "lock"),
        en.tokens.token_for(TokenKind::Block, "lock")
    );
    // Asset scope is global: the shared image keeps one token.
    assert_eq!(
        de.tokens.token_for(TokenKind::Asset, "images/board.png"),
        en.tokens.token_for(TokenKind::Asset, "images/board.png")
    );
}

#[test]
fn solved_condition_and_puzzle_ids_use_block_tokens() {
    let day = compile_with("condition", "de");
    let lock = day
        .tokens
        .token_for(TokenKind::Block, "lock")
        .expect("lock token");
    let sort = day
        .tokens
        .token_for(TokenKind::Block, "sort")
        .expect("sort token");

    assert_eq!(day.content.puzzle_ids, vec![lock.to_string(), sort.to_string()]);
    let condition = day.content.solved_condition.as_ref().expect("condition");
    let referenced = condition.referenced_ids();
    assert_eq!(referenced, vec![lock, sort]);
}

#[test]
fn unsupported_version_fails_before_tokenization() {
    let ctx = day_ctx("de");
    let source = MemorySource::new().with(
        ctx.clone(),
        "+++\nversion = 1\ntitle = \"Old\"\nreleased = \"then\"\n+++\n\n## story\nHi.\n",
    );
    let compiler = Compiler::new(source, ParagraphRenderer, TokenForge::from_secret("v"));
    let solved = HashSet::new();
    let inventory = InventoryMap::new();
    let err = compiler
        .compile(&CompileRequest {
            ctx,
            solved: &solved,
            include_hidden: false,
            inventory: &inventory,
        })
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::UnsupportedVersion { found: 1, .. }
    ));
}
