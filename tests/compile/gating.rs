//! Integration tests for segment gating through the full pipeline.

use std::collections::HashSet;

use riddleforge_compile::{CompileRequest, CompiledDay, Compiler, TokenForge};
use riddleforge_document::{MemorySource, ParagraphRenderer};
use riddleforge_foundation::{DayContext, InventoryMap, Result};

fn compile(doc: &str, solved: &[&str]) -> Result<CompiledDay> {
    let ctx = DayContext::new(4, "de", "default");
    let source = MemorySource::new().with(ctx.clone(), doc);
    let compiler = Compiler::new(source, ParagraphRenderer, TokenForge::from_secret("gating"));
    let solved: HashSet<String> = solved.iter().map(ToString::to_string).collect();
    let inventory = InventoryMap::new();
    compiler.compile(&CompileRequest {
        ctx,
        solved: &solved,
        include_hidden: false,
        inventory: &inventory,
    })
}

const HEADER: &str = "+++\nversion = 2\ntitle = \"T\"\nreleased = \"now\"\n+++\n";

#[test]
fn example_scenario_from_the_product() {
    // p1 (text, "fox") and p2 (single-choice, a/b, solution a), then a gate
    // on p1, then a trailing story block.
    let doc = format!(
        "{HEADER}\n## puzzle\nid: p1\n```\ntype = \"text\"\nsolution = \"fox\"\n```\n\n## puzzle\nid: p2\n```\ntype = \"single-choice\"\noptions = [ {{ id = \"a\" }}, {{ id = \"b\" }} ]\nsolution = \"a\"\n```\n\n## continue when: p1\n\n## story: After\nDone.\n"
    );

    // Nothing solved: both puzzles visible, the trailing story is not.
    let locked = compile(&doc, &[]).expect("compile failed");
    assert_eq!(locked.content.blocks.len(), 2);
    assert_eq!(locked.content.puzzle_ids.len(), 2);

    // Solving p1 reveals the story.
    let unlocked = compile(&doc, &["p1"]).expect("compile failed");
    assert_eq!(unlocked.content.blocks.len(), 3);
}

#[test]
fn gates_are_monotonic() {
    // G1 gates on p1, G2 on p2. With only p2 solved, G2's segment stays
    // hidden regardless of G2's own truth value.
    let doc = format!(
        "{HEADER}\n## puzzle\nid: p1\n```\nsolution = \"x\"\n```\n## puzzle\nid: p2\n```\nsolution = \"y\"\n```\n\n## continue when: p1\n\n## story: One\nA.\n\n## continue when: p2\n\n## story: Two\nB.\n"
    );

    let only_p2 = compile(&doc, &["p2"]).expect("compile failed");
    assert_eq!(only_p2.content.blocks.len(), 2);

    let only_p1 = compile(&doc, &["p1"]).expect("compile failed");
    assert_eq!(only_p1.content.blocks.len(), 3);

    let both = compile(&doc, &["p1", "p2"]).expect("compile failed");
    assert_eq!(both.content.blocks.len(), 4);
}

#[test]
fn all_gate_requires_every_declared_puzzle() {
    let doc = format!(
        "{HEADER}\n## puzzle\nid: p1\n```\nsolution = \"x\"\n```\n## puzzle\nid: p2\n```\nsolution = \"y\"\n```\n\n## wait for: all\n\n## story: Finale\nEnd.\n"
    );
    assert_eq!(compile(&doc, &["p1"]).expect("compile").content.blocks.len(), 2);
    assert_eq!(
        compile(&doc, &["p1", "p2"]).expect("compile").content.blocks.len(),
        3
    );
}

#[test]
fn any_gate_accepts_foreign_solves() {
    // `any` is deliberately not scoped to this document's puzzles.
    let doc = format!(
        "{HEADER}\n## puzzle\nid: p1\n```\nsolution = \"x\"\n```\n\n## wait for: any\n\n## story: Open\nHi.\n"
    );
    assert_eq!(compile(&doc, &[]).expect("compile").content.blocks.len(), 1);
    assert_eq!(
        compile(&doc, &["from-another-day"]).expect("compile").content.blocks.len(),
        2
    );
}

#[test]
fn structured_gate_conditions_work_end_to_end() {
    let doc = format!(
        "{HEADER}\n## puzzle\nid: p1\n```\nsolution = \"x\"\n```\n## puzzle\nid: p2\n```\nsolution = \"y\"\n```\n\n## continue when\n```\nwhen = {{ or = [\"p1\", \"p2\"] }}\n```\n\n## story: Either\nOk.\n"
    );
    assert_eq!(compile(&doc, &[]).expect("compile").content.blocks.len(), 2);
    assert_eq!(compile(&doc, &["p2"]).expect("compile").content.blocks.len(), 3);
}

#[test]
fn malformed_day_is_all_or_nothing() {
    // The first puzzle is fine; the second is invalid. Nothing is served.
    let doc = format!(
        "{HEADER}\n## puzzle\nid: good\n```\nsolution = \"x\"\n```\n## puzzle\nid: bad\n```\ntype = \"single\"\noptions = [ {{ id = \"a\" }} ]\nsolution = \"zz\"\n```\n"
    );
    assert!(compile(&doc, &[]).is_err());
}
