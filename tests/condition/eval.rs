//! Integration tests for condition parsing and evaluation.

use std::collections::HashSet;

use riddleforge_condition::WhenCondition;

fn value(text: &str) -> toml::Value {
    let table: toml::Table = format!("c = {text}").parse().expect("test toml");
    table.get("c").cloned().expect("c present")
}

fn solved(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(ToString::to_string).collect()
}

fn declared(ids: &[&str]) -> Vec<String> {
    ids.iter().map(ToString::to_string).collect()
}

#[test]
fn grammar_round_trips_through_toml_values() {
    let cond = WhenCondition::parse(&value(
        "{ or = [\"p1\", { and = [\"p2\", \"all\"] }, \"any\"] }",
    ))
    .expect("parse failed");
    assert_eq!(
        cond,
        WhenCondition::Or(vec![
            WhenCondition::Puzzle("p1".into()),
            WhenCondition::And(vec![WhenCondition::Puzzle("p2".into()), WhenCondition::All]),
            WhenCondition::Any,
        ])
    );
}

#[test]
fn evaluation_is_pure_and_total() {
    let cond = WhenCondition::parse(&value("{ and = [\"p1\", \"p2\"] }")).expect("parse");
    let ids = declared(&["p1", "p2"]);
    // Same inputs, same answer, any number of times.
    for _ in 0..3 {
        assert!(cond.is_met(&solved(&["p1", "p2"]), &ids));
        assert!(!cond.is_met(&solved(&["p1"]), &ids));
    }
}

#[test]
fn all_and_any_scoping_asymmetry_is_preserved() {
    let ids = declared(&["p1", "p2"]);
    let foreign = solved(&["someone-elses-puzzle"]);

    // `all` is scoped to the declared ids: foreign solves do not help.
    assert!(!WhenCondition::All.is_met(&foreign, &ids));
    // `any` is not scoped: a foreign solve satisfies it.
    assert!(WhenCondition::Any.is_met(&foreign, &ids));
}

#[test]
fn all_on_empty_document_holds_vacuously() {
    assert!(WhenCondition::All.is_met(&solved(&[]), &declared(&[])));
}

#[test]
fn malformed_conditions_fail_to_parse() {
    for text in ["42", "true", "[\"p1\"]", "{ xor = [\"p1\"] }", "{ and = [] }"] {
        assert!(
            WhenCondition::parse(&value(text)).is_err(),
            "{text} must not parse"
        );
    }
}
