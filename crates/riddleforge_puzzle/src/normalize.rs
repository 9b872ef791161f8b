//! Puzzle definition normalization.
//!
//! Applies the per-type schema rules: required fields, id uniqueness,
//! solution membership, numeric coercion and clamping. Fails fast with a
//! structural error naming the offending field or id.

use std::collections::HashSet;

use riddleforge_foundation::{Error, Result};

use crate::fields::{
    ACCEPTS_ALIASES, BACKGROUND_ALIASES, ID_ALIASES, IMAGE_ALIASES, LABEL_ALIASES,
    MIN_SELECTIONS_ALIASES, SOLUTION_ALIASES, probe, probe_number, probe_string,
    probe_string_list, require_number, require_string, require_table_list,
};
use crate::kind::resolve_kind;
use crate::types::{
    AssignTarget, ChoiceOption, DragItem, DragSocketsPuzzle, DropList, GridPathPuzzle,
    MemoryCard, MemoryPuzzle, MultiChoicePuzzle, PuzzleKind, PuzzleSpec, SingleChoicePuzzle,
    Socket, SocketAssignment, TextPuzzle,
};

/// Normalizes a puzzle section's structured definition into a typed spec.
///
/// `id` is the section's explicit or derived id, used in error messages.
///
/// # Errors
/// Returns a structural error when any per-type invariant is violated.
pub fn normalize(id: &str, definition: &toml::Table) -> Result<PuzzleSpec> {
    let context = format!("puzzle '{id}'");
    let raw_kind = probe_string(definition, &["type", "kind"], &context)?.unwrap_or_default();

    match resolve_kind(&raw_kind) {
        PuzzleKind::Text => normalize_text(definition, &context),
        PuzzleKind::SingleChoice => normalize_single_choice(definition, &context),
        PuzzleKind::MultiChoice => normalize_multi_choice(definition, &context),
        PuzzleKind::DragSockets => normalize_drag_sockets(definition, &context),
        PuzzleKind::Memory => normalize_memory(definition, &context),
        PuzzleKind::GridPath => normalize_grid_path(definition, &context),
    }
}

fn normalize_text(definition: &toml::Table, context: &str) -> Result<PuzzleSpec> {
    let solution = require_string(definition, SOLUTION_ALIASES, context)?;
    Ok(PuzzleSpec::Text(TextPuzzle { solution }))
}

fn normalize_single_choice(definition: &toml::Table, context: &str) -> Result<PuzzleSpec> {
    let options = parse_options(definition, context)?;
    let solution = require_string(definition, SOLUTION_ALIASES, context)?;
    ensure_known(&solution, &options, "option", context)?;
    Ok(PuzzleSpec::SingleChoice(SingleChoicePuzzle {
        options,
        solution,
    }))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn normalize_multi_choice(definition: &toml::Table, context: &str) -> Result<PuzzleSpec> {
    let options = parse_options(definition, context)?;

    let solution = probe_string_list(definition, SOLUTION_ALIASES, context)?
        .ok_or_else(|| Error::structural(format!("{context}: field `solution` is required")))?;
    if solution.is_empty() {
        return Err(Error::structural(format!(
            "{context}: field `solution` must name at least one option"
        )));
    }
    for id in &solution {
        ensure_known(id, &options, "option", context)?;
    }

    let min_selections = probe_number(definition, MIN_SELECTIONS_ALIASES, context)?
        .map_or(1, |n| n as u32)
        .clamp(1, options.len() as u32);

    Ok(PuzzleSpec::MultiChoice(MultiChoicePuzzle {
        options,
        solution,
        min_selections,
    }))
}

fn normalize_drag_sockets(definition: &toml::Table, context: &str) -> Result<PuzzleSpec> {
    let items = parse_drag_items(definition, context)?;
    let item_ids: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();

    let sockets = parse_sockets(definition, &item_ids, context)?;
    let lists = parse_drop_lists(definition, context)?;
    let background_image = require_string(definition, BACKGROUND_ALIASES, context)?;
    let solution = parse_socket_solution(definition, &items, &sockets, &lists, context)?;

    Ok(PuzzleSpec::DragSockets(DragSocketsPuzzle {
        items,
        sockets,
        lists,
        background_image,
        solution,
    }))
}

fn normalize_memory(definition: &toml::Table, context: &str) -> Result<PuzzleSpec> {
    let mut cards = Vec::new();
    let mut seen = HashSet::new();
    for entry in require_table_list(definition, &["cards"], context)? {
        let id = require_string(entry, ID_ALIASES, context)?;
        if !seen.insert(id.clone()) {
            return Err(Error::structural(format!(
                "{context}: duplicate card id '{id}'"
            )));
        }
        cards.push(MemoryCard {
            id,
            label: probe_string(entry, LABEL_ALIASES, context)?,
            image: probe_string(entry, IMAGE_ALIASES, context)?,
        });
    }
    if cards.len() < 2 {
        return Err(Error::structural(format!(
            "{context}: field `cards` must declare at least 2 cards"
        )));
    }

    let raw_pairs = probe(definition, &["pairs", "solution", "matches"]).ok_or_else(|| {
        Error::structural(format!("{context}: field `pairs` is required"))
    })?;
    let raw_pairs = raw_pairs.as_array().ok_or_else(|| {
        Error::structural(format!("{context}: field `pairs` must be a list"))
    })?;
    if raw_pairs.is_empty() {
        return Err(Error::structural(format!(
            "{context}: field `pairs` must not be empty"
        )));
    }

    let mut pairs = Vec::new();
    let mut paired = HashSet::new();
    for entry in raw_pairs {
        let pair: Vec<&str> = entry
            .as_array()
            .map(|a| a.iter().filter_map(toml::Value::as_str).collect())
            .unwrap_or_default();
        let [first, second] = pair.as_slice() else {
            return Err(Error::structural(format!(
                "{context}: each pair must list exactly two card ids"
            )));
        };
        for id in [first, second] {
            if !seen.contains(*id) {
                return Err(Error::structural(format!(
                    "{context}: pair references unknown card id '{id}'"
                )));
            }
            if !paired.insert((*id).to_string()) {
                return Err(Error::structural(format!(
                    "{context}: card '{id}' appears in more than one pair"
                )));
            }
        }
        pairs.push(((*first).to_string(), (*second).to_string()));
    }

    Ok(PuzzleSpec::Memory(MemoryPuzzle { cards, pairs }))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn normalize_grid_path(definition: &toml::Table, context: &str) -> Result<PuzzleSpec> {
    let background_image = require_string(definition, BACKGROUND_ALIASES, context)?;
    let columns = probe_number(definition, &["columns", "cols", "width"], context)?
        .map_or(8, |n| (n as u32).max(1));
    let rows = probe_number(definition, &["rows", "height"], context)?
        .map_or(8, |n| (n as u32).max(1));
    let solution = probe_string_list(definition, SOLUTION_ALIASES, context)?.unwrap_or_default();

    Ok(PuzzleSpec::GridPath(GridPathPuzzle {
        background_image,
        columns,
        rows,
        solution,
    }))
}

fn parse_options(definition: &toml::Table, context: &str) -> Result<Vec<ChoiceOption>> {
    let mut options = Vec::new();
    let mut seen = HashSet::new();
    for entry in require_table_list(definition, &["options", "choices"], context)? {
        let id = require_string(entry, ID_ALIASES, context)?;
        if !seen.insert(id.clone()) {
            return Err(Error::structural(format!(
                "{context}: duplicate option id '{id}'"
            )));
        }
        let label = probe_string(entry, LABEL_ALIASES, context)?.unwrap_or_else(|| id.clone());
        options.push(ChoiceOption {
            id,
            label,
            image: probe_string(entry, IMAGE_ALIASES, context)?,
        });
    }
    Ok(options)
}

fn ensure_known(id: &str, options: &[ChoiceOption], what: &str, context: &str) -> Result<()> {
    if options.iter().any(|o| o.id == id) {
        Ok(())
    } else {
        Err(Error::structural(format!(
            "{context}: solution references unknown {what} id '{id}'"
        )))
    }
}

fn parse_drag_items(definition: &toml::Table, context: &str) -> Result<Vec<DragItem>> {
    let mut items = Vec::new();
    let mut seen = HashSet::new();
    for entry in require_table_list(definition, &["items", "pieces"], context)? {
        let id = require_string(entry, ID_ALIASES, context)?;
        if !seen.insert(id.clone()) {
            return Err(Error::structural(format!(
                "{context}: duplicate item id '{id}'"
            )));
        }
        items.push(DragItem {
            shape: require_string(entry, &["shape", "form"], &format!("{context} item '{id}'"))?,
            image: probe_string(entry, IMAGE_ALIASES, context)?,
            id,
        });
    }
    Ok(items)
}

fn parse_sockets(
    definition: &toml::Table,
    item_ids: &HashSet<&str>,
    context: &str,
) -> Result<Vec<Socket>> {
    let mut sockets = Vec::new();
    let mut seen = HashSet::new();
    for entry in require_table_list(definition, &["sockets", "slots"], context)? {
        let id = require_string(entry, ID_ALIASES, context)?;
        if !seen.insert(id.clone()) {
            return Err(Error::structural(format!(
                "{context}: duplicate socket id '{id}'"
            )));
        }
        let socket_context = format!("{context} socket '{id}'");
        let x = require_number(entry, &["x"], &socket_context)?;
        let y = require_number(entry, &["y"], &socket_context)?;
        for (axis, value) in [("x", x), ("y", y)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::structural(format!(
                    "{socket_context}: position `{axis}` must be within [0, 1], got {value}"
                )));
            }
        }
        let accepts = probe_string_list(entry, ACCEPTS_ALIASES, &socket_context)?
            .unwrap_or_default();
        for item in &accepts {
            if !item_ids.contains(item.as_str()) {
                return Err(Error::structural(format!(
                    "{socket_context}: accept-list references unknown item id '{item}'"
                )));
            }
        }
        sockets.push(Socket { id, x, y, accepts });
    }
    Ok(sockets)
}

fn parse_drop_lists(definition: &toml::Table, context: &str) -> Result<Vec<DropList>> {
    let Some(value) = probe(definition, &["lists", "groups"]) else {
        return Ok(Vec::new());
    };
    let array = value.as_array().ok_or_else(|| {
        Error::structural(format!("{context}: field `lists` must be a list"))
    })?;

    let mut lists = Vec::new();
    let mut seen = HashSet::new();
    for entry in array {
        let entry = entry.as_table().ok_or_else(|| {
            Error::structural(format!("{context}: field `lists` must contain only tables"))
        })?;
        let id = require_string(entry, ID_ALIASES, context)?;
        if !seen.insert(id.clone()) {
            return Err(Error::structural(format!(
                "{context}: duplicate list id '{id}'"
            )));
        }
        lists.push(DropList {
            label: probe_string(entry, LABEL_ALIASES, context)?,
            id,
        });
    }
    Ok(lists)
}

/// Parses the two equivalent solution shapes into one assignment list.
///
/// Flat shape: `solution = [{ socket = "s1", item = "i1" }, ...]`.
/// Grouped shape: `solution = { sockets = { s1 = "i1" }, lists = { l1 = "i2" } }`.
fn parse_socket_solution(
    definition: &toml::Table,
    items: &[DragItem],
    sockets: &[Socket],
    lists: &[DropList],
    context: &str,
) -> Result<Vec<SocketAssignment>> {
    let value = probe(definition, SOLUTION_ALIASES).ok_or_else(|| {
        Error::structural(format!("{context}: field `solution` is required"))
    })?;

    let mut assignments = Vec::new();
    match value {
        toml::Value::Array(entries) => {
            for entry in entries {
                let entry = entry.as_table().ok_or_else(|| {
                    Error::structural(format!(
                        "{context}: solution entries must be tables"
                    ))
                })?;
                let target = if let Some(socket) =
                    probe_string(entry, &["socket", "target"], context)?
                {
                    AssignTarget::Socket(socket)
                } else if let Some(list) = probe_string(entry, &["list"], context)? {
                    AssignTarget::List(list)
                } else {
                    return Err(Error::structural(format!(
                        "{context}: solution entry needs a `socket` or `list` target"
                    )));
                };
                let item = require_string(entry, &["item", "value"], context)?;
                assignments.push(SocketAssignment { target, item });
            }
        }
        toml::Value::Table(grouped) => {
            if let Some(socket_map) = grouped.get("sockets") {
                collect_grouped(socket_map, AssignTarget::Socket, &mut assignments, context)?;
            }
            if let Some(list_map) = grouped.get("lists") {
                collect_grouped(list_map, AssignTarget::List, &mut assignments, context)?;
            }
        }
        _ => {
            return Err(Error::structural(format!(
                "{context}: field `solution` must be a list of assignments or a grouped table"
            )));
        }
    }

    if assignments.is_empty() {
        return Err(Error::structural(format!(
            "{context}: field `solution` must assign at least one item"
        )));
    }

    validate_assignments(&assignments, items, sockets, lists, context)?;
    Ok(assignments)
}

fn collect_grouped(
    map: &toml::Value,
    make_target: fn(String) -> AssignTarget,
    assignments: &mut Vec<SocketAssignment>,
    context: &str,
) -> Result<()> {
    let map = map.as_table().ok_or_else(|| {
        Error::structural(format!(
            "{context}: grouped solution entries must be tables"
        ))
    })?;
    for (target_id, item) in map {
        let item = item.as_str().ok_or_else(|| {
            Error::structural(format!(
                "{context}: grouped solution for '{target_id}' must name one item id"
            ))
        })?;
        assignments.push(SocketAssignment {
            target: make_target(target_id.clone()),
            item: item.to_string(),
        });
    }
    Ok(())
}

fn validate_assignments(
    assignments: &[SocketAssignment],
    items: &[DragItem],
    sockets: &[Socket],
    lists: &[DropList],
    context: &str,
) -> Result<()> {
    let mut used_targets = HashSet::new();
    let mut used_items = HashSet::new();

    for assignment in assignments {
        if !items.iter().any(|i| i.id == assignment.item) {
            return Err(Error::structural(format!(
                "{context}: solution references unknown item id '{}'",
                assignment.item
            )));
        }
        if !used_items.insert(assignment.item.clone()) {
            return Err(Error::structural(format!(
                "{context}: solution uses item '{}' more than once",
                assignment.item
            )));
        }
        if !used_targets.insert(assignment.target.clone()) {
            return Err(Error::structural(format!(
                "{context}: solution assigns more than one item to '{}'",
                assignment.target.id()
            )));
        }
        match &assignment.target {
            AssignTarget::Socket(id) => {
                let socket = sockets.iter().find(|s| &s.id == id).ok_or_else(|| {
                    Error::structural(format!(
                        "{context}: solution references unknown socket id '{id}'"
                    ))
                })?;
                if !socket.accepts.contains(&assignment.item) {
                    return Err(Error::structural(format!(
                        "{context}: socket '{id}' does not accept item '{}'",
                        assignment.item
                    )));
                }
            }
            AssignTarget::List(id) => {
                if !lists.iter().any(|l| &l.id == id) {
                    return Err(Error::structural(format!(
                        "{context}: solution references unknown list id '{id}'"
                    )));
                }
            }
        }
    }
    Ok(())
}
