//! Block segmentation.
//!
//! Splits body text on `## ` headings into ordered raw sections and
//! classifies each as story, puzzle, reward, or continuation-gate.
//! Unrecognized headings are dropped silently; that is the permissive
//! default of the observed format, never an error.

use riddleforge_foundation::{Error, Result};
use tracing::debug;

use crate::markup::MarkupRenderer;

/// A story block: free prose.
#[derive(Clone, Debug, PartialEq)]
pub struct StoryBlock {
    /// Block id (explicit `id:` line or derived `story-<n>`).
    pub id: String,
    /// Optional title from the heading.
    pub title: Option<String>,
    /// Rendered prose markup.
    pub markup: String,
}

/// A puzzle block: prose plus an embedded structured definition.
#[derive(Clone, Debug, PartialEq)]
pub struct PuzzleBlock {
    /// Block id (explicit `id:` line or derived `puzzle-<n>`).
    pub id: String,
    /// Optional title from the heading.
    pub title: Option<String>,
    /// Rendered prose markup with the definition fence stripped.
    pub markup: String,
    /// Raw structured definition; empty table when the fence is absent.
    pub definition: toml::Table,
}

/// A reward block: prose plus an optional inventory reference and unlock
/// condition.
#[derive(Clone, Debug, PartialEq)]
pub struct RewardBlock {
    /// Block id (explicit `id:` line or derived `reward-<n>`).
    pub id: String,
    /// Optional title from the heading.
    pub title: Option<String>,
    /// Rendered prose markup.
    pub markup: String,
    /// Declared inventory-item id, if any.
    pub item: Option<String>,
    /// Raw unlock condition, parsed by the condition layer.
    pub unlock_when: Option<toml::Value>,
}

/// A continuation-gate: a required condition that starts a new segment.
#[derive(Clone, Debug, PartialEq)]
pub struct GateBlock {
    /// Raw condition value, parsed by the condition layer.
    pub when: toml::Value,
}

/// One parse-time structural block.
#[derive(Clone, Debug, PartialEq)]
pub enum StructuralBlock {
    /// Free prose.
    Story(StoryBlock),
    /// Prose plus a typed puzzle definition.
    Puzzle(PuzzleBlock),
    /// Prose plus an optional inventory reference.
    Reward(RewardBlock),
    /// A segment boundary with a required condition.
    Gate(GateBlock),
}

impl StructuralBlock {
    /// Returns the block id, if this block kind carries one.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Story(b) => Some(&b.id),
            Self::Puzzle(b) => Some(&b.id),
            Self::Reward(b) => Some(&b.id),
            Self::Gate(_) => None,
        }
    }
}

/// Splits body text into ordered structural blocks.
///
/// # Errors
/// Returns a parse error for an unterminated definition fence, malformed
/// fence TOML, or a gate without a condition.
pub fn segment_blocks(
    body: &str,
    renderer: &dyn MarkupRenderer,
) -> Result<Vec<StructuralBlock>> {
    let mut blocks = Vec::new();
    let mut story_count = 0u32;
    let mut puzzle_count = 0u32;
    let mut reward_count = 0u32;

    for section in split_sections(body) {
        let lower = section.heading.to_lowercase();
        if lower.starts_with("story") {
            story_count += 1;
            let parts = parse_section_body(&section, &format!("story-{story_count}"))?;
            blocks.push(StructuralBlock::Story(StoryBlock {
                id: parts.id.unwrap_or_else(|| format!("story-{story_count}")),
                title: section.title(),
                markup: renderer.render(&parts.prose),
            }));
        } else if lower.starts_with("puzzle") {
            puzzle_count += 1;
            let parts = parse_section_body(&section, &format!("puzzle-{puzzle_count}"))?;
            blocks.push(StructuralBlock::Puzzle(PuzzleBlock {
                id: parts.id.unwrap_or_else(|| format!("puzzle-{puzzle_count}")),
                title: section.title(),
                markup: renderer.render(&parts.prose),
                definition: parts.definition.unwrap_or_default(),
            }));
        } else if lower.starts_with("reward") {
            reward_count += 1;
            let parts = parse_section_body(&section, &format!("reward-{reward_count}"))?;
            let definition = parts.definition.unwrap_or_default();
            blocks.push(StructuralBlock::Reward(RewardBlock {
                id: parts.id.unwrap_or_else(|| format!("reward-{reward_count}")),
                title: section.title(),
                markup: renderer.render(&parts.prose),
                item: reward_item(&definition)?,
                unlock_when: reward_unlock(&definition),
            }));
        } else if lower.starts_with("continue when") {
            blocks.push(StructuralBlock::Gate(parse_gate(&section, false)?));
        } else if lower.starts_with("wait for") {
            blocks.push(StructuralBlock::Gate(parse_gate(&section, true)?));
        } else {
            debug!(heading = %section.heading, "dropping unrecognized heading");
        }
    }

    Ok(blocks)
}

/// One heading-delimited raw section.
struct RawSection {
    heading: String,
    lines: Vec<String>,
}

impl RawSection {
    /// Heading text after the first colon, trimmed; `None` when absent or
    /// empty.
    fn title(&self) -> Option<String> {
        let (_, rest) = self.heading.split_once(':')?;
        let rest = rest.trim();
        if rest.is_empty() {
            None
        } else {
            Some(rest.to_string())
        }
    }
}

fn split_sections(body: &str) -> Vec<RawSection> {
    let mut sections: Vec<RawSection> = Vec::new();
    for line in body.lines() {
        if let Some(heading) = line.strip_prefix("## ") {
            sections.push(RawSection {
                heading: heading.trim().to_string(),
                lines: Vec::new(),
            });
        } else if let Some(section) = sections.last_mut() {
            section.lines.push(line.to_string());
        }
        // Text before the first heading is ignored; the header already
        // carries all document-level data.
    }
    sections
}

/// The pieces of one section body: explicit id, definition fence, prose.
struct SectionBody {
    id: Option<String>,
    definition: Option<toml::Table>,
    prose: String,
}

fn parse_section_body(section: &RawSection, label: &str) -> Result<SectionBody> {
    let mut id = None;
    let mut fence_lines: Vec<&str> = Vec::new();
    let mut has_fence = false;
    let mut in_fence = false;
    let mut seen_content = false;
    let mut prose_lines: Vec<&str> = Vec::new();

    for line in &section.lines {
        if in_fence {
            if line.trim() == "```" {
                in_fence = false;
            } else {
                fence_lines.push(line);
            }
            continue;
        }
        if !seen_content {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(value) = line.trim().strip_prefix("id:") {
                id = Some(strip_quotes(value.trim()).to_string());
                seen_content = true;
                continue;
            }
        }
        seen_content = true;
        if !has_fence && line.trim_start().starts_with("```") {
            has_fence = true;
            in_fence = true;
            continue;
        }
        prose_lines.push(line);
    }

    if in_fence {
        return Err(Error::parse(format!(
            "block '{label}': unterminated definition fence"
        )));
    }

    let definition = if has_fence {
        let text = fence_lines.join("\n");
        let table = text
            .parse::<toml::Table>()
            .map_err(|e| Error::parse(format!("block '{label}': malformed definition: {e}")))?;
        Some(table)
    } else {
        None
    };

    Ok(SectionBody {
        id,
        definition,
        prose: prose_lines.join("\n").trim().to_string(),
    })
}

fn strip_quotes(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Parses a gate section. `inline_only` marks the `wait for:` form, which
/// takes its condition from the heading text alone.
fn parse_gate(section: &RawSection, inline_only: bool) -> Result<GateBlock> {
    let inline = section
        .heading
        .split_once(':')
        .map(|(_, rest)| rest.trim())
        .filter(|rest| !rest.is_empty());

    if let Some(condition) = inline {
        return Ok(GateBlock {
            when: toml::Value::String(condition.to_string()),
        });
    }
    if inline_only {
        return Err(Error::parse(format!(
            "gate '{}' requires an inline condition",
            section.heading
        )));
    }

    let parts = parse_section_body(section, &section.heading)?;
    let when = parts
        .definition
        .as_ref()
        .and_then(|table| table.get("when"))
        .cloned()
        .ok_or_else(|| {
            Error::parse(format!(
                "gate '{}' requires a condition (inline or `when =` in a fence)",
                section.heading
            ))
        })?;
    Ok(GateBlock { when })
}

fn reward_item(definition: &toml::Table) -> Result<Option<String>> {
    for alias in ["item", "item_id"] {
        if let Some(value) = definition.get(alias) {
            let s = value.as_str().ok_or_else(|| {
                Error::structural(format!("reward field `{alias}` must be a string"))
            })?;
            return Ok(Some(s.to_string()));
        }
    }
    Ok(None)
}

fn reward_unlock(definition: &toml::Table) -> Option<toml::Value> {
    ["unlock_when", "unlockWhen", "unlock"]
        .iter()
        .find_map(|alias| definition.get(*alias).cloned())
}
