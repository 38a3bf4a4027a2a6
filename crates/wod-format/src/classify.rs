//! Line classification.
//!
//! Rules are tried in a fixed priority order and the first match wins:
//! blank, section header, workout type, list item, sub-section, paragraph.
//! Classification is total; anything unrecognized is a paragraph.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::profile::{FormattingProfile, WorkoutTypeRule};
use crate::render::RenderState;

/// Leading indentation (in columns, tab = 4) that marks a line as nested under
/// the open section.
pub const SUBSECTION_INDENT: usize = 2;

static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z])[).]\s*(.*)$").unwrap());
static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:• |-|\d+[.)])").unwrap());
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:•|-|\d+[.)])\s*").unwrap());

/// Structural role of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Lettered section start, e.g. `A) Strength`.
    SectionHeader,
    /// Training format tag, e.g. `AMRAP 12`.
    WorkoutType,
    /// Bullet, dash or numbered item.
    ListItem,
    /// Detail line nested under a section or workout type.
    SubSection,
    /// Anything else.
    Paragraph,
    /// Empty or whitespace-only line.
    Blank,
}

/// A line tagged with its kind and the text to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedLine {
    /// Structural role.
    pub kind: LineKind,
    /// Header letter for section headers, otherwise the letter of the section
    /// the line sits in (if any).
    pub section_letter: Option<char>,
    /// Renderable text: header remainder, item text without its marker, or
    /// the trimmed line.
    pub text: String,
}

impl ClassifiedLine {
    fn new(kind: LineKind, section_letter: Option<char>, text: impl Into<String>) -> Self {
        Self {
            kind,
            section_letter,
            text: text.into(),
        }
    }
}

/// Classifies lines with a profile's workout-type rule.
#[derive(Debug, Clone, Copy)]
pub struct LineClassifier {
    workout_rule: WorkoutTypeRule,
}

impl LineClassifier {
    /// Create a classifier with an explicit workout-type rule.
    #[must_use]
    pub const fn new(workout_rule: WorkoutTypeRule) -> Self {
        Self { workout_rule }
    }

    /// Classifier for a profile.
    #[must_use]
    pub const fn for_profile(profile: &FormattingProfile) -> Self {
        Self::new(profile.workout_rule)
    }

    /// Classify one line given the renderer state accumulated so far.
    pub fn classify(&self, line: &str, state: &RenderState) -> ClassifiedLine {
        let trimmed = line.trim();
        let section = state.current_section;

        if trimmed.is_empty() {
            return ClassifiedLine::new(LineKind::Blank, section, "");
        }

        if let Some(caps) = SECTION_HEADER.captures(trimmed) {
            let letter = caps[1].chars().next().map(|c| c.to_ascii_uppercase());
            return ClassifiedLine::new(LineKind::SectionHeader, letter, caps[2].trim());
        }

        if self.workout_rule.matches(trimmed) {
            return ClassifiedLine::new(LineKind::WorkoutType, section, trimmed);
        }

        if is_list_item(trimmed) {
            return ClassifiedLine::new(LineKind::ListItem, section, list_item_text(trimmed));
        }

        let nested = section.is_some() && indentation(line) >= SUBSECTION_INDENT;
        if nested || state.current_workout_type.is_some() {
            return ClassifiedLine::new(LineKind::SubSection, section, trimmed);
        }

        ClassifiedLine::new(LineKind::Paragraph, section, trimmed)
    }
}

/// Whether a trimmed line starts with a bullet, dash or numbering marker.
pub fn is_list_item(trimmed: &str) -> bool {
    LIST_ITEM.is_match(trimmed)
}

/// Item text with the leading marker removed.
pub fn list_item_text(line: &str) -> &str {
    match LIST_MARKER.find(line) {
        Some(m) => line[m.end()..].trim_end(),
        None => line.trim(),
    }
}

/// Split a section header into its uppercased letter and remainder.
pub fn section_header_parts(trimmed: &str) -> Option<(char, &str)> {
    let caps = SECTION_HEADER.captures(trimmed)?;
    let letter = caps.get(1)?.as_str().chars().next()?.to_ascii_uppercase();
    let rest = caps.get(2).map_or("", |m| m.as_str());
    Some((letter, rest))
}

fn indentation(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}
