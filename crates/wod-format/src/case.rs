//! Word casing for sources that publish WODs in inconsistent case.
//!
//! Casing is cosmetic: it never changes whether a line is blank, a section
//! header, a workout type or a list item. The only structural effect is the
//! four-space indent given to free text inside a section, which the
//! classifier then reads as a sub-section.

use regex::Regex;
use std::sync::LazyLock;

use crate::classify::{is_list_item, list_item_text, section_header_parts};
use crate::vocab::is_acronym;

/// Indent prefixed to free text inside an open section.
pub const SUBSECTION_PREFIX: &str = "    ";

/// Prefix every normalized list item starts with.
pub const LIST_PREFIX: &str = "  • ";

static WOD_TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\s*wod\s+").unwrap());
static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Rewrites word casing line by line.
#[derive(Debug, Default, Clone, Copy)]
pub struct CaseNormalizer;

impl CaseNormalizer {
    /// Normalize a whole entry. A leading `WOD <date>` title line is dropped,
    /// since the digest card header already carries the date.
    pub fn normalize(&self, text: &str) -> String {
        let mut lines = text.lines().peekable();
        if lines.peek().is_some_and(|first| WOD_TITLE.is_match(first)) {
            lines.next();
        }

        let mut in_section = false;
        let mut out = Vec::new();
        for line in lines {
            if section_header_parts(line.trim()).is_some() {
                in_section = true;
            }
            out.push(self.normalize_line(line, in_section));
        }

        EXCESS_NEWLINES
            .replace_all(&out.join("\n"), "\n\n")
            .into_owned()
    }

    /// Normalize one line. `in_section` tells whether a section header has
    /// been seen earlier in the entry (or is this line).
    pub fn normalize_line(&self, line: &str, in_section: bool) -> String {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return String::new();
        }

        if let Some((letter, rest)) = section_header_parts(trimmed) {
            return format!("{letter}) {}", rest.trim().to_uppercase());
        }

        if is_list_item(trimmed) {
            return format!("{LIST_PREFIX}{}", case_words(list_item_text(trimmed)));
        }

        let cased = case_words(trimmed);
        if in_section {
            format!("{SUBSECTION_PREFIX}{cased}")
        } else {
            cased
        }
    }
}

/// Apply [`case_word`] to every whitespace-separated token, rejoined with
/// single spaces.
pub fn case_words(line: &str) -> String {
    line.split_whitespace()
        .map(case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Case one token.
///
/// - acronyms (letters-only or letters-and-digits form) are uppercased
/// - tokens with exactly three letters are uppercased
/// - anything else gets its first letter uppercased and the rest lowercased,
///   leaving any leading punctuation alone
///
/// Tokens without letters pass through unchanged.
pub fn case_word(token: &str) -> String {
    let letters: String = token
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    if letters.is_empty() {
        return token.to_string();
    }

    let alnum: String = token
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();

    if is_acronym(&letters) || is_acronym(&alnum) || letters.chars().count() == 3 {
        return token.to_uppercase();
    }

    match token.char_indices().find(|(_, c)| c.is_alphabetic()) {
        Some((pos, first)) => {
            let rest = &token[pos + first.len_utf8()..];
            format!(
                "{}{}{}",
                &token[..pos],
                first.to_uppercase(),
                rest.to_lowercase()
            )
        }
        None => token.to_string(),
    }
}
