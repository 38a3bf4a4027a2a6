//! Per-source formatting profiles.
//!
//! The two upstream services publish WODs with different conventions, so the
//! pipeline is shared and parameterized by a [`FormattingProfile`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::vocab::{WORKOUT_KEYWORDS, WORKOUT_PHRASES, WORKOUT_TYPES_EXACT};

/// Upstream service a WOD was fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// CrossfitDB `/api/v1/wods`.
    CrossfitDb,
    /// N8 box timeline on aimharder.
    N8,
}

impl Source {
    /// Get all sources.
    #[must_use]
    pub fn all() -> &'static [Source] {
        &[Source::CrossfitDb, Source::N8]
    }

    /// Display name, also used as the digest brand.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Source::CrossfitDb => "CrossfitDB",
            Source::N8 => "N8",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "crossfitdb" | "cfdb" => Ok(Source::CrossfitDb),
            "n8" | "aimharder" => Ok(Source::N8),
            other => Err(format!("unknown source: {other} (expected crossfitdb or n8)")),
        }
    }
}

/// How a line is recognized as a workout-type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutTypeRule {
    /// Exact match against `exact`, or a short line (at most `max_tokens`
    /// words) containing one of `phrases`.
    Vocabulary {
        exact: &'static [&'static str],
        phrases: &'static [&'static str],
        max_tokens: usize,
    },
    /// The line contains a keyword and either starts with it or has at most
    /// `max_tokens` words.
    Keyword {
        keywords: &'static [&'static str],
        max_tokens: usize,
    },
}

impl WorkoutTypeRule {
    /// Check a trimmed line against this rule. Matching is case-insensitive.
    #[must_use]
    pub fn matches(&self, line: &str) -> bool {
        let lower = line.trim().to_lowercase();
        if lower.is_empty() {
            return false;
        }
        let tokens = lower.split_whitespace().count();

        match *self {
            WorkoutTypeRule::Vocabulary {
                exact,
                phrases,
                max_tokens,
            } => {
                exact.iter().any(|t| *t == lower)
                    || (tokens <= max_tokens && phrases.iter().any(|p| lower.contains(p)))
            }
            WorkoutTypeRule::Keyword {
                keywords,
                max_tokens,
            } => keywords
                .iter()
                .any(|k| lower.contains(k) && (lower.starts_with(k) || tokens <= max_tokens)),
        }
    }
}

/// Formatting rules for one source integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattingProfile {
    /// Source this profile belongs to.
    pub source: Source,
    /// Workout-type detection policy.
    pub workout_rule: WorkoutTypeRule,
    /// Trim every stripped line, drop its leading marker and drop empty lines.
    pub clean_lines: bool,
    /// Run the case normalizer before rendering.
    pub normalize_case: bool,
}

impl FormattingProfile {
    /// CrossfitDB: vocabulary rule, per-line cleanup, original casing kept.
    pub const CROSSFITDB: FormattingProfile = FormattingProfile {
        source: Source::CrossfitDb,
        workout_rule: WorkoutTypeRule::Vocabulary {
            exact: WORKOUT_TYPES_EXACT,
            phrases: WORKOUT_PHRASES,
            max_tokens: 5,
        },
        clean_lines: true,
        normalize_case: false,
    };

    /// N8: keyword rule, raw line layout, case normalization.
    pub const N8: FormattingProfile = FormattingProfile {
        source: Source::N8,
        workout_rule: WorkoutTypeRule::Keyword {
            keywords: WORKOUT_KEYWORDS,
            max_tokens: 5,
        },
        clean_lines: false,
        normalize_case: true,
    };

    /// Profile used for a given source.
    #[must_use]
    pub const fn for_source(source: Source) -> Self {
        match source {
            Source::CrossfitDb => Self::CROSSFITDB,
            Source::N8 => Self::N8,
        }
    }
}
