//! WOD entries before and after normalization.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::case::CaseNormalizer;
use crate::profile::FormattingProfile;
use crate::strip::HtmlStripper;
use crate::vocab::{weekday_rank, WEEKDAYS};

/// A WOD as returned by a source API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntry {
    /// Identifier assigned by the source.
    pub source_id: String,
    /// `YYYY-MM-DD`, or empty when unknown.
    #[serde(default)]
    pub iso_date: String,
    /// Spanish weekday name, or empty when unknown.
    #[serde(default)]
    pub weekday_label: String,
    /// Body as published, possibly containing HTML.
    #[serde(default)]
    pub raw_content: String,
}

impl RawEntry {
    /// Create an entry with no date information.
    #[must_use]
    pub fn new(source_id: impl Into<String>, raw_content: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            iso_date: String::new(),
            weekday_label: String::new(),
            raw_content: raw_content.into(),
        }
    }

    /// Set the ISO date.
    #[must_use]
    pub fn with_date(mut self, iso_date: impl Into<String>) -> Self {
        self.iso_date = iso_date.into();
        self
    }

    /// Set the weekday label.
    #[must_use]
    pub fn with_weekday(mut self, weekday_label: impl Into<String>) -> Self {
        self.weekday_label = weekday_label.into();
        self
    }
}

/// A WOD with markup removed and date metadata resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEntry {
    /// Identifier assigned by the source.
    pub source_id: String,
    /// `YYYY-MM-DD`, or empty.
    pub iso_date: String,
    /// Capitalized Spanish weekday, or empty.
    pub weekday_label: String,
    /// `DD/MM/YYYY`, the raw date when it does not parse, or empty.
    pub formatted_date: String,
    /// Newline-delimited text, free of markup.
    pub plain_text: String,
    /// Weekday rank used to order the digest (unknown = 9).
    pub sort_key: u8,
}

impl NormalizedEntry {
    /// Normalize a raw entry with a profile: strip markup, optionally recase,
    /// and resolve the weekday and display date.
    #[must_use]
    pub fn from_raw(raw: &RawEntry, profile: &FormattingProfile) -> Self {
        let stripped = HtmlStripper::for_profile(profile).strip(&raw.raw_content);
        let plain_text = if profile.normalize_case {
            CaseNormalizer.normalize(&stripped)
        } else {
            stripped
        };

        let weekday_label = if raw.weekday_label.trim().is_empty() {
            weekday_label_for(&raw.iso_date)
        } else {
            capitalize(raw.weekday_label.trim())
        };

        Self {
            source_id: raw.source_id.clone(),
            iso_date: raw.iso_date.clone(),
            formatted_date: format_iso_date(&raw.iso_date),
            sort_key: weekday_rank(&weekday_label),
            weekday_label,
            plain_text,
        }
    }

    /// Whether normalization left any text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plain_text.trim().is_empty()
    }

    /// Card title: `"{weekday} {date}"`, or just the date when the weekday is
    /// unknown.
    #[must_use]
    pub fn title(&self) -> String {
        title_for(&self.weekday_label, &self.formatted_date)
    }
}

pub(crate) fn title_for(weekday_label: &str, formatted_date: &str) -> String {
    if weekday_label.is_empty() {
        formatted_date.to_string()
    } else {
        format!("{weekday_label} {formatted_date}")
            .trim_end()
            .to_string()
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_iso_date(iso: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d").ok()
}

/// `YYYY-MM-DD` to `DD/MM/YYYY`. Input that does not parse is returned as is.
pub fn format_iso_date(iso: &str) -> String {
    match parse_iso_date(iso) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => iso.trim().to_string(),
    }
}

/// Spanish weekday name for a `YYYY-MM-DD` date, or empty if it does not
/// parse.
pub fn weekday_label_for(iso: &str) -> String {
    parse_iso_date(iso)
        .map(|date| spanish_weekday(date).to_string())
        .unwrap_or_default()
}

/// Spanish weekday name of a date.
pub fn spanish_weekday(date: NaiveDate) -> &'static str {
    WEEKDAYS[date.weekday().num_days_from_monday() as usize]
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_iso_date() {
        assert_eq!(format_iso_date("2025-03-03"), "03/03/2025");
        assert_eq!(format_iso_date("not a date"), "not a date");
        assert_eq!(format_iso_date(""), "");
    }

    #[test]
    fn test_weekday_label_for() {
        assert_eq!(weekday_label_for("2025-03-03"), "Lunes");
        assert_eq!(weekday_label_for("2025-03-05"), "Miércoles");
        assert_eq!(weekday_label_for("2025-03-08"), "Sábado");
        assert_eq!(weekday_label_for("bad"), "");
    }

    #[test]
    fn test_from_raw_derives_weekday_from_date() {
        let raw = RawEntry::new("1", "<p>A) Strength</p>").with_date("2025-03-06");
        let entry = NormalizedEntry::from_raw(&raw, &FormattingProfile::CROSSFITDB);
        assert_eq!(entry.weekday_label, "Jueves");
        assert_eq!(entry.formatted_date, "06/03/2025");
        assert_eq!(entry.sort_key, 4);
        assert_eq!(entry.plain_text, "A) Strength");
        assert_eq!(entry.title(), "Jueves 06/03/2025");
    }

    #[test]
    fn test_from_raw_keeps_given_weekday() {
        let raw = RawEntry::new("2", "wod martes 4 de marzo<br>a) fuerza<br>back squat")
            .with_date("2025-03-04")
            .with_weekday("martes");
        let entry = NormalizedEntry::from_raw(&raw, &FormattingProfile::N8);
        assert_eq!(entry.weekday_label, "Martes");
        assert_eq!(entry.sort_key, 2);
        assert_eq!(entry.plain_text, "A) FUERZA\n    Back Squat");
    }

    #[test]
    fn test_missing_date_degrades_to_placeholders() {
        let raw = RawEntry::new("3", "Row 500m");
        let entry = NormalizedEntry::from_raw(&raw, &FormattingProfile::CROSSFITDB);
        assert_eq!(entry.weekday_label, "");
        assert_eq!(entry.formatted_date, "");
        assert_eq!(entry.sort_key, 9);
        assert!(!entry.is_empty());
        assert_eq!(entry.title(), "");
    }

    #[test]
    fn test_raw_entry_json_field_names() {
        let raw: RawEntry =
            serde_json::from_str(r#"{"sourceId":"7","isoDate":"2025-03-03","rawContent":"x"}"#)
                .unwrap();
        assert_eq!(raw.source_id, "7");
        assert_eq!(raw.weekday_label, "");
    }
}
