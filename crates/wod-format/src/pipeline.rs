//! Per-entry pipeline: strip, recase, classify and render.

use tracing::{debug, warn};

use crate::digest::DigestEntry;
use crate::entry::{NormalizedEntry, RawEntry};
use crate::profile::FormattingProfile;
use crate::render::StructureRenderer;

/// An entry carried through the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEntry {
    pub entry: NormalizedEntry,
    pub html: String,
}

impl From<RenderedEntry> for DigestEntry {
    fn from(rendered: RenderedEntry) -> Self {
        Self {
            weekday_label: rendered.entry.weekday_label,
            formatted_date: rendered.entry.formatted_date,
            html: rendered.html,
            plain_text: rendered.entry.plain_text,
        }
    }
}

/// Formats raw entries with one source profile.
#[derive(Debug, Clone, Copy)]
pub struct WodFormatter {
    profile: FormattingProfile,
}

impl WodFormatter {
    #[must_use]
    pub const fn new(profile: FormattingProfile) -> Self {
        Self { profile }
    }

    #[must_use]
    pub const fn profile(&self) -> &FormattingProfile {
        &self.profile
    }

    /// Run one entry through the pipeline. Entries that end up with no text
    /// are logged and skipped.
    pub fn format_entry(&self, raw: &RawEntry) -> Option<RenderedEntry> {
        let entry = NormalizedEntry::from_raw(raw, &self.profile);
        if entry.is_empty() {
            warn!(
                source = %self.profile.source,
                id = %raw.source_id,
                "WOD has no content after normalization, skipping"
            );
            return None;
        }

        let html = StructureRenderer::for_profile(&self.profile).render_text(&entry.plain_text);
        debug!(
            source = %self.profile.source,
            id = %entry.source_id,
            weekday = %entry.weekday_label,
            bytes = html.len(),
            "Rendered WOD"
        );

        Some(RenderedEntry { entry, html })
    }

    /// Format every entry, dropping the empty ones. Input order is kept.
    pub fn format_batch(&self, raws: &[RawEntry]) -> Vec<RenderedEntry> {
        raws.iter().filter_map(|raw| self.format_entry(raw)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_entry_renders_html() {
        let formatter = WodFormatter::new(FormattingProfile::CROSSFITDB);
        let raw = RawEntry::new(
            "1",
            "<p>A) Strength</p><p>For time</p><ul><li>21 thrusters</li></ul>",
        )
        .with_date("2025-03-03");
        let rendered = formatter.format_entry(&raw).unwrap();
        assert_eq!(rendered.entry.weekday_label, "Lunes");
        assert!(rendered.html.contains("<div class=\"section-header\">A) Strength</div>"));
        assert!(rendered.html.contains("<div class=\"workout-type\">For time</div>"));
        // Per-line cleanup removed the bullet, so the item is a detail line.
        assert!(rendered.html.contains("<div class=\"workout-details\">21 thrusters</div>"));
    }

    #[test]
    fn test_empty_entry_is_skipped() {
        let formatter = WodFormatter::new(FormattingProfile::N8);
        assert!(formatter.format_entry(&RawEntry::new("1", "<p> </p>")).is_none());
        // Only the title line: dropped by the case normalizer.
        assert!(formatter
            .format_entry(&RawEntry::new("2", "WOD lunes 3 de marzo"))
            .is_none());
    }

    #[test]
    fn test_format_batch_keeps_order() {
        let formatter = WodFormatter::new(FormattingProfile::CROSSFITDB);
        let raws = vec![
            RawEntry::new("b", "Row 500m"),
            RawEntry::new("empty", ""),
            RawEntry::new("a", "Bike 1000m"),
        ];
        let ids: Vec<_> = formatter
            .format_batch(&raws)
            .into_iter()
            .map(|r| r.entry.source_id)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_into_digest_entry() {
        let formatter = WodFormatter::new(FormattingProfile::CROSSFITDB);
        let raw = RawEntry::new("1", "Row 500m").with_date("2025-03-04");
        let digest_entry: DigestEntry = formatter.format_entry(&raw).unwrap().into();
        assert_eq!(digest_entry.heading(), "WOD DEL Martes 04/03/2025");
        assert_eq!(digest_entry.plain_text, "Row 500m");
    }
}
