//! HTML stripping.
//!
//! Block-level tags are rewritten into line breaks and bullet markers before the
//! generic markup-to-text pass, otherwise the list and paragraph structure
//! would be flattened into a single line.

use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

use crate::profile::FormattingProfile;

/// Bullet marker that replaces `<li>`.
pub const BULLET: &str = "• ";

static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static BLOCK_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(?:p|h[1-6])(?:\s[^>]*)?>").unwrap());
static BLOCK_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(?:p|h[1-6])\s*>").unwrap());
static LIST_CONTAINER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?(?:ul|ol)(?:\s[^>]*)?>").unwrap());
static ITEM_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<li(?:\s[^>]*)?>").unwrap());
static ITEM_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</li\s*>").unwrap());

// Every leading bullet, dash or "1." / "1)" numbering, so a stacked `• 1. x`
// is cleaned in one pass.
static LINE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:(?:[•·\-–—]|\d+[.)])\s*)*").unwrap());
static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \u{a0}]+").unwrap());

/// Converts the HTML embedded in a raw WOD into line-oriented plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlStripper {
    clean_lines: bool,
}

impl HtmlStripper {
    /// Create a stripper. With `clean_lines`, every line is trimmed, loses its
    /// leading list marker, and is dropped when nothing is left.
    #[must_use]
    pub const fn new(clean_lines: bool) -> Self {
        Self { clean_lines }
    }

    /// Stripper configured for a profile.
    #[must_use]
    pub const fn for_profile(profile: &FormattingProfile) -> Self {
        Self::new(profile.clean_lines)
    }

    /// Strip markup from `raw`. Never fails; empty input gives an empty string.
    pub fn strip(&self, raw: &str) -> String {
        if raw.trim().is_empty() {
            return String::new();
        }

        let text = raw.replace("\r\n", "\n");
        let text = LINE_BREAK.replace_all(&text, "\n");
        let text = BLOCK_OPEN.replace_all(&text, "");
        let text = BLOCK_CLOSE.replace_all(&text, "\n");
        let text = LIST_CONTAINER.replace_all(&text, "");
        let text = ITEM_OPEN.replace_all(&text, BULLET);
        let text = ITEM_CLOSE.replace_all(&text, "\n");

        let mut text = markup_to_text(&text);

        if self.clean_lines {
            text = text
                .lines()
                .map(|line| LINE_MARKER.replace(line.trim(), "").trim().to_string())
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n");
        }

        let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
        let text = SPACE_RUNS.replace_all(&text, " ");
        text.trim().to_string()
    }
}

/// Strip markup without per-line cleanup.
pub fn strip_html(raw: &str) -> String {
    HtmlStripper::default().strip(raw)
}

/// Remove any remaining tags and decode entities, joining the text nodes with
/// single spaces.
fn markup_to_text(text: &str) -> String {
    if !text.contains('<') && !text.contains('&') {
        return text.to_string();
    }

    let fragment = Html::parse_fragment(text);
    fragment
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_empty() {
        assert_eq!(strip_html(""), "");
        assert_eq!(strip_html("   \n "), "");
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(strip_html("one<br>two<br/>three<BR />four"), "one\ntwo\nthree\nfour");
    }

    #[test]
    fn test_paragraphs_and_headings() {
        let raw = "<h2>A) Strength</h2><p>Back squat 5x5</p><p>Rest 2 min</p>";
        assert_eq!(strip_html(raw), "A) Strength\nBack squat 5x5\nRest 2 min");
    }

    #[test]
    fn test_list_items_become_bullets() {
        let raw = "<ul><li>10 burpees</li><li>20 air squats</li></ul>";
        assert_eq!(strip_html(raw), "• 10 burpees\n• 20 air squats");
    }

    #[test]
    fn test_inline_tags_and_entities() {
        let raw = "<p><strong>AMRAP</strong> 12 &amp; rest</p>";
        assert_eq!(strip_html(raw), "AMRAP 12 & rest");
    }

    #[test]
    fn test_collapses_blank_lines_and_spaces() {
        let raw = "A)   Strength\n\n\n\n\nB) Metcon";
        assert_eq!(strip_html(raw), "A) Strength\n\nB) Metcon");
    }

    #[test]
    fn test_tag_attributes() {
        let raw = r#"<p class="x">Row</p><ul class="y"><li data-i="1">500m</li></ul>"#;
        assert_eq!(strip_html(raw), "Row\n• 500m");
    }

    #[test]
    fn test_clean_lines_drops_markers_and_empty_lines() {
        let stripper = HtmlStripper::new(true);
        let raw = "<ul><li>10 burpees</li><li>- 20 lunges</li></ul><p>1. Row 500m</p><p> </p><p>2) - Bike</p>";
        assert_eq!(stripper.strip(raw), "10 burpees\n20 lunges\nRow 500m\nBike");
    }

    #[test]
    fn test_clean_lines_keeps_section_headers() {
        let stripper = HtmlStripper::new(true);
        assert_eq!(
            stripper.strip("<p>A) Strength</p><p>21-15-9 reps</p>"),
            "A) Strength\n21-15-9 reps"
        );
    }

    #[test]
    fn test_clean_lines_drops_stacked_markers() {
        let stripper = HtmlStripper::new(true);
        let raw = "<ul><li>1. Row 500m</li><li>- 2) Bike</li><li>– 3. Ski</li></ul>";
        let once = stripper.strip(raw);
        assert_eq!(once, "Row 500m\nBike\nSki");
        assert_eq!(stripper.strip(&once), once);

        let html = crate::StructureRenderer::for_profile(&FormattingProfile::CROSSFITDB)
            .render_text(&once);
        assert!(!html.contains("<ul"));
    }

    #[test]
    fn test_idempotent_on_plain_text() {
        for stripper in [HtmlStripper::new(false), HtmlStripper::new(true)] {
            let once = stripper.strip("<p>A) Strength</p><ul><li>Back squat</li></ul><p>AMRAP 12</p>");
            assert_eq!(stripper.strip(&once), once);
        }
    }
}
