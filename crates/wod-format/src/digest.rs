//! Digest assembly.
//!
//! Orders rendered entries by weekday, wraps each one in a card and drops the
//! cards into a fixed HTML shell.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::entry::title_for;
use crate::render::html_escape;
use crate::vocab::weekday_rank;

/// Heading of the card shown when there is nothing to send.
pub const EMPTY_DIGEST_HEADING: &str = "Sin WODs disponibles";

/// Body of the card shown when there is nothing to send.
pub const EMPTY_DIGEST_MESSAGE: &str = "No se encontraron WODs para esta semana.";

const FOOTER: &str = "Generado automáticamente — Wodify Box Sync";

/// One rendered workout ready to be placed in the digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestEntry {
    /// Spanish weekday name, or empty.
    pub weekday_label: String,
    /// `DD/MM/YYYY`, or empty.
    pub formatted_date: String,
    /// HTML fragment from the structure renderer.
    pub html: String,
    /// Plain text used for the text/plain alternative.
    pub plain_text: String,
}

impl DigestEntry {
    /// Card heading, `"WOD DEL {weekday} {date}"`.
    #[must_use]
    pub fn heading(&self) -> String {
        format!(
            "WOD DEL {}",
            title_for(&self.weekday_label, &self.formatted_date)
        )
        .trim_end()
        .to_string()
    }
}

/// Text that varies between digests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestHeader {
    /// Box name shown in the logo line, e.g. `"N8"`.
    pub brand: String,
    /// Week shown in the title, e.g. `"03/03/2025 - 07/03/2025"`.
    pub week_label: String,
}

impl DigestHeader {
    /// Create a header.
    #[must_use]
    pub fn new(brand: impl Into<String>, week_label: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            week_label: week_label.into(),
        }
    }
}

/// An assembled digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    /// Complete HTML document.
    pub html: String,
    /// Plain-text alternative.
    pub text: String,
    /// Number of workout cards (zero for the empty digest).
    pub entry_count: usize,
}

impl Digest {
    /// Whether the digest holds no workouts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }
}

/// Builds the digest document.
#[derive(Debug, Clone)]
pub struct DigestAssembler {
    header: DigestHeader,
}

impl DigestAssembler {
    /// Create an assembler for one digest header.
    #[must_use]
    pub const fn new(header: DigestHeader) -> Self {
        Self { header }
    }

    /// Sort entries by weekday (stable) and assemble the document.
    #[must_use]
    pub fn assemble(&self, entries: &[DigestEntry]) -> Digest {
        let ordered = sort_by_weekday(entries);

        let mut cards = String::new();
        if ordered.is_empty() {
            let _ = write!(
                cards,
                "<div class=\"wod-card\">\n<h2>{EMPTY_DIGEST_HEADING}</h2>\n\
                 <div class=\"wod-content\"><p>{EMPTY_DIGEST_MESSAGE}</p></div>\n</div>\n"
            );
        }
        for entry in &ordered {
            let _ = write!(
                cards,
                "<div class=\"wod-card\">\n<h2>{heading}</h2>\n<div class=\"wod-content\">{html}</div>\n</div>\n",
                heading = html_escape(&entry.heading()),
                html = entry.html,
            );
        }

        Digest {
            html: self.document(&cards),
            text: self.plain_text(&ordered),
            entry_count: ordered.len(),
        }
    }

    fn plain_text(&self, ordered: &[&DigestEntry]) -> String {
        let mut text = format!("WODs de la semana ({})\n\n", self.header.week_label);

        if ordered.is_empty() {
            let _ = writeln!(text, "{EMPTY_DIGEST_MESSAGE}\n");
        }
        for entry in ordered {
            let _ = write!(
                text,
                "{heading}\n\n{body}\n\n---\n\n",
                heading = entry.heading(),
                body = entry.plain_text.trim_end(),
            );
        }

        text.push_str(FOOTER);
        text.push('\n');
        text
    }

    fn document(&self, cards: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>WODs de la semana</title>
    <style>
        body {{
            font-family: 'Roboto', Helvetica, Arial, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 800px;
            margin: 0 auto;
            padding: 20px;
            background-color: #f5f7fa;
        }}
        h1 {{
            color: #2c3e50;
            font-size: 28px;
            text-align: center;
            font-weight: 700;
            margin-bottom: 30px;
        }}
        h2 {{
            margin: 0;
            padding: 15px 20px;
            color: white;
            font-size: 18px;
            font-weight: 600;
            background-color: #2980b9;
            border-radius: 8px 8px 0 0;
            letter-spacing: 0.5px;
        }}
        .wod-card {{
            background-color: white;
            border-radius: 8px;
            box-shadow: 0 4px 6px rgba(0,0,0,0.08);
            margin-bottom: 30px;
            overflow: hidden;
        }}
        .wod-content {{
            padding: 25px;
        }}
        .section-header {{
            font-weight: 700;
            font-size: 16px;
            color: #2c3e50;
            background-color: #ecf0f1;
            padding: 8px 12px;
            margin: 15px 0 10px 0;
            border-radius: 4px;
            border-left: 4px solid #3498db;
        }}
        .workout-type {{
            font-weight: 700;
            font-size: 15px;
            color: white;
            background-color: #e74c3c;
            padding: 6px 10px;
            margin: 12px 0 8px 15px;
            border-radius: 3px;
            display: inline-block;
        }}
        .workout-details {{
            margin: 5px 0 5px 25px;
            color: #34495e;
            font-weight: 500;
            font-size: 15px;
        }}
        .subsection {{
            margin: 8px 0 8px 20px;
            color: #34495e;
            font-weight: 500;
        }}
        .wod-list {{
            list-style-type: none;
            padding-left: 10px;
            margin: 10px 0 15px 15px;
        }}
        .wod-list li {{
            position: relative;
            padding-left: 20px;
            margin-bottom: 8px;
            color: #34495e;
        }}
        .wod-list li:before {{
            content: "•";
            position: absolute;
            left: 0;
            color: #3498db;
            font-weight: bold;
        }}
        .wod-paragraph {{
            margin: 10px 0;
            color: #34495e;
        }}
        .footer {{
            text-align: center;
            margin-top: 40px;
            font-size: 13px;
            color: #7f8c8d;
        }}
        .logo {{
            text-align: center;
            margin-bottom: 20px;
        }}
        .logo span {{
            font-size: 18px;
            font-weight: 700;
            color: #2980b9;
            letter-spacing: 2px;
        }}
    </style>
</head>
<body>
    <div class="logo">
        <span>{brand} WODs</span>
    </div>
    <h1>WODs de la semana ({week})</h1>
{cards}
    <div class="footer">
        <p>{footer}</p>
    </div>
</body>
</html>
"#,
            brand = html_escape(&self.header.brand),
            week = html_escape(&self.header.week_label),
            cards = cards,
            footer = FOOTER,
        )
    }
}

/// Entries ordered by weekday rank; ties keep their input order.
pub fn sort_by_weekday(entries: &[DigestEntry]) -> Vec<&DigestEntry> {
    let mut ordered: Vec<&DigestEntry> = entries.iter().collect();
    ordered.sort_by_key(|entry| weekday_rank(&entry.weekday_label));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(weekday: &str, date: &str) -> DigestEntry {
        DigestEntry {
            weekday_label: weekday.to_string(),
            formatted_date: date.to_string(),
            html: format!("<p class=\"wod-paragraph\">{weekday}</p>"),
            plain_text: weekday.to_string(),
        }
    }

    fn assembler() -> DigestAssembler {
        DigestAssembler::new(DigestHeader::new("N8", "03/03/2025 - 07/03/2025"))
    }

    #[test]
    fn test_sort_by_weekday() {
        let entries = vec![
            entry("Jueves", "06/03/2025"),
            entry("Lunes", "03/03/2025"),
            entry("Martes", "04/03/2025"),
        ];
        let order: Vec<_> = sort_by_weekday(&entries)
            .iter()
            .map(|e| e.weekday_label.as_str())
            .collect();
        assert_eq!(order, vec!["Lunes", "Martes", "Jueves"]);
    }

    #[test]
    fn test_unknown_weekday_sorts_last_and_stable() {
        let entries = vec![
            entry("", "a"),
            entry("Viernes", "b"),
            entry("Sábado", "c"),
            entry("Lunes", "d"),
        ];
        let order: Vec<_> = sort_by_weekday(&entries)
            .iter()
            .map(|e| e.formatted_date.as_str())
            .collect();
        assert_eq!(order, vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_heading() {
        assert_eq!(
            entry("Lunes", "03/03/2025").heading(),
            "WOD DEL Lunes 03/03/2025"
        );
        assert_eq!(entry("", "03/03/2025").heading(), "WOD DEL 03/03/2025");
    }

    #[test]
    fn test_assemble_cards_in_weekday_order() {
        let digest = assembler().assemble(&[
            entry("Miércoles", "05/03/2025"),
            entry("Lunes", "03/03/2025"),
        ]);
        assert_eq!(digest.entry_count, 2);
        assert_eq!(digest.html.matches("<div class=\"wod-card\">").count(), 2);
        let lunes = digest.html.find("WOD DEL Lunes").unwrap();
        let miercoles = digest.html.find("WOD DEL Miércoles").unwrap();
        assert!(lunes < miercoles);
        assert!(digest.html.contains("<span>N8 WODs</span>"));
        assert!(digest.html.contains("WODs de la semana (03/03/2025 - 07/03/2025)"));
        assert!(!digest.html.contains(EMPTY_DIGEST_HEADING));
    }

    #[test]
    fn test_assemble_empty_has_single_placeholder_card() {
        let digest = assembler().assemble(&[]);
        assert!(digest.is_empty());
        assert_eq!(digest.html.matches("<div class=\"wod-card\">").count(), 1);
        assert_eq!(digest.html.matches(EMPTY_DIGEST_HEADING).count(), 1);
        assert!(!digest.html.contains("WOD DEL"));
        assert!(digest.text.contains(EMPTY_DIGEST_MESSAGE));
    }

    #[test]
    fn test_plain_text_alternative() {
        let digest = assembler().assemble(&[entry("Martes", "04/03/2025")]);
        assert!(digest.text.starts_with("WODs de la semana (03/03/2025 - 07/03/2025)"));
        assert!(digest.text.contains("WOD DEL Martes 04/03/2025\n\nMartes\n"));
        assert!(digest.text.ends_with("Wodify Box Sync\n"));
    }
}
