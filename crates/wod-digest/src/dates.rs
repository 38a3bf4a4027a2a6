//! Week arithmetic and Spanish date parsing.

use chrono::{Datelike, Duration, Local, NaiveDate};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use wod_format::vocab::{month_number, WEEKDAYS};

static SPANISH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)wod\s+(?:(\w+)\s+)?(\d{1,2})\s+de\s+(\w+)(?:\s+de\s+(\d{4}))?").unwrap()
});

/// Working week: Monday through Friday, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    pub monday: NaiveDate,
    pub friday: NaiveDate,
}

impl WeekRange {
    /// Week containing `date`. Weekend dates map to the week that just ended.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
        Self {
            monday,
            friday: monday + Duration::days(4),
        }
    }

    /// Week containing today's local date.
    #[must_use]
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    /// `DD/MM/YYYY - DD/MM/YYYY`.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.monday.format("%d/%m/%Y"),
            self.friday.format("%d/%m/%Y")
        )
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.monday <= date && date <= self.friday
    }

    /// Spanish date in `text`, filling a missing year from this week. A week
    /// that spans New Year tries both years and prefers the one that lands
    /// inside the week.
    #[must_use]
    pub fn find_date(&self, text: &str) -> Option<SpanishDate> {
        let found = extract_spanish_date(text, self.monday.year())?;
        if self.contains(found.date) || self.friday.year() == self.monday.year() {
            return Some(found);
        }
        match extract_spanish_date(text, self.friday.year()) {
            Some(next) if self.contains(next.date) => Some(next),
            _ => Some(found),
        }
    }
}

impl fmt::Display for WeekRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// A date found in a WOD title such as `WOD lunes 3 de marzo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanishDate {
    pub date: NaiveDate,
    /// Word between `wod` and the day number, when present.
    pub weekday: Option<String>,
}

impl SpanishDate {
    /// `YYYY-MM-DD`.
    #[must_use]
    pub fn iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Find `wod [weekday] <day> de <month> [de <year>]` in `text`.
///
/// Returns `None` when there is no match, the month name is unknown, or the
/// day does not exist in that month.
pub fn extract_spanish_date(text: &str, default_year: i32) -> Option<SpanishDate> {
    let caps = SPANISH_DATE.captures(text)?;

    let day: u32 = caps.get(2)?.as_str().parse().ok()?;
    let month = month_number(caps.get(3)?.as_str())?;
    let year = match caps.get(4) {
        Some(m) => m.as_str().parse().ok()?,
        None => default_year,
    };
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    Some(SpanishDate {
        date,
        weekday: caps.get(1).map(|m| m.as_str().to_string()),
    })
}

/// First Monday..Friday name contained in `line`, in its canonical spelling.
pub fn find_weekday_in(line: &str) -> Option<&'static str> {
    let lower = line.to_lowercase();
    WEEKDAYS[..5].iter().copied().find(|day| {
        let day = day.to_lowercase();
        lower.contains(&day) || lower.contains(&strip_accents(&day))
    })
}

fn strip_accents(word: &str) -> String {
    word.chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            other => other,
        })
        .collect()
}
