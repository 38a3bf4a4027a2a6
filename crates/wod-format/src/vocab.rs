//! Fixed vocabularies shared by every formatting profile.
//!
//! These tables are process-wide and read-only. Profiles pick from them; nothing
//! mutates them at runtime.

/// Words that are always rendered fully uppercase.
pub const ACRONYMS: &[&str] = &[
    "wod", "amrap", "emom", "rx", "tabata", "du", "ygig", "c2b", "t2b", "sc", "kbsr",
];

/// Lines that name a workout format when they match exactly (case-insensitive).
pub const WORKOUT_TYPES_EXACT: &[&str] = &[
    "amrap",
    "emom",
    "tabata",
    "etabata",
    "for time",
    "buy in",
    "cash out",
    "strength",
    "skill",
    "metcon",
    "wod",
    "warm up",
    "core",
    "accessory",
];

/// Phrases that mark a short line as a workout-format description.
pub const WORKOUT_PHRASES: &[&str] = &[
    "for time", "every", "rounds", "reps", "minutes", "complete", "perform", "work", "rest",
];

/// Narrow keyword list used by the keyword-based workout-type rule.
pub const WORKOUT_KEYWORDS: &[&str] = &["amrap", "emom", "tabata", "for time", "etabata"];

/// Spanish weekday names, Monday first.
pub const WEEKDAYS: [&str; 7] = [
    "Lunes",
    "Martes",
    "Miércoles",
    "Jueves",
    "Viernes",
    "Sábado",
    "Domingo",
];

/// Rank given to weekday labels outside Monday..Friday (and to empty labels).
pub const UNKNOWN_WEEKDAY_RANK: u8 = 9;

const WEEKDAY_RANKS: &[(&str, u8)] = &[
    ("lunes", 1),
    ("martes", 2),
    ("miércoles", 3),
    ("miercoles", 3),
    ("jueves", 4),
    ("viernes", 5),
];

/// Spanish month names in calendar order.
pub const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Sort rank of a weekday label: Lunes=1 .. Viernes=5, anything else 9.
pub fn weekday_rank(label: &str) -> u8 {
    let label = label.trim().to_lowercase();
    WEEKDAY_RANKS
        .iter()
        .find(|(name, _)| *name == label)
        .map_or(UNKNOWN_WEEKDAY_RANK, |(_, rank)| *rank)
}

/// Month number (1-12) for a Spanish month name.
pub fn month_number(name: &str) -> Option<u32> {
    let name = name.trim().to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == name)
        .and_then(|idx| u32::try_from(idx + 1).ok())
}

/// True when the lowercase, letters-only form of a token is a known acronym.
pub fn is_acronym(letters_lower: &str) -> bool {
    ACRONYMS.contains(&letters_lower)
}
