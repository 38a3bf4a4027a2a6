//! N8 box timeline on aimharder.
//!
//! The timeline mixes WODs with other activity and carries no structured
//! date: each WOD note opens with a title like `WOD lunes 3 de marzo`, which is
//! where the date comes from. Notes whose title has no usable date are kept
//! undated and end up last in the digest.

use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use wod_format::{strip_html, weekday_label_for, RawEntry, Source};

use super::{get_json, id_to_string, WodSource};
use crate::config::N8Config;
use crate::dates::{find_weekday_in, WeekRange};
use crate::error::SourceError;

static WOD_NOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\s*wod\s").unwrap());

#[derive(Debug, Deserialize)]
struct ActivityResponse {
    #[serde(default)]
    elements: Vec<ActivityElement>,
}

#[derive(Debug, Deserialize)]
struct ActivityElement {
    #[serde(rename = "TIPOWODs", default)]
    wods: Vec<ApiNote>,
}

#[derive(Debug, Deserialize)]
struct ApiNote {
    #[serde(default)]
    id: serde_json::Value,
    #[serde(default)]
    notes: Option<String>,
}

/// Fetches the box timeline for one athlete.
pub struct N8Source {
    config: N8Config,
    client: reqwest::Client,
}

impl N8Source {
    #[must_use]
    pub fn new(config: N8Config, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl WodSource for N8Source {
    fn source(&self) -> Source {
        Source::N8
    }

    async fn fetch(&self, week: &WeekRange) -> Result<Vec<RawEntry>, SourceError> {
        info!(user_id = %self.config.user_id, week = %week, "Fetching N8 timeline");

        let timestamp = Utc::now().timestamp_millis().to_string();
        let request = self.client.get(&self.config.api_url).query(&[
            ("timeLineFormat", "0"),
            ("timeLineContent", "7"),
            ("userID", self.config.user_id.as_str()),
            ("_", timestamp.as_str()),
        ]);
        let response: ActivityResponse = get_json(Source::N8, request).await?;

        let entries: Vec<RawEntry> = response
            .elements
            .into_iter()
            .flat_map(|element| element.wods)
            .filter_map(|note| entry_from_note(note, week))
            .collect();

        debug!(count = entries.len(), "N8 WODs in week");
        Ok(entries)
    }
}

/// Turn one timeline note into an entry, or `None` when it is not a WOD or
/// is dated outside `week`.
fn entry_from_note(note: ApiNote, week: &WeekRange) -> Option<RawEntry> {
    let id = id_to_string(&note.id);
    let notes = note.notes.filter(|n| !n.trim().is_empty())?;

    let text = strip_html(&notes);
    if !WOD_NOTE.is_match(&text) {
        return None;
    }
    let title_weekday = text.lines().next().and_then(find_weekday_in);

    let Some(found) = week.find_date(&text) else {
        warn!(id = %id, "N8 WOD has no recognizable date, keeping it undated");
        let entry = RawEntry::new(id, notes);
        return Some(match title_weekday {
            Some(weekday) => entry.with_weekday(weekday),
            None => entry,
        });
    };
    if !week.contains(found.date) {
        debug!(id = %id, date = %found.date, "N8 WOD outside current week, skipping");
        return None;
    }

    let iso = found.iso();
    let weekday = found
        .weekday
        .as_deref()
        .and_then(find_weekday_in)
        .or(title_weekday)
        .map_or_else(|| weekday_label_for(&iso), str::to_string);

    Some(RawEntry::new(id, notes).with_date(iso).with_weekday(weekday))
}
