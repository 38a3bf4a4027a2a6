//! CrossfitDB `/api/v1/wods`.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use wod_format::{weekday_label_for, RawEntry, Source};

use super::{get_json, id_to_string, WodSource};
use crate::config::CrossfitDbConfig;
use crate::dates::WeekRange;
use crate::error::SourceError;

#[derive(Debug, Deserialize)]
struct WodsResponse {
    #[serde(default)]
    wods: Vec<ApiWod>,
}

#[derive(Debug, Deserialize)]
struct ApiWod {
    #[serde(default)]
    id: serde_json::Value,
    #[serde(default)]
    date: String,
    #[serde(default)]
    content: Option<String>,
}

/// Fetches WODs with the account's API credentials.
pub struct CrossfitDbSource {
    config: CrossfitDbConfig,
    client: reqwest::Client,
}

impl CrossfitDbSource {
    #[must_use]
    pub fn new(config: CrossfitDbConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl WodSource for CrossfitDbSource {
    fn source(&self) -> Source {
        Source::CrossfitDb
    }

    async fn fetch(&self, week: &WeekRange) -> Result<Vec<RawEntry>, SourceError> {
        let start = week.monday.format("%Y-%m-%d").to_string();
        let end = week.friday.format("%Y-%m-%d").to_string();
        info!(start = %start, end = %end, "Fetching CrossfitDB WODs");

        let request = self.client.get(&self.config.api_url).query(&[
            ("username", self.config.username.as_str()),
            ("password", self.config.password.as_str()),
            ("user_id", self.config.user_id.as_str()),
            ("app_id", self.config.app_id.as_str()),
            ("start_date", start.as_str()),
            ("end_date", end.as_str()),
        ]);
        let response: WodsResponse = get_json(Source::CrossfitDb, request).await?;

        let total = response.wods.len();
        let entries: Vec<RawEntry> = response
            .wods
            .into_iter()
            .filter_map(|wod| {
                let content = wod.content.filter(|c| !c.trim().is_empty())?;
                let weekday = weekday_label_for(&wod.date);
                Some(
                    RawEntry::new(id_to_string(&wod.id), content)
                        .with_date(wod.date)
                        .with_weekday(weekday),
                )
            })
            .collect();

        debug!(total, kept = entries.len(), "CrossfitDB WODs with content");
        Ok(entries)
    }
}
