//! Upstream WOD APIs.

pub mod crossfitdb;
pub mod n8;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use wod_format::{RawEntry, Source};

use crate::config::Config;
use crate::dates::WeekRange;
use crate::error::SourceError;

pub use crossfitdb::CrossfitDbSource;
pub use n8::N8Source;

/// Longest response body quoted in a status error.
const MAX_ERROR_BODY: usize = 512;

/// A service that publishes the box's WODs.
#[async_trait]
pub trait WodSource: Send + Sync {
    /// Which integration this is; selects the formatting profile.
    fn source(&self) -> Source;

    /// Fetch the WODs published for `week`.
    async fn fetch(&self, week: &WeekRange) -> Result<Vec<RawEntry>, SourceError>;
}

/// Build every source that has a config table, in run order.
pub fn from_config(config: &Config, client: &reqwest::Client) -> Vec<Box<dyn WodSource>> {
    let mut sources: Vec<Box<dyn WodSource>> = Vec::new();
    if let Some(cfdb) = &config.crossfitdb {
        sources.push(Box::new(CrossfitDbSource::new(cfdb.clone(), client.clone())));
    }
    if let Some(n8) = &config.n8 {
        sources.push(Box::new(N8Source::new(n8.clone(), client.clone())));
    }
    sources
}

/// Send `request` and decode a JSON body, mapping failures to [`SourceError`].
pub(crate) async fn get_json<T: DeserializeOwned>(
    source: Source,
    request: reqwest::RequestBuilder,
) -> Result<T, SourceError> {
    let http = |error| SourceError::Http {
        source_name: source,
        error,
    };

    let response = request.send().await.map_err(http)?;
    let status = response.status();
    let body = response.text().await.map_err(http)?;
    debug!(%source, %status, bytes = body.len(), "API response received");

    if !status.is_success() {
        return Err(SourceError::Status {
            source_name: source,
            status,
            body: truncate(&body, MAX_ERROR_BODY).to_string(),
        });
    }

    serde_json::from_str(&body).map_err(|error| SourceError::Decode {
        source_name: source,
        error,
    })
}

/// Identifier as text; APIs send both numbers and strings.
pub(crate) fn id_to_string(id: &serde_json::Value) -> String {
    match id {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_to_string() {
        assert_eq!(id_to_string(&json!(17)), "17");
        assert_eq!(id_to_string(&json!("abc")), "abc");
        assert_eq!(id_to_string(&json!(null)), "");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ñandú", 2), "ñ");
        assert_eq!(truncate("ñandú", 1), "");
    }
}
