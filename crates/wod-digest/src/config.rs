//! Configuration file and environment overrides.
//!
//! ```toml
//! [email]
//! username = "box@gmail.com"
//! password = "app-password"
//! to = "athletes@example.com"
//!
//! [crossfitdb]
//! username = "coach"
//! password = "secret"
//! user_id = "123"
//! app_id = "456"
//!
//! [n8]
//! user_id = "789"
//! ```
//!
//! A missing `[crossfitdb]` or `[n8]` table disables that source.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use wod_format::Source;

use crate::error::ConfigError;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "wod-digest.toml";

/// Default Gmail SMTP host.
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Default Gmail SMTP port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Default subject, completed with the source and week.
pub const DEFAULT_SUBJECT: &str = "WODs de la semana";

pub const DEFAULT_CROSSFITDB_API_URL: &str = "https://crossfitdb.com/api/v1/wods";
pub const DEFAULT_N8_API_URL: &str = "https://boxn8.aimharder.com/api/activity";

fn default_smtp_host() -> String {
    DEFAULT_SMTP_HOST.to_string()
}
fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}
fn default_subject() -> String {
    DEFAULT_SUBJECT.to_string()
}
fn default_crossfitdb_api_url() -> String {
    DEFAULT_CROSSFITDB_API_URL.to_string()
}
fn default_n8_api_url() -> String {
    DEFAULT_N8_API_URL.to_string()
}

/// Whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub email: EmailConfig,
    pub crossfitdb: Option<CrossfitDbConfig>,
    pub n8: Option<N8Config>,
}

/// SMTP delivery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username (Gmail address).
    #[serde(default)]
    pub username: String,
    /// SMTP password (Gmail app password).
    #[serde(default)]
    pub password: String,
    /// Sender; defaults to the SMTP username.
    #[serde(default)]
    pub from: Option<String>,
    /// Recipient.
    #[serde(default)]
    pub to: String,
    #[serde(default = "default_subject")]
    pub subject: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from: None,
            to: String::new(),
            subject: default_subject(),
        }
    }
}

impl EmailConfig {
    /// Sender address.
    #[must_use]
    pub fn from_address(&self) -> &str {
        self.from
            .as_deref()
            .filter(|from| !from.is_empty())
            .unwrap_or(&self.username)
    }

    /// Check that everything needed to send is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.is_empty() {
            return Err(ConfigError::Missing("email.username"));
        }
        if self.password.is_empty() {
            return Err(ConfigError::Missing("email.password"));
        }
        if self.to.is_empty() {
            return Err(ConfigError::Missing("email.to"));
        }
        Ok(())
    }
}

/// CrossfitDB API credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossfitDbConfig {
    #[serde(default = "default_crossfitdb_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub app_id: String,
}

/// N8 (aimharder) timeline settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct N8Config {
    #[serde(default = "default_n8_api_url")]
    pub api_url: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: String,
}

/// Account ids are accepted as `user_id = 123` or `user_id = "123"`.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}

impl Config {
    /// Read a TOML file and apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.apply_overrides(|key| std::env::var(key).ok());
        tracing::debug!(
            path = %path.display(),
            sources = ?config.enabled_sources(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Override secrets from `lookup` (normally the process environment).
    /// Empty values are ignored. Source overrides only apply to sources that
    /// have a table in the file.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get("WOD_SMTP_USERNAME") {
            self.email.username = v;
        }
        if let Some(v) = get("WOD_SMTP_PASSWORD") {
            self.email.password = v;
        }
        if let Some(v) = get("WOD_MAIL_TO") {
            self.email.to = v;
        }

        if let Some(cfdb) = self.crossfitdb.as_mut() {
            if let Some(v) = get("CROSSFITDB_USERNAME") {
                cfdb.username = v;
            }
            if let Some(v) = get("CROSSFITDB_PASSWORD") {
                cfdb.password = v;
            }
        }

        if let Some(n8) = self.n8.as_mut() {
            if let Some(v) = get("N8_USER_ID") {
                n8.user_id = v;
            }
        }
    }

    /// Sources with a config table, in run order.
    #[must_use]
    pub fn enabled_sources(&self) -> Vec<Source> {
        Source::all()
            .iter()
            .copied()
            .filter(|source| self.is_enabled(*source))
            .collect()
    }

    #[must_use]
    pub fn is_enabled(&self, source: Source) -> bool {
        match source {
            Source::CrossfitDb => self.crossfitdb.is_some(),
            Source::N8 => self.n8.is_some(),
        }
    }
}
