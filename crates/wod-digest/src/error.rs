//! Error types for fetching and delivering digests.

use std::path::PathBuf;

use thiserror::Error;
use wod_format::Source;

/// Top-level error for a sync run.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A source API failed
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The digest could not be mailed
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Errors loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for the expected schema
    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A required value is missing after env overrides
    #[error("Missing configuration value: {0}")]
    Missing(&'static str),

    /// Source requested but has no config table
    #[error("Source not configured: {0}")]
    SourceNotConfigured(Source),
}

/// Errors talking to a source API.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed
    #[error("HTTP request to {source_name} failed: {error}")]
    Http {
        source_name: Source,
        #[source]
        error: reqwest::Error,
    },

    /// API answered with a non-success status
    #[error("{source_name} API returned {status}: {body}")]
    Status {
        source_name: Source,
        status: reqwest::StatusCode,
        body: String,
    },

    /// Response body is not the expected JSON
    #[error("Unexpected {source_name} response: {error}")]
    Decode {
        source_name: Source,
        #[source]
        error: serde_json::Error,
    },
}

/// Errors sending the digest email.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Sender or recipient is not a valid mailbox
    #[error("Invalid email address {address}: {error}")]
    Address {
        address: String,
        #[source]
        error: lettre::address::AddressError,
    },

    /// Message could not be built
    #[error("Failed to build email message: {0}")]
    Message(#[from] lettre::error::Error),

    /// SMTP transport failed
    #[error("Failed to send email via SMTP: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Result alias for this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
