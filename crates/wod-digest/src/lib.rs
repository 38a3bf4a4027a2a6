//! Weekly WOD digests for CrossfitDB and N8 boxes.
//!
//! This crate provides:
//! - TOML configuration with environment overrides for secrets
//! - Monday..Friday week arithmetic and Spanish date parsing
//! - HTTP clients for the CrossfitDB and N8 (aimharder) APIs
//! - SMTP delivery of the assembled digest
//! - A sync runner tying fetching, formatting and delivery together
//!
//! Text normalization and HTML rendering live in `wod-format`.

pub mod config;
pub mod dates;
pub mod email;
pub mod error;
pub mod sources;
pub mod sync;

// Re-export main types
pub use config::Config;
pub use dates::WeekRange;
pub use email::EmailSender;
pub use error::{ConfigError, DeliveryError, Error, SourceError};
pub use sources::{CrossfitDbSource, N8Source, WodSource};
pub use sync::{SyncReport, SyncRunner};
