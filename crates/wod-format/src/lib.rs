//! Formatting core for weekly WOD digests.
//!
//! This crate provides:
//! - HTML stripping of the markup published by the box APIs
//! - Line classification (section headers, workout types, list items, ...)
//! - Word casing for sources that publish in inconsistent case
//! - Structure rendering into email-ready HTML fragments
//! - Digest assembly, ordered Monday to Friday
//!
//! Everything here is synchronous and total: malformed input degrades to
//! plain paragraphs instead of failing. Fetching and delivery live in the
//! `wod-digest` crate.

pub mod case;
pub mod classify;
pub mod digest;
pub mod entry;
pub mod pipeline;
pub mod profile;
pub mod render;
pub mod strip;
pub mod vocab;

// Re-export main types
pub use case::CaseNormalizer;
pub use classify::{ClassifiedLine, LineClassifier, LineKind};
pub use digest::{Digest, DigestAssembler, DigestEntry, DigestHeader};
pub use entry::{format_iso_date, weekday_label_for, NormalizedEntry, RawEntry};
pub use pipeline::{RenderedEntry, WodFormatter};
pub use profile::{FormattingProfile, Source, WorkoutTypeRule};
pub use render::{RenderState, StructureRenderer};
pub use strip::{strip_html, HtmlStripper};
