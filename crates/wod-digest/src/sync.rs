//! End-to-end sync: fetch, format, assemble and deliver.

use tracing::{error, info, warn};

use wod_format::{
    Digest, DigestAssembler, DigestEntry, DigestHeader, FormattingProfile, Source, WodFormatter,
};

use crate::dates::WeekRange;
use crate::email::{subject_line, EmailSender};
use crate::error::Result;
use crate::sources::WodSource;

/// Outcome of syncing one source.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub source: Source,
    /// Entries returned by the API.
    pub fetched: usize,
    /// Entries that survived formatting.
    pub rendered: usize,
    /// Whether a digest email went out.
    pub delivered: bool,
    /// The assembled digest; `None` when the source had nothing this week.
    pub digest: Option<Digest>,
}

/// Runs sources through the formatting pipeline and mails the result.
pub struct SyncRunner {
    sender: Option<EmailSender>,
    subject: String,
}

impl SyncRunner {
    /// Runner that mails each digest through `sender`.
    #[must_use]
    pub fn new(sender: EmailSender) -> Self {
        Self {
            subject: sender.subject().to_string(),
            sender: Some(sender),
        }
    }

    /// Runner that assembles digests but never sends them.
    #[must_use]
    pub fn dry_run(subject: impl Into<String>) -> Self {
        Self {
            sender: None,
            subject: subject.into(),
        }
    }

    /// Sync one source for `week`.
    pub async fn run(&self, source: &dyn WodSource, week: &WeekRange) -> Result<SyncReport> {
        let name = source.source();
        let raws = source.fetch(week).await?;
        info!(source = %name, week = %week, fetched = raws.len(), "Fetched WODs");

        if raws.is_empty() {
            info!(source = %name, "No WODs this week, nothing to send");
            return Ok(SyncReport {
                source: name,
                fetched: 0,
                rendered: 0,
                delivered: false,
                digest: None,
            });
        }

        let formatter = WodFormatter::new(FormattingProfile::for_source(name));
        let entries: Vec<DigestEntry> = formatter
            .format_batch(&raws)
            .into_iter()
            .map(DigestEntry::from)
            .collect();

        let digest = DigestAssembler::new(DigestHeader::new(name.name(), week.label()))
            .assemble(&entries);

        let delivered = match &self.sender {
            Some(_) if digest.is_empty() => {
                warn!(
                    source = %name,
                    fetched = raws.len(),
                    "Every WOD was empty after formatting, not sending"
                );
                false
            }
            Some(sender) => {
                let subject = subject_line(name.name(), &self.subject, &week.label());
                sender.send_digest(&subject, &digest).await?;
                true
            }
            None => {
                info!(source = %name, entries = digest.entry_count, "Dry run, digest not sent");
                false
            }
        };

        Ok(SyncReport {
            source: name,
            fetched: raws.len(),
            rendered: digest.entry_count,
            delivered,
            digest: Some(digest),
        })
    }

    /// Sync every source in turn. A failing source is logged and the rest
    /// still run.
    pub async fn run_all(
        &self,
        sources: &[Box<dyn WodSource>],
        week: &WeekRange,
    ) -> Vec<(Source, Result<SyncReport>)> {
        let mut results = Vec::with_capacity(sources.len());
        for source in sources {
            let name = source.source();
            let result = self.run(source.as_ref(), week).await;
            if let Err(e) = &result {
                error!(source = %name, error = %e, "Sync failed, continuing with next source");
            }
            results.push((name, result));
        }
        results
    }
}
