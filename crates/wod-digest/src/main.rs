//! wod-digest CLI - weekly WOD digests by email.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wod_digest::config::{Config, DEFAULT_CONFIG_PATH};
use wod_digest::error::ConfigError;
use wod_digest::{sources, EmailSender, SyncRunner, WeekRange};
use wod_format::{
    DigestAssembler, DigestEntry, DigestHeader, FormattingProfile, RawEntry, Source, WodFormatter,
};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// wod-digest - Fetch the week's WODs and mail them as an HTML digest.
#[derive(Parser)]
#[command(name = "wod-digest")]
#[command(about = "Weekly WOD digests for CrossfitDB and N8 boxes")]
#[command(version)]
pub struct Cli {
    /// Configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "WOD_DIGEST_CONFIG",
        default_value = DEFAULT_CONFIG_PATH
    )]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch this week's WODs and email one digest per source
    Sync {
        /// Only sync this source (crossfitdb or n8)
        #[arg(long)]
        source: Option<Source>,

        /// Build the digests without sending email
        #[arg(long)]
        dry_run: bool,

        /// Also write the digest HTML here (source name appended when
        /// several sources run)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Render a JSON array of raw entries offline
    Render {
        /// Formatting profile to apply
        #[arg(long)]
        source: Source,

        /// JSON file with the entries
        #[arg(long)]
        input: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Any date in the week shown in the title (YYYY-MM-DD, default today)
        #[arg(long)]
        week: Option<NaiveDate>,
    },

    /// Send a test email to verify SMTP settings
    TestEmail,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("wod_digest=debug,wod_format=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("wod_digest=info,wod_format=info,warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Sync {
            source,
            dry_run,
            output,
        } => {
            tracing::info!(config = %cli.config.display(), ?source, dry_run, "Starting sync");
            run_sync(&cli.config, source, dry_run, output.as_deref()).await
        }
        Commands::Render {
            source,
            input,
            output,
            week,
        } => run_render(source, &input, output.as_deref(), week),
        Commands::TestEmail => run_test_email(&cli.config).await,
    }
}

async fn run_sync(
    config_path: &Path,
    only: Option<Source>,
    dry_run: bool,
    output: Option<&Path>,
) -> Result<()> {
    let config = Config::load(config_path)?;

    if let Some(source) = only {
        if !config.is_enabled(source) {
            return Err(ConfigError::SourceNotConfigured(source).into());
        }
    }

    let runner = if dry_run {
        SyncRunner::dry_run(config.email.subject.clone())
    } else {
        SyncRunner::new(EmailSender::new(config.email.clone())?)
    };

    let client = reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    let selected: Vec<_> = sources::from_config(&config, &client)
        .into_iter()
        .filter(|s| only.is_none_or(|wanted| s.source() == wanted))
        .collect();
    if selected.is_empty() {
        anyhow::bail!(
            "No sources configured in {}; add a [crossfitdb] or [n8] table",
            config_path.display()
        );
    }

    let week = WeekRange::current();
    let results = runner.run_all(&selected, &week).await;

    println!("\nSync summary ({week})");
    let mut failed = 0;
    for (source, result) in &results {
        match result {
            Ok(report) => {
                println!(
                    "   {source}: fetched {}, rendered {}, {}",
                    report.fetched,
                    report.rendered,
                    if report.delivered { "sent" } else { "not sent" }
                );
                if let (Some(path), Some(digest)) = (output, &report.digest) {
                    let path = output_path_for(path, *source, results.len() > 1);
                    std::fs::write(&path, &digest.html)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("      digest written to {}", path.display());
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("   {source}: failed: {e}");
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} sources failed", results.len());
    }
    Ok(())
}

fn run_render(
    source: Source,
    input: &Path,
    output: Option<&Path>,
    week: Option<NaiveDate>,
) -> Result<()> {
    let contents = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let raws: Vec<RawEntry> = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array of entries", input.display()))?;

    let week = week.map_or_else(WeekRange::current, WeekRange::containing);
    let entries: Vec<DigestEntry> = WodFormatter::new(FormattingProfile::for_source(source))
        .format_batch(&raws)
        .into_iter()
        .map(DigestEntry::from)
        .collect();
    let digest =
        DigestAssembler::new(DigestHeader::new(source.name(), week.label())).assemble(&entries);

    tracing::info!(%source, input = raws.len(), rendered = digest.entry_count, "Rendered digest");

    match output {
        Some(path) => std::fs::write(path, &digest.html)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", digest.html),
    }
    Ok(())
}

async fn run_test_email(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    let sender = EmailSender::new(config.email)?;
    sender.send_test().await?;
    println!("Test email sent");
    Ok(())
}

/// `digest.html` becomes `digest-n8.html` when several sources share one
/// output path.
fn output_path_for(path: &Path, source: Source, multiple: bool) -> PathBuf {
    if !multiple {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map_or_else(|| "digest".into(), |s| s.to_string_lossy());
    let suffix = source.to_string().to_lowercase();
    let name = match path.extension() {
        Some(ext) => format!("{stem}-{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{suffix}"),
    };
    path.with_file_name(name)
}
