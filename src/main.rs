use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use boardgame_recs::config::{LoggingSettings, Settings};
use boardgame_recs::core::{BrowseFilter, ComplexityBand, DurationBand};
use boardgame_recs::services::pipeline;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for boardgame-recs
#[derive(Parser, Debug)]
#[command(name = "boardgame-recs")]
#[command(about = "Personalized board game buy recommendations")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to config/default.toml and config/local.toml)
    #[arg(short, long, global = true, env = "BGREC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the preference profile from the collection export
    Profile,
    /// Write the exclusion set and owned-games list from the collection export
    Exclusions,
    /// Rank the global pool against the preference profile
    Recommend {
        /// Keep only the top N recommendations
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Recommend from the collection's wishlist instead of the global pool
    Wishlist {
        /// Also include tracked games that are not explicitly wanted
        #[arg(long)]
        include_tracked: bool,
    },
    /// Filter the published recommendations and print them as JSON
    Browse {
        /// Player count; exactly 6 matches games for six or more
        #[arg(long)]
        players: Option<u32>,
        #[arg(long, value_enum)]
        complexity: Option<ComplexityArg>,
        #[arg(long, value_enum)]
        duration: Option<DurationArg>,
    },
    /// Rewrite ids in the published recommendations from the corrections sheet
    Corrections,
    /// Print the effective configuration as TOML
    ShowConfig,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ComplexityArg {
    Light,
    Medium,
    Heavy,
}

impl From<ComplexityArg> for ComplexityBand {
    fn from(arg: ComplexityArg) -> Self {
        match arg {
            ComplexityArg::Light => ComplexityBand::Light,
            ComplexityArg::Medium => ComplexityBand::Medium,
            ComplexityArg::Heavy => ComplexityBand::Heavy,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DurationArg {
    Quick,
    Medium,
    Long,
    VeryLong,
}

impl From<DurationArg> for DurationBand {
    fn from(arg: DurationArg) -> Self {
        match arg {
            DurationArg::Quick => DurationBand::Quick,
            DurationArg::Medium => DurationBand::Medium,
            DurationArg::Long => DurationBand::Long,
            DurationArg::VeryLong => DurationBand::VeryLong,
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("Failed to load configuration")?;

    init_logging(&settings.logging);

    match cli.command {
        Command::Profile => {
            let profile = pipeline::build_profile(&settings)?;
            info!("Baseline rating: {:.2}", profile.baseline_rating);
        }
        Command::Exclusions => {
            let summary = pipeline::build_exclusions(&settings)?;
            info!("Excluded {} games ({} currently owned)", summary.excluded, summary.owned);
        }
        Command::Recommend { limit } => {
            if limit.is_some() {
                settings.pipeline.limit = limit;
            }
            let report = pipeline::run_recommendations(&settings)?;
            info!(
                "Wrote {} recommendations ({} expansions, {} owned skipped)",
                report.returned, report.expansions, report.excluded
            );
        }
        Command::Wishlist { include_tracked } => {
            let count = pipeline::build_wishlist(&settings, include_tracked)?;
            info!("Wrote {} wishlist recommendations", count);
        }
        Command::Browse {
            players,
            complexity,
            duration,
        } => {
            let filter = BrowseFilter {
                players,
                complexity: complexity.map(Into::into),
                duration: duration.map(Into::into),
            };
            let games = pipeline::browse(&settings, &filter)?;

            let mut stdout = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &games).context("Failed to write games")?;
            writeln!(stdout)?;
        }
        Command::Corrections => {
            let summary = pipeline::apply_corrections(&settings)?;
            info!("Updated {} game ids ({} corrections on file)", summary.updated, summary.corrections);
        }
        Command::ShowConfig => {
            let rendered = toml::to_string_pretty(&settings).context("Failed to render configuration")?;
            print!("{}", rendered);
        }
    }

    Ok(())
}

/// Initialize logging; `RUST_LOG` overrides the configured level
fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr);

    match logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "json" => subscriber.json().init(),
        _ => subscriber.compact().init(),
    }
}
