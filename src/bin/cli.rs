//! Nevada Legislature scraper CLI
//!
//! Local execution entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nvleg::{
    error::Result,
    models::{Chamber, Config},
    pipeline,
    storage::LocalStorage,
    utils::http::HttpFetcher,
};

/// nvleg - Nevada Legislature bill and vote scraper
#[derive(Parser, Debug)]
#[command(
    name = "nvleg",
    version,
    about = "Scrapes bills, actions and passage votes from the Nevada Legislature"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape bills and votes for a session
    Scrape {
        /// Only scrape one chamber (upper/senate or lower/assembly)
        #[arg(long)]
        chamber: Option<Chamber>,

        /// Session identifier (default: latest configured session)
        #[arg(long)]
        session: Option<String>,

        /// Output directory (default: output.dir from config)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List configured sessions
    Sessions,

    /// Validate configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Scrape {
            chamber,
            session,
            output,
        } => {
            config.validate()?;

            let output_dir = output.unwrap_or_else(|| PathBuf::from(&config.output.dir));
            log::info!("Writing records to {}", output_dir.display());

            let storage = LocalStorage::new(&output_dir);
            let fetcher = HttpFetcher::new(&config.crawler)?;
            let stats =
                pipeline::run_scrape(&config, &storage, fetcher, chamber, session.as_deref())
                    .await?;

            log::info!(
                "Done: {} bills, {} votes ({} duplicate votes skipped, {} vote steps aborted, {} votes without ballots, {} page failures)",
                stats.bills,
                stats.votes,
                stats.duplicate_votes,
                stats.vote_steps_aborted,
                stats.votes_without_ballots,
                stats.page_failures
            );
        }

        Command::Sessions => {
            for info in &config.jurisdiction.sessions {
                match info.resolve() {
                    Ok(session) => println!(
                        "{:<16} {:<20} {}{}",
                        session.identifier,
                        session.slug,
                        session.year,
                        if session.special { " (special)" } else { "" }
                    ),
                    Err(e) => println!(
                        "{:<16} {:<20} unsupported: {e}",
                        info.identifier, info.slug
                    ),
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} sessions, latest {})",
                config.jurisdiction.sessions.len(),
                config
                    .jurisdiction
                    .latest_session()
                    .map(|s| s.identifier.as_str())
                    .unwrap_or("-")
            );
        }
    }

    Ok(())
}
