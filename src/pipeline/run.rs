// src/pipeline/run.rs

//! Scrape-and-store pipeline.

use chrono::Utc;

use crate::error::Result;
use crate::models::{Chamber, Config, Record, ScrapeStats};
use crate::pipeline::BillScraper;
use crate::storage::RecordStorage;
use crate::utils::http::Fetch;

/// Scrape one session and persist every record as it is produced.
///
/// Page failures are logged and counted but do not stop the run. Storage
/// failures do.
pub async fn run_scrape<F: Fetch>(
    config: &Config,
    storage: &dyn RecordStorage,
    fetcher: F,
    chamber: Option<Chamber>,
    session: Option<&str>,
) -> Result<ScrapeStats> {
    let start_time = Utc::now();
    log::info!("Scraping {} legislature", config.jurisdiction.name);

    let mut scraper = BillScraper::new(fetcher, &config.jurisdiction, chamber, session)?;

    loop {
        match scraper.next_record().await {
            Ok(Some(record)) => {
                let key = storage.write_record(&record).await?;
                if let Record::Bill(bill) = &record {
                    log::info!("Saved {} ({})", bill.identifier, key);
                }
            }
            Ok(None) => break,
            Err(e) => log::error!("{e}"),
        }
    }

    let stats = scraper.stats().clone();
    let elapsed = Utc::now() - start_time;
    log::info!(
        "Scrape finished in {}s: {} bills, {} votes",
        elapsed.num_seconds(),
        stats.bills,
        stats.votes
    );
    if stats.duplicate_votes + stats.vote_steps_aborted + stats.votes_without_ballots > 0 {
        log::info!(
            "Skipped {} duplicate votes, {} unreadable vote tables, {} votes without ballots",
            stats.duplicate_votes,
            stats.vote_steps_aborted,
            stats.votes_without_ballots
        );
    }
    if stats.page_failures > 0 {
        log::warn!("{} pages could not be scraped", stats.page_failures);
    }

    Ok(stats)
}
