//! Pipeline entry points for scraper operations.
//!
//! - `BillScraper`: Lazily yields bills and their passage votes
//! - `run_scrape`: Drives a scraper and persists its records

pub mod run;
pub mod scrape;

pub use run::run_scrape;
pub use scrape::BillScraper;
