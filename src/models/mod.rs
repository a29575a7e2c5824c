// src/models/mod.rs

//! Domain models for the scraper.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod bill;
mod config;
mod session;
mod vote;

// Re-export all public types
pub use bill::{
    Action, ActionType, Bill, BillType, DocumentLink, RelatedEntity, Sponsorship,
    SponsorshipType, VersionLink,
};
pub use config::{Config, CrawlerConfig, JurisdictionConfig, OutputConfig};
pub use session::{Actor, Chamber, Session, SessionInfo};
pub use vote::{Ballot, VoteCounts, VoteEvent, VoteOption, VoteResult};

use serde::{Deserialize, Serialize};

/// One item produced by the scraper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Record {
    Bill(Bill),
    VoteEvent(VoteEvent),
}

/// Counters collected over one scrape run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeStats {
    pub bills: usize,
    pub votes: usize,
    pub duplicate_votes: usize,
    pub vote_steps_aborted: usize,
    pub votes_without_ballots: usize,
    pub page_failures: usize,
}
