//! Roll-call vote data structures.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::models::Chamber;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteResult {
    Pass,
    Fail,
}

impl VoteResult {
    /// A motion passes when yeas outnumber nays.
    pub fn from_counts(counts: &VoteCounts) -> Self {
        if counts.yes > counts.no {
            VoteResult::Pass
        } else {
            VoteResult::Fail
        }
    }
}

/// Tallies for one vote. `other` folds excused, not voting and absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCounts {
    pub yes: u32,
    pub no: u32,
    pub other: u32,
    pub excused: u32,
    pub not_voting: u32,
    pub absent: u32,
}

impl VoteCounts {
    pub fn new(yes: u32, no: u32, excused: u32, not_voting: u32, absent: u32) -> Self {
        Self {
            yes,
            no,
            other: excused.saturating_add(not_voting).saturating_add(absent),
            excused,
            not_voting,
            absent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteOption {
    Yes,
    No,
    Other,
}

impl VoteOption {
    /// Map the site's ballot labels. Anything but Yea/Nay counts as other.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Yea" => VoteOption::Yes,
            "Nay" => VoteOption::No,
            _ => VoteOption::Other,
        }
    }
}

/// A single member's ballot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ballot {
    pub voter_name: String,
    pub option: VoteOption,
}

/// A passage vote referenced from a bill page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteEvent {
    pub legislative_session: String,
    pub bill_identifier: String,
    pub chamber: Chamber,
    pub start_date: DateTime<FixedOffset>,
    pub motion_text: String,
    pub result: VoteResult,
    pub classification: String,
    pub counts: VoteCounts,
    #[serde(default)]
    pub ballots: Vec<Ballot>,
    #[serde(default)]
    pub sources: Vec<String>,
    /// Vote page URL, unique per roll call.
    pub dedupe_key: String,
}

impl VoteEvent {
    pub fn passage(
        legislative_session: impl Into<String>,
        bill_identifier: impl Into<String>,
        chamber: Chamber,
        start_date: DateTime<FixedOffset>,
        motion_text: impl Into<String>,
        counts: VoteCounts,
        dedupe_key: impl Into<String>,
    ) -> Self {
        Self {
            legislative_session: legislative_session.into(),
            bill_identifier: bill_identifier.into(),
            chamber,
            start_date,
            motion_text: motion_text.into(),
            result: VoteResult::from_counts(&counts),
            classification: "passage".to_string(),
            counts,
            ballots: Vec::new(),
            sources: Vec::new(),
            dedupe_key: dedupe_key.into(),
        }
    }

    pub fn add_ballot(&mut self, voter_name: impl Into<String>, option: VoteOption) {
        self.ballots.push(Ballot {
            voter_name: voter_name.into(),
            option,
        });
    }

    pub fn add_source(&mut self, url: impl Into<String>) {
        self.sources.push(url.into());
    }
}
