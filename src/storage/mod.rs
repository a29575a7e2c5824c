//! Storage abstractions for scraped records.
//!
//! Every record is written to its own JSON file, named so that scraping the
//! same session twice overwrites rather than duplicates.
//!
//! ## Directory Structure
//!
//! ```text
//! {output.dir}/
//! ├── bill_80_SB1.json
//! ├── bill_80_AB12.json
//! └── vote_event_3f2a9c0d1b4e5f67.json
//! ```

pub mod local;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::Record;

// Re-export for convenience
pub use local::LocalStorage;

/// Trait for record storage backends.
#[async_trait]
pub trait RecordStorage: Send + Sync {
    /// Persist one record, replacing any earlier copy. Returns its key.
    async fn write_record(&self, record: &Record) -> Result<String>;
}

/// Stable storage key for a record.
///
/// Bills are keyed by session and identifier. A bill whose identifier could
/// not be read is keyed by a digest of its detail page URL instead. Vote
/// events are keyed by a digest of their dedupe key, which is the roll-call
/// URL.
pub fn record_key(record: &Record) -> String {
    match record {
        Record::Bill(bill) if bill.identifier.trim().is_empty() => {
            let source = bill.sources.first().map(String::as_str).unwrap_or(&bill.title);
            format!(
                "bill_{}_unidentified_{}.json",
                sanitize(&bill.legislative_session),
                short_digest(source)
            )
        }
        Record::Bill(bill) => format!(
            "bill_{}_{}.json",
            sanitize(&bill.legislative_session),
            sanitize(&bill.identifier)
        ),
        Record::VoteEvent(vote) => {
            format!("vote_event_{}.json", short_digest(&vote.dedupe_key))
        }
    }
}

/// First 16 hex digits of the SHA-256 of `value`.
fn short_digest(value: &str) -> String {
    let mut digest = hex::encode(Sha256::digest(value.as_bytes()));
    digest.truncate(16);
    digest
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bill, BillType, Chamber, VoteCounts, VoteEvent};
    use chrono::DateTime;

    #[test]
    fn test_bill_key() {
        let bill = Bill::new("SB 1", "80", Chamber::Upper, "t", BillType::Bill);
        assert_eq!(record_key(&Record::Bill(bill)), "bill_80_SB_1.json");
    }

    #[test]
    fn test_unidentified_bills_are_keyed_by_source() {
        let mut first = Bill::new("", "80", Chamber::Upper, "", BillType::Bill);
        first.add_source("https://nv.test/Reports/History.cfm?ID=1");
        let mut second = Bill::new("  ", "80", Chamber::Upper, "", BillType::Bill);
        second.add_source("https://nv.test/Reports/History.cfm?ID=2");

        let a = record_key(&Record::Bill(first.clone()));
        let b = record_key(&Record::Bill(second));
        assert_ne!(a, b);
        assert!(a.starts_with("bill_80_unidentified_"));
        assert_eq!(a, record_key(&Record::Bill(first)));
    }

    #[test]
    fn test_vote_key_depends_only_on_dedupe_key() {
        let date = DateTime::parse_from_rfc3339("2019-04-16T00:00:00-07:00").unwrap();
        let counts = VoteCounts::new(1, 0, 0, 0, 0);
        let a = VoteEvent::passage("80", "SB1", Chamber::Upper, date, "m", counts, "u1");
        let mut b = VoteEvent::passage("80", "SB2", Chamber::Lower, date, "x", counts, "u1");
        b.add_source("elsewhere");

        let key = record_key(&Record::VoteEvent(a));
        assert_eq!(key, record_key(&Record::VoteEvent(b)));
        assert!(key.starts_with("vote_event_"));
        assert_eq!(key.len(), "vote_event_".len() + 16 + ".json".len());
    }
}
