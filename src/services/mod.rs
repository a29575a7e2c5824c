//! Service layer for the scraper.
//!
//! This module contains the page extraction logic for:
//! - Session subject indexes (`SubjectIndex`)
//! - Bill listings (`listing`)
//! - Bill detail pages (`detail`, `bills`)
//! - Action history and classification (`actions`)
//! - Passage votes and roll calls (`votes`)

pub mod actions;
pub mod bills;
pub mod detail;
pub mod listing;
mod subjects;
pub mod votes;

pub use bills::{BillContext, BillPage, parse_bill_page};
pub use subjects::SubjectIndex;
