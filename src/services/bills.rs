// src/services/bills.rs

//! Assembles a [`Bill`] from its detail page.

use url::Url;

use crate::error::Result;
use crate::models::{Bill, BillType, Chamber, SponsorshipType};
use crate::services::SubjectIndex;
use crate::services::actions::extract_actions;
use crate::services::detail::{
    extract_documents, extract_identifier, extract_sponsors, extract_title, extract_versions,
};
use crate::services::votes::{PassageVote, parse_vote_table};
use crate::utils::html::parse_page;

/// Everything the detail page needs to be turned into records.
pub struct BillContext<'a> {
    pub session: &'a str,
    pub chamber: Chamber,
    pub bill_type: BillType,
    pub site_base: &'a Url,
    pub subjects: &'a SubjectIndex,
}

/// A parsed detail page: the bill (without its source yet) and the outcome
/// of reading its passage vote table.
pub struct BillPage {
    pub bill: Bill,
    pub votes: Result<Vec<PassageVote>>,
}

/// Parse a bill detail page.
pub fn parse_bill_page(page: &str, ctx: &BillContext<'_>) -> Result<BillPage> {
    let document = parse_page(page);

    let identifier = extract_identifier(&document)?;
    let title = extract_title(&document)?;
    if identifier.is_empty() || title.is_empty() {
        log::warn!(
            "Incomplete bill page (identifier {:?}, title {:?})",
            identifier,
            title
        );
    }

    let mut bill = Bill::new(
        identifier,
        ctx.session,
        ctx.chamber,
        title,
        ctx.bill_type,
    );
    bill.subjects = ctx.subjects.subjects_for(&bill.identifier);

    for link in extract_versions(&document, ctx.chamber, ctx.site_base)? {
        bill.add_version_link(link.note, link.url);
    }

    let sponsors = extract_sponsors(&document)?;
    for name in sponsors.primary {
        bill.add_sponsorship(name, SponsorshipType::Primary);
    }
    for name in sponsors.cosponsors {
        bill.add_sponsorship(name, SponsorshipType::Cosponsor);
    }

    for link in extract_documents(&document, ctx.chamber, ctx.site_base)? {
        bill.add_document_link(link.note, link.url);
    }

    bill.actions = extract_actions(&document, ctx.chamber.into())?;

    let votes = parse_vote_table(&document, &bill.identifier);

    Ok(BillPage { bill, votes })
}
