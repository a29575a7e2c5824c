//! Bill and action data structures.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::models::{Actor, Chamber};

/// Document class of a bill, tied to the listing page's `DoctypeID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillType {
    Bill,
    Resolution,
    #[serde(rename = "concurrent resolution")]
    ConcurrentResolution,
    #[serde(rename = "joint resolution")]
    JointResolution,
    Petition,
}

impl BillType {
    /// Listing codes for a chamber, in the order they are scraped.
    /// Petitions only originate in the Assembly.
    pub fn doc_types(chamber: Chamber) -> &'static [(u8, BillType)] {
        match chamber {
            Chamber::Upper => &[
                (2, BillType::Bill),
                (4, BillType::Resolution),
                (7, BillType::ConcurrentResolution),
                (8, BillType::JointResolution),
            ],
            Chamber::Lower => &[
                (1, BillType::Bill),
                (3, BillType::Resolution),
                (5, BillType::ConcurrentResolution),
                (6, BillType::JointResolution),
                (9, BillType::Petition),
            ],
        }
    }
}

/// A link to one printing of the bill text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionLink {
    pub note: String,
    pub url: String,
    pub media_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SponsorshipType {
    Primary,
    Cosponsor,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sponsorship {
    pub name: String,
    pub classification: SponsorshipType,
    pub entity_type: String,
    pub primary: bool,
}

/// A supporting document such as committee minutes or an agenda.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentLink {
    pub note: String,
    pub url: String,
}

/// Normalized action category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionType {
    Introduction,
    #[serde(rename = "reading-1")]
    Reading1,
    #[serde(rename = "reading-2")]
    Reading2,
    #[serde(rename = "reading-3")]
    Reading3,
    ReferralCommittee,
    CommitteePassage,
    Passage,
    Failure,
    ExecutiveReceipt,
    ExecutiveSignature,
    ExecutiveVeto,
    VetoOverridePassage,
    VetoOverrideFailure,
}

/// An entity mentioned by an action, e.g. the committee a bill was referred to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelatedEntity {
    pub entity_type: String,
    pub name: String,
}

impl RelatedEntity {
    pub fn committee(name: impl Into<String>) -> Self {
        Self {
            entity_type: "committee".to_string(),
            name: name.into(),
        }
    }
}

/// One line of a bill's history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Action {
    pub description: String,
    pub date: DateTime<FixedOffset>,
    pub chamber: Actor,
    #[serde(default)]
    pub classification: Vec<ActionType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_entities: Vec<RelatedEntity>,
}

/// A bill scraped from its detail page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bill {
    pub identifier: String,
    pub legislative_session: String,
    pub chamber: Chamber,
    pub title: String,
    pub classification: BillType,
    #[serde(default)]
    pub versions: Vec<VersionLink>,
    #[serde(default)]
    pub sponsorships: Vec<Sponsorship>,
    #[serde(default)]
    pub documents: Vec<DocumentLink>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub subjects: BTreeSet<String>,
    #[serde(default)]
    pub sources: Vec<String>,
}

impl Bill {
    pub fn new(
        identifier: impl Into<String>,
        legislative_session: impl Into<String>,
        chamber: Chamber,
        title: impl Into<String>,
        classification: BillType,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            legislative_session: legislative_session.into(),
            chamber,
            title: title.into(),
            classification,
            versions: Vec::new(),
            sponsorships: Vec::new(),
            documents: Vec::new(),
            actions: Vec::new(),
            subjects: BTreeSet::new(),
            sources: Vec::new(),
        }
    }

    pub fn add_version_link(&mut self, note: impl Into<String>, url: impl Into<String>) {
        self.versions.push(VersionLink {
            note: note.into(),
            url: url.into(),
            media_type: "application/pdf".to_string(),
        });
    }

    pub fn add_sponsorship(&mut self, name: impl Into<String>, classification: SponsorshipType) {
        self.sponsorships.push(Sponsorship {
            name: name.into(),
            classification,
            entity_type: "person".to_string(),
            primary: classification == SponsorshipType::Primary,
        });
    }

    pub fn add_document_link(&mut self, note: impl Into<String>, url: impl Into<String>) {
        self.documents.push(DocumentLink {
            note: note.into(),
            url: url.into(),
        });
    }

    pub fn add_source(&mut self, url: impl Into<String>) {
        self.sources.push(url.into());
    }
}
