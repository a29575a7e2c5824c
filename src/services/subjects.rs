// src/services/subjects.rs

//! Subject index parsing.
//!
//! The session index lists bills under subject headings. `Level0`
//! paragraphs are the headings; every bill link in the paragraphs that
//! follow, until the next heading, belongs to that subject.

use std::collections::{BTreeSet, HashMap};

use crate::error::Result;
use crate::models::Session;
use crate::utils::html::{parse_page, parse_selector, text_content};
use crate::utils::normalize_whitespace;

/// Bill identifier to subject headings for one session.
#[derive(Debug, Clone, Default)]
pub struct SubjectIndex {
    subjects: HashMap<String, Vec<String>>,
}

impl SubjectIndex {
    /// URL of the session's subject index page.
    pub fn url(reports_url: &str, session: &Session) -> String {
        format!(
            "{}TablesAndIndex/{}_{}-index.html",
            reports_url, session.year, session.identifier
        )
    }

    /// Build the index from the page source.
    pub fn parse(page: &str) -> Result<Self> {
        let document = parse_page(page);
        let p_sel = parse_selector("p")?;
        let a_sel = parse_selector("a")?;

        let mut index = Self::default();
        let mut current: Option<String> = None;

        for p in document.select(&p_sel) {
            if p.value().attr("class") == Some("Level0") {
                current = Some(normalize_whitespace(&text_content(p)));
                continue;
            }

            let Some(subject) = &current else {
                continue;
            };

            for a in p.select(&a_sel) {
                let bill_id: String = a
                    .text()
                    .next()
                    .unwrap_or("")
                    .chars()
                    .filter(|c| *c != '\r' && *c != '\n')
                    .collect();
                let bill_id = bill_id.trim();
                if bill_id.is_empty() {
                    continue;
                }
                index
                    .subjects
                    .entry(bill_id.to_string())
                    .or_default()
                    .push(subject.clone());
            }
        }

        Ok(index)
    }

    /// Distinct subjects recorded for a bill; empty when the bill is absent.
    pub fn subjects_for(&self, bill_id: &str) -> BTreeSet<String> {
        self.subjects
            .get(bill_id)
            .map(|subjects| subjects.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}
