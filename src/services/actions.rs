// src/services/actions.rs

//! Bill history parsing and action classification.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::Html;

use crate::error::Result;
use crate::models::{Action, ActionType, Actor, RelatedEntity};
use crate::utils::html::{
    child_elements, next_element_sibling, parent_element, parse_selector, row_cells, text_content,
};
use crate::utils::normalize_whitespace;
use crate::utils::time::{pacific_midnight, parse_short_date};

/// Ordered classification rules. Patterns match at the start of the
/// action text and the first match wins.
const RULES: &[(&str, &[ActionType])] = &[
    ("Approved by the Governor", &[ActionType::ExecutiveSignature]),
    ("Bill read. Veto not sustained", &[ActionType::VetoOverridePassage]),
    ("Bill read. Veto sustained", &[ActionType::VetoOverrideFailure]),
    ("Enrolled and delivered to Governor", &[ActionType::ExecutiveReceipt]),
    ("From committee: .+? adopted", &[ActionType::CommitteePassage]),
    ("From committee: .+? pass", &[ActionType::CommitteePassage]),
    (
        "Prefiled. Referred",
        &[ActionType::Introduction, ActionType::ReferralCommittee],
    ),
    (
        "Read first time. Referred",
        &[ActionType::Reading1, ActionType::ReferralCommittee],
    ),
    ("Read first time.", &[ActionType::Reading1]),
    ("Read second time.", &[ActionType::Reading2]),
    (
        "Read third time. Lost",
        &[ActionType::Failure, ActionType::Reading3],
    ),
    (
        "Read third time. Passed",
        &[ActionType::Passage, ActionType::Reading3],
    ),
    ("Read third time.", &[ActionType::Reading3]),
    ("Rereferred", &[ActionType::ReferralCommittee]),
    ("Resolution read and adopted", &[ActionType::Passage]),
    ("Vetoed by the Governor", &[ActionType::ExecutiveVeto]),
];

static CLASSIFIERS: LazyLock<Vec<(Regex, &'static [ActionType])>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|(pattern, tags)| {
            let regex = Regex::new(&format!("^(?:{pattern})")).expect("valid action pattern");
            (regex, *tags)
        })
        .collect()
});

static COMMITTEE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Committee on ([a-zA-Z, ]*)\.").expect("valid committee pattern"));

/// Tags of the first rule matching `text`, or none.
pub fn classify(text: &str) -> Vec<ActionType> {
    CLASSIFIERS
        .iter()
        .find(|(regex, _)| regex.is_match(text))
        .map(|(_, tags)| tags.to_vec())
        .unwrap_or_default()
}

/// Committee names mentioned as `Committee on <Name>.`.
pub fn committees(text: &str) -> Vec<String> {
    if !text.contains("Committee on") {
        return Vec::new();
    }
    COMMITTEE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// The actor after reading `text`, given the actor before it.
pub fn next_actor(current: Actor, text: &str) -> Actor {
    if text.starts_with("In Assembly") {
        Actor::Lower
    } else if text.starts_with("In Senate") {
        Actor::Upper
    } else if text.contains("Governor") {
        Actor::Executive
    } else {
        current
    }
}

/// Extract the ordered action history from a bill page.
///
/// History is laid out as a dated row (`td > p` first paragraph) followed by
/// a row whose `td > ul > li` items are that day's actions.
pub fn extract_actions(document: &Html, initial: Actor) -> Result<Vec<Action>> {
    let cell_sel = parse_selector("body > div#content > table > tbody > tr > td")?;

    let mut dated_items: Vec<(NaiveDate, Vec<String>)> = Vec::new();
    for td in document.select(&cell_sel) {
        let Some(p) = child_elements(td, "p").next() else {
            continue;
        };
        let date_text = text_content(p);
        let Some(date) = parse_short_date(&date_text) else {
            log::debug!("Skipping history block without a date: {:?}", date_text.trim());
            continue;
        };

        let Some(next_row) = parent_element(td).and_then(next_element_sibling) else {
            continue;
        };
        if next_row.value().name() != "tr" {
            continue;
        }

        let items = row_cells(next_row)
            .into_iter()
            .flat_map(|cell| child_elements(cell, "ul"))
            .flat_map(|ul| child_elements(ul, "li"))
            .map(text_content)
            .collect();
        dated_items.push((date, items));
    }

    let mut actor = initial;
    let mut actions = Vec::new();
    for (date, items) in dated_items {
        for raw in items {
            let description = normalize_whitespace(&raw);
            if description.is_empty() {
                continue;
            }

            actor = next_actor(actor, &description);
            let classification = classify(&description);
            let related_entities = committees(&description)
                .into_iter()
                .map(RelatedEntity::committee)
                .collect();

            actions.push(Action {
                description,
                date: pacific_midnight(date),
                chamber: actor,
                classification,
                related_entities,
            });
        }
    }

    Ok(actions)
}
