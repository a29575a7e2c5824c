// src/services/detail.rs

//! Bill detail page extraction: identifier, title, sponsors, bill text
//! versions and committee documents.
//!
//! Missing fields come back empty rather than as errors; a bill with a blank
//! title is still a bill.

use scraper::{ElementRef, Html};
use url::Url;

use crate::error::Result;
use crate::models::Chamber;
use crate::utils::html::{
    child_elements, next_element_sibling, own_text, parent_element, parse_selector, row_cells,
    table_rows, text_content,
};
use crate::utils::resolve_url;

/// Rendering artifact from the legend "(Bolded name indicates primary sponsorship)".
const LEGEND_BOLD: &str = "Bolded";
const SPONSOR_MARKER: &str = "By:";
const SPONSOR_TRAILER: &str = "name indicates primary sponsorship)";

/// Sponsors listed on a bill page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sponsors {
    pub primary: Vec<String>,
    pub cosponsors: Vec<String>,
}

/// A named link found on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub note: String,
    pub url: String,
}

/// Bill identifier from the first cell of the first content table.
pub fn extract_identifier(document: &Html) -> Result<String> {
    let sel = parse_selector(
        "body > div#content > table:nth-of-type(1) > tbody > tr:nth-of-type(1) > td:nth-of-type(1) > font",
    )?;
    Ok(document
        .select(&sel)
        .next()
        .map(|font| text_content(font).trim().to_string())
        .unwrap_or_default())
}

/// Title: the emphasized text in the first row after the sponsor row.
pub fn extract_title(document: &Html) -> Result<String> {
    for table in content_tables(document)? {
        let mut after_sponsor_row = false;
        for row in table_rows(table) {
            if after_sponsor_row {
                let title = row_cells(row)
                    .into_iter()
                    .flat_map(|td| child_elements(td, "em"))
                    .flat_map(own_text)
                    .map(str::trim)
                    .find(|t| !t.is_empty());
                if let Some(title) = title {
                    return Ok(title.to_string());
                }
            } else if row_cells(row).into_iter().any(has_sponsor_marker) {
                after_sponsor_row = true;
            }
        }
    }
    Ok(String::new())
}

/// Primary sponsors are bolded in the sponsor cell; the remaining names
/// trail them as comma separated text.
pub fn extract_sponsors(document: &Html) -> Result<Sponsors> {
    let mut sponsors = Sponsors::default();

    for table in content_tables(document)? {
        for row in table_rows(table) {
            for td in row_cells(row).into_iter().filter(|td| has_sponsor_marker(*td)) {
                for b in child_elements(td, "b") {
                    for text in own_text(b) {
                        let name = text.trim();
                        if !name.is_empty() && name != SPONSOR_MARKER && name != LEGEND_BOLD {
                            sponsors.primary.push(name.to_string());
                        }
                    }
                }
                for text in own_text(td) {
                    sponsors.cosponsors.extend(split_cosponsors(text));
                }
            }
        }
    }

    Ok(sponsors)
}

/// Split free sponsor text into names, dropping the legend trailer and
/// parenthesis or line-break noise.
pub fn split_cosponsors(text: &str) -> Vec<String> {
    let text = text.replace(SPONSOR_TRAILER, "");
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '\r' | '\n' | '\t'))
        .collect();

    cleaned
        .split(',')
        .map(|name| name.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|name| !name.is_empty())
        .collect()
}

/// Links to the bill text.
///
/// Senate pages put a single link in the table mentioning "Bill Text".
/// Assembly pages follow a bold "Bill Text" heading cell with a cell holding
/// one link per printing.
pub fn extract_versions(document: &Html, chamber: Chamber, base: &Url) -> Result<Vec<Link>> {
    let links = match chamber {
        Chamber::Upper => content_tables(document)?
            .into_iter()
            .find(|table| text_content(*table).contains("Bill Text"))
            .and_then(|table| {
                table_rows(table)
                    .into_iter()
                    .filter_map(|row| row_cells(row).into_iter().nth(1))
                    .flat_map(|td| child_elements(td, "a"))
                    .find_map(|a| a.value().attr("href"))
                    .filter(|href| !href.is_empty())
            })
            .map(|href| Link {
                note: "Bill Text".to_string(),
                url: resolve_url(base, href),
            })
            .into_iter()
            .collect(),
        Chamber::Lower => {
            let b_sel = parse_selector("b")?;
            document
                .select(&b_sel)
                .find(|b| text_content(*b) == "Bill Text")
                .and_then(parent_element)
                .and_then(next_element_sibling)
                .map(|cell| {
                    child_elements(cell, "a")
                        .filter_map(|a| {
                            let href = a.value().attr("href")?;
                            Some(Link {
                                note: text_content(a).trim().to_string(),
                                url: resolve_url(base, href),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default()
        }
    };
    Ok(links)
}

/// Committee minutes (Assembly) or agendas (Senate) from the fourth table.
///
/// Each row pairs its date cell with the links in its third cell. A row with
/// links but no usable date is logged and its documents keep the bare note.
pub fn extract_documents(document: &Html, chamber: Chamber, base: &Url) -> Result<Vec<Link>> {
    let suffix = match chamber {
        Chamber::Upper => "Agenda",
        Chamber::Lower => "Minutes",
    };
    let table_sel = parse_selector("table:nth-of-type(4)")?;

    let mut links = Vec::new();
    for table in document.select(&table_sel) {
        for row in table_rows(table) {
            let cells = row_cells(row);
            let anchors: Vec<ElementRef> = cells
                .get(2)
                .map(|td| child_elements(*td, "a").collect())
                .unwrap_or_default();
            if anchors.is_empty() {
                continue;
            }

            let date_text = cells.get(1).map(|td| text_content(*td)).unwrap_or_default();
            let tokens: Vec<&str> = date_text.split_whitespace().take(3).collect();
            let note = if tokens.len() == 3 {
                format!("{} {suffix}", tokens.join(" "))
            } else {
                log::warn!(
                    "Document row without a date ({:?}); keeping {} link(s) undated",
                    date_text.trim(),
                    anchors.len()
                );
                suffix.to_string()
            };

            for a in anchors {
                if let Some(href) = a.value().attr("href") {
                    links.push(Link {
                        note: note.clone(),
                        url: resolve_url(base, href),
                    });
                }
            }
        }
    }

    Ok(links)
}

fn content_tables(document: &Html) -> Result<Vec<ElementRef<'_>>> {
    let sel = parse_selector("div#content > table")?;
    Ok(document.select(&sel).collect())
}

/// Whether a cell's first bold child carries the "By:" marker.
fn has_sponsor_marker(td: ElementRef<'_>) -> bool {
    child_elements(td, "b")
        .next()
        .is_some_and(|b| own_text(b).first().is_some_and(|t| t.contains(SPONSOR_MARKER)))
}
