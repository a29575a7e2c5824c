// src/services/listing.rs

//! Bill listing pages (`HistListBills.cfm`).

use crate::error::Result;
use crate::utils::html::{
    child_elements, parse_page, parse_selector, row_cells, table_rows, text_content,
};

/// Marker the site appends to bills with no history page yet.
const NO_CONTENT_MARKER: char = '*';

/// URL of the listing page for one document type.
pub fn listing_url(reports_url: &str, doc_type: u8) -> String {
    format!("{reports_url}HistListBills.cfm?DoctypeID={doc_type}")
}

/// Detail-page hrefs from a listing page, in page order.
///
/// Each listing table's first cell of its first row holds the bill link.
pub fn parse_listing(page: &str) -> Result<Vec<String>> {
    let document = parse_page(page);
    let table_sel = parse_selector("body > div#ScrollMe > table")?;

    let mut links = Vec::new();
    for table in document.select(&table_sel) {
        let Some(first_row) = table_rows(table).into_iter().next() else {
            continue;
        };
        let Some(first_cell) = row_cells(first_row).into_iter().next() else {
            continue;
        };

        for a in child_elements(first_cell, "a") {
            if text_content(a).contains(NO_CONTENT_MARKER) {
                continue;
            }
            if let Some(href) = a.value().attr("href") {
                links.push(href.to_string());
            }
        }
    }

    Ok(links)
}
