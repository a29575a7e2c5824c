// src/utils/html.rs

//! Markup traversal helpers.
//!
//! The legislature's pages are table soup addressed by position. The parser
//! inserts `<tbody>` wrappers, so row and cell lookups walk the tree instead
//! of relying on child combinators.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};

/// Parse a CSS selector, mapping failures into [`AppError::Selector`].
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Parse a fetched page, turning non-breaking spaces into plain spaces first.
pub fn parse_page(text: &str) -> Html {
    Html::parse_document(&text.replace('\u{a0}', " "))
}

/// Direct element children of `elem` with the given tag name.
pub fn child_elements<'a>(
    elem: ElementRef<'a>,
    name: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    elem.children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| child.value().name() == name)
}

/// Rows of a table, looking through `thead`/`tbody`/`tfoot` sections.
/// Rows of nested tables are not included.
pub fn table_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(child_elements(child, "tr")),
            _ => {}
        }
    }
    rows
}

/// `td` cells of a row.
pub fn row_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    child_elements(row, "td").collect()
}

/// All text under `elem`, concatenated.
pub fn text_content(elem: ElementRef<'_>) -> String {
    elem.text().collect()
}

/// Text nodes that are direct children of `elem`.
pub fn own_text(elem: ElementRef<'_>) -> Vec<&str> {
    elem.children()
        .filter_map(|node| node.value().as_text())
        .map(|text| &**text)
        .collect()
}

/// The text before the first child element, if any.
pub fn leading_text(elem: ElementRef<'_>) -> Option<&str> {
    elem.first_child()
        .and_then(|node| node.value().as_text())
        .map(|text| &**text)
}

/// The next sibling that is an element.
pub fn next_element_sibling(elem: ElementRef<'_>) -> Option<ElementRef<'_>> {
    elem.next_siblings().find_map(ElementRef::wrap)
}

/// The parent, if it is an element.
pub fn parent_element(elem: ElementRef<'_>) -> Option<ElementRef<'_>> {
    elem.parent().and_then(ElementRef::wrap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        doc.select(&parse_selector(css).unwrap()).next().unwrap()
    }

    #[test]
    fn test_parse_selector_valid() {
        assert!(parse_selector("div#content > table").is_ok());
        assert!(parse_selector("table:nth-of-type(4)").is_ok());
    }

    #[test]
    fn test_parse_selector_invalid() {
        assert!(parse_selector("[[invalid").is_err());
    }

    #[test]
    fn test_table_rows_through_implicit_tbody() {
        let doc = parse_page(concat!(
            "<table><tr><td>a</td></tr>",
            "<tr><td>b<table><tr><td>x</td></tr></table></td></tr></table>",
        ));
        let table = first(&doc, "table");
        let rows = table_rows(table);
        assert_eq!(rows.len(), 2);
        assert_eq!(row_cells(rows[0]).len(), 1);
    }

    #[test]
    fn test_own_and_leading_text() {
        let doc = parse_page("<div><p>By: <b>Smith</b>, Jones (<b>Bolded</b> tail)</p></div>");
        let p = first(&doc, "p");
        assert_eq!(own_text(p), vec!["By: ", ", Jones (", " tail)"]);
        assert_eq!(leading_text(p), Some("By: "));
        assert_eq!(text_content(p), "By: Smith, Jones (Bolded tail)");

        let b = first(&doc, "b");
        assert_eq!(parent_element(b).unwrap().value().name(), "p");
        assert_eq!(next_element_sibling(b).unwrap().inner_html(), "Bolded");
    }

    #[test]
    fn test_parse_page_replaces_nbsp() {
        let doc = parse_page("<p>Feb\u{a0}4,\u{a0}2019</p>");
        assert_eq!(text_content(first(&doc, "p")), "Feb 4, 2019");
    }
}
