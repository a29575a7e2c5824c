// src/services/votes.rs

//! Final passage vote tables and roll-call pages.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::{Ballot, Chamber, VoteCounts, VoteOption};
use crate::utils::html::{
    child_elements, leading_text, parse_page, parse_selector, row_cells, table_rows, text_content,
};
use crate::utils::time::parse_short_date;

static DATE_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^... .*?, ....").expect("valid date pattern"));
static COUNT_CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<category>.*?) (?P<votes>[0-9]+),?").expect("valid count pattern")
});

/// One passage vote row from a bill page, before the roll call is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassageVote {
    pub motion: String,
    pub href: String,
    pub chamber: Chamber,
    pub date: NaiveDate,
    pub counts: VoteCounts,
}

/// Read the passage votes table (sixth table of the page's content div).
///
/// The first row is a header. Rows without a "Passage" link are procedural
/// motions and are skipped. A missing table, a row with several passage
/// links, or a row missing its date or tallies fails the whole table.
pub fn parse_vote_table(document: &Html, bill_id: &str) -> Result<Vec<PassageVote>> {
    let row_sel = parse_selector("body > div > table:nth-of-type(6) tr")?;
    let rows: Vec<_> = document.select(&row_sel).collect();
    if rows.is_empty() {
        return Err(AppError::vote_table(
            bill_id,
            "Didn't find the Final Passage Votes' table",
        ));
    }

    let mut votes = Vec::new();
    for row in rows.into_iter().skip(1) {
        let cells = row_cells(row);
        let links: Vec<_> = cells
            .iter()
            .flat_map(|td| child_elements(*td, "a"))
            .filter(|a| leading_text(*a).is_some_and(|t| t.contains("Passage")))
            .collect();

        let link = match links.as_slice() {
            [] => {
                log::warn!(
                    "Non-passage vote found for {bill_id}; probably a motion for the calendar. It will be skipped."
                );
                continue;
            }
            [link] => *link,
            _ => {
                return Err(AppError::vote_table(
                    bill_id,
                    format!("Too many votes found in one row ({})", links.len()),
                ));
            }
        };

        let motion = leading_text(link).unwrap_or("").trim().to_string();
        let href = link.value().attr("href").unwrap_or("").to_string();
        let chamber = if motion.contains("Assembly") {
            Chamber::Lower
        } else {
            Chamber::Upper
        };

        let mut date = None;
        let mut tallies: HashMap<String, u32> = HashMap::new();
        for td in &cells {
            let Some(text) = leading_text(*td) else {
                continue;
            };
            let text = text.trim();
            if DATE_CELL.is_match(text) {
                date = parse_short_date(text);
            } else if let Some(caps) = COUNT_CELL.captures(text) {
                if let Ok(n) = caps["votes"].parse::<u32>() {
                    tallies.insert(caps["category"].to_string(), n);
                }
            }
        }

        let date = date
            .ok_or_else(|| AppError::vote_table(bill_id, format!("No date for vote '{motion}'")))?;
        let tally = |category: &str| {
            tallies.get(category).copied().ok_or_else(|| {
                AppError::vote_table(bill_id, format!("No '{category}' count for vote '{motion}'"))
            })
        };
        let counts = VoteCounts::new(
            tally("Yea")?,
            tally("Nay")?,
            tally("Excused")?,
            tally("Not Voting")?,
            tally("Absent")?,
        );

        votes.push(PassageVote {
            motion,
            href,
            chamber,
            date,
            counts,
        });
    }

    Ok(votes)
}

/// Member ballots from a roll-call page: name in the second cell, vote in
/// the third, rows of the second table.
pub fn parse_ballots(page: &str) -> Result<Vec<Ballot>> {
    let document = parse_page(page);
    let table_sel = parse_selector("table:nth-of-type(2)")?;

    let mut ballots = Vec::new();
    for table in document.select(&table_sel) {
        for row in table_rows(table) {
            let cells = row_cells(row);
            if cells.len() < 3 {
                continue;
            }
            let name = text_content(cells[1]).trim().to_string();
            let label = text_content(cells[2]);
            ballots.push(Ballot {
                voter_name: name,
                option: VoteOption::from_label(label.trim()),
            });
        }
    }

    Ok(ballots)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with_vote_rows(rows: &str) -> String {
        format!(
            r#"<html><body><div>
              <table><tr><td>1</td></tr></table>
              <table><tr><td>2</td></tr></table>
              <table><tr><td>3</td></tr></table>
              <table><tr><td>4</td></tr></table>
              <table><tr><td>5</td></tr></table>
              <table>
                <tr><th>Final Passage Votes</th></tr>
                {rows}
              </table>
            </div></body></html>"#
        )
    }

    const SENATE_ROW: &str = r#"<tr>
        <td><a href="Votes.cfm?VoteID=11">Senate Final Passage</a></td>
        <td>Apr 16, 2019</td>
        <td>Yea 15,</td><td>Nay 5,</td><td>Excused 1,</td><td>Not Voting 0,</td><td>Absent 0</td>
    </tr>"#;

    #[test]
    fn test_parse_passage_row() {
        let document = Html::parse_document(&page_with_vote_rows(SENATE_ROW));
        let votes = parse_vote_table(&document, "SB1").unwrap();

        assert_eq!(votes.len(), 1);
        let vote = &votes[0];
        assert_eq!(vote.motion, "Senate Final Passage");
        assert_eq!(vote.href, "Votes.cfm?VoteID=11");
        assert_eq!(vote.chamber, Chamber::Upper);
        assert_eq!(vote.date, NaiveDate::from_ymd_opt(2019, 4, 16).unwrap());
        assert_eq!(vote.counts, VoteCounts::new(15, 5, 1, 0, 0));
        assert_eq!(vote.counts.other, 1);
    }

    #[test]
    fn test_assembly_motion_sets_lower_chamber() {
        let row = SENATE_ROW.replace("Senate Final Passage", "Assembly Final Passage");
        let document = Html::parse_document(&page_with_vote_rows(&row));
        let votes = parse_vote_table(&document, "SB1").unwrap();
        assert_eq!(votes[0].chamber, Chamber::Lower);
    }

    #[test]
    fn test_non_passage_row_is_skipped() {
        let procedural = r#"<tr><td><a href="Votes.cfm?VoteID=9">Motion to place on calendar</a></td><td>Apr 1, 2019</td></tr>"#;
        let document = Html::parse_document(&page_with_vote_rows(procedural));
        let votes = parse_vote_table(&document, "SB1").unwrap();
        assert!(votes.is_empty());
    }

    #[test]
    fn test_two_passage_links_in_a_row_fail() {
        let row = r#"<tr>
            <td><a href="a">Senate Final Passage</a></td>
            <td><a href="b">Assembly Final Passage</a></td>
        </tr>"#;
        let document = Html::parse_document(&page_with_vote_rows(row));
        let err = parse_vote_table(&document, "SB1").unwrap_err();
        assert!(matches!(err, AppError::VoteTable { .. }));
    }

    #[test]
    fn test_missing_table_fails() {
        let document = Html::parse_document("<html><body><div></div></body></html>");
        assert!(parse_vote_table(&document, "SB1").is_err());
    }

    #[test]
    fn test_header_only_table_has_no_votes() {
        let document = Html::parse_document(&page_with_vote_rows(""));
        assert!(parse_vote_table(&document, "SB1").unwrap().is_empty());
    }

    #[test]
    fn test_missing_tally_fails() {
        let row = SENATE_ROW.replace("<td>Absent 0</td>", "");
        let document = Html::parse_document(&page_with_vote_rows(&row));
        assert!(parse_vote_table(&document, "SB1").is_err());
    }

    #[test]
    fn test_huge_tallies_do_not_overflow() {
        let row = SENATE_ROW
            .replace("Excused 1,", "Excused 4000000000,")
            .replace("Not Voting 0,", "Not Voting 4000000000,");
        let document = Html::parse_document(&page_with_vote_rows(&row));
        let votes = parse_vote_table(&document, "SB1").unwrap();
        assert_eq!(votes[0].counts.other, u32::MAX);
        assert_eq!(votes[0].counts.not_voting, 4_000_000_000);
    }

    #[test]
    fn test_parse_ballots() {
        let page = r#"<html><body>
            <table><tr><td>Roll call</td></tr></table>
            <table>
              <tr><th>#</th><th>Member</th><th>Vote</th></tr>
              <tr><td>1</td><td> Smith </td><td>Yea</td></tr>
              <tr><td>2</td><td>Jones</td><td>Nay</td></tr>
              <tr><td>3</td><td>Brown</td><td>Excused</td></tr>
            </table>
        </body></html>"#;

        let ballots = parse_ballots(page).unwrap();
        assert_eq!(
            ballots,
            vec![
                Ballot {
                    voter_name: "Smith".into(),
                    option: VoteOption::Yes,
                },
                Ballot {
                    voter_name: "Jones".into(),
                    option: VoteOption::No,
                },
                Ballot {
                    voter_name: "Brown".into(),
                    option: VoteOption::Other,
                },
            ]
        );
    }
}
