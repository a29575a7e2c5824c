// src/pipeline/scrape.rs

//! Lazy bill and vote scraper.
//!
//! Walks session → chamber → document type → listing → detail page, one
//! detail page per pull. Each bill is yielded once complete, followed by the
//! passage votes it referenced. Nothing is fetched ahead of the consumer.

use std::collections::{HashSet, VecDeque};

use futures::Stream;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{
    Bill, BillType, Chamber, JurisdictionConfig, Record, ScrapeStats, Session, SessionInfo,
    VoteEvent,
};
use crate::services::listing::{listing_url, parse_listing};
use crate::services::votes::{PassageVote, parse_ballots};
use crate::services::{BillContext, BillPage, SubjectIndex, parse_bill_page};
use crate::utils::http::Fetch;
use crate::utils::time::pacific_midnight;

/// Per-chamber state: the resolved session, its subject index and the
/// remaining listing work.
struct ChamberCursor {
    chamber: Chamber,
    session: Session,
    reports_url: String,
    subjects: SubjectIndex,
    doc_types: VecDeque<(u8, BillType)>,
    links: VecDeque<(BillType, String)>,
}

/// Pull-based scraper over one session.
pub struct BillScraper<F: Fetch> {
    fetcher: F,
    jurisdiction: JurisdictionConfig,
    site_base: Url,
    session: SessionInfo,
    chambers: VecDeque<Chamber>,
    cursor: Option<ChamberCursor>,
    pending: VecDeque<Record>,
    seen_votes: HashSet<String>,
    stats: ScrapeStats,
}

impl<F: Fetch> BillScraper<F> {
    /// Set up a scrape of one chamber, or both (Senate first) when `chamber`
    /// is `None`. Without a session the latest configured one is used.
    pub fn new(
        fetcher: F,
        jurisdiction: &JurisdictionConfig,
        chamber: Option<Chamber>,
        session: Option<&str>,
    ) -> Result<Self> {
        let session = match session {
            Some(identifier) => jurisdiction
                .find_session(identifier)
                .cloned()
                .ok_or_else(|| AppError::config(format!("Unknown session '{identifier}'")))?,
            None => {
                let latest = jurisdiction
                    .latest_session()
                    .cloned()
                    .ok_or_else(|| AppError::config("No sessions configured"))?;
                log::info!("no session specified, using {}", latest.identifier);
                latest
            }
        };

        let chambers = match chamber {
            Some(chamber) => VecDeque::from([chamber]),
            None => VecDeque::from([Chamber::Upper, Chamber::Lower]),
        };

        Ok(Self {
            fetcher,
            site_base: Url::parse(&jurisdiction.base_url)?,
            jurisdiction: jurisdiction.clone(),
            session,
            chambers,
            cursor: None,
            pending: VecDeque::new(),
            seen_votes: HashSet::new(),
            stats: ScrapeStats::default(),
        })
    }

    /// Counters for the records produced so far.
    pub fn stats(&self) -> &ScrapeStats {
        &self.stats
    }

    /// Produce the next record, or `None` once every chamber is exhausted.
    ///
    /// A page that cannot be fetched yields one `Err`; the scraper has
    /// already moved past it, so pulling again continues with the next page.
    pub async fn next_record(&mut self) -> Result<Option<Record>> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Ok(Some(record));
            }

            let Some(mut cursor) = self.cursor.take() else {
                let Some(chamber) = self.chambers.pop_front() else {
                    return Ok(None);
                };
                self.cursor = self.start_chamber(chamber).await;
                continue;
            };

            match self.advance(&mut cursor).await {
                Ok(true) => self.cursor = Some(cursor),
                Ok(false) => {
                    log::info!("Finished {} chamber", cursor.chamber);
                }
                Err(e) => {
                    self.cursor = Some(cursor);
                    self.stats.page_failures += 1;
                    return Err(e);
                }
            }
        }
    }

    /// Consume the scraper as a stream of records.
    pub fn into_stream(self) -> impl Stream<Item = Result<Record>> {
        futures::stream::unfold(self, |mut scraper| async move {
            match scraper.next_record().await {
                Ok(Some(record)) => Some((Ok(record), scraper)),
                Ok(None) => None,
                Err(e) => Some((Err(e), scraper)),
            }
        })
    }

    /// Resolve the session and build the subject index for a chamber.
    /// Returns `None` when the session has no data on the site.
    async fn start_chamber(&mut self, chamber: Chamber) -> Option<ChamberCursor> {
        let session = match self.session.resolve() {
            Ok(session) => session,
            Err(e) => {
                log::warn!("{e}; skipping {chamber} chamber");
                return None;
            }
        };

        log::info!(
            "Scraping {} chamber, session {} ({})",
            chamber,
            session.identifier,
            session.year
        );

        let reports_url = self.jurisdiction.reports_url(&session.slug);
        let subjects = if session.special {
            SubjectIndex::default()
        } else {
            self.load_subjects(&reports_url, &session).await
        };

        Some(ChamberCursor {
            chamber,
            session,
            reports_url,
            subjects,
            doc_types: BillType::doc_types(chamber).iter().copied().collect(),
            links: VecDeque::new(),
        })
    }

    async fn load_subjects(&self, reports_url: &str, session: &Session) -> SubjectIndex {
        let url = SubjectIndex::url(reports_url, session);
        let index = match self.fetcher.get(&url).await {
            Ok(page) => SubjectIndex::parse(&page),
            Err(e) => Err(e),
        };

        match index {
            Ok(index) => {
                log::debug!("Subject index has {} bills", index.len());
                index
            }
            Err(e) => {
                log::warn!("Failed to load subject index {url}: {e}; bills will have no subjects");
                SubjectIndex::default()
            }
        }
    }

    /// Do one unit of work for a chamber. Returns `false` when the chamber
    /// has nothing left.
    async fn advance(&mut self, cursor: &mut ChamberCursor) -> Result<bool> {
        if let Some((bill_type, link)) = cursor.links.pop_front() {
            self.scrape_bill(cursor, bill_type, &link).await?;
            return Ok(true);
        }

        if let Some((doc_type, bill_type)) = cursor.doc_types.pop_front() {
            let url = listing_url(&cursor.reports_url, doc_type);
            let page = self.fetch(&url).await?;
            let links = parse_listing(&page)?;
            log::info!(
                "Found {} {:?} listings for {} chamber",
                links.len(),
                bill_type,
                cursor.chamber
            );
            cursor
                .links
                .extend(links.into_iter().map(|link| (bill_type, link)));
            return Ok(true);
        }

        Ok(false)
    }

    async fn scrape_bill(
        &mut self,
        cursor: &ChamberCursor,
        bill_type: BillType,
        link: &str,
    ) -> Result<()> {
        let page_url = format!("{}{}", cursor.reports_url, link);
        let page = self.fetch(&page_url).await?;

        let ctx = BillContext {
            session: &cursor.session.identifier,
            chamber: cursor.chamber,
            bill_type,
            site_base: &self.site_base,
            subjects: &cursor.subjects,
        };
        let BillPage { mut bill, votes } = parse_bill_page(&page, &ctx)?;

        let vote_events = match votes {
            Ok(rows) => {
                self.collect_votes(rows, &bill, &page_url, &cursor.reports_url)
                    .await
            }
            Err(e) => {
                log::warn!("{e}; no votes recorded for {}", bill.identifier);
                self.stats.vote_steps_aborted += 1;
                Vec::new()
            }
        };

        bill.add_source(&page_url);
        log::debug!(
            "Scraped {} with {} actions and {} votes",
            bill.identifier,
            bill.actions.len(),
            vote_events.len()
        );

        self.stats.bills += 1;
        self.pending.push_back(Record::Bill(bill));
        self.pending
            .extend(vote_events.into_iter().map(Record::VoteEvent));
        Ok(())
    }

    /// Turn passage vote rows into events, skipping roll calls already seen
    /// this run and fetching member ballots where possible.
    async fn collect_votes(
        &mut self,
        rows: Vec<PassageVote>,
        bill: &Bill,
        bill_url: &str,
        reports_url: &str,
    ) -> Vec<VoteEvent> {
        let mut events = Vec::new();

        for row in rows {
            let vote_url = format!("{}{}", reports_url, row.href);
            if !self.seen_votes.insert(vote_url.clone()) {
                log::warn!("{vote_url} is included twice, skipping second");
                self.stats.duplicate_votes += 1;
                continue;
            }

            let mut vote = VoteEvent::passage(
                &bill.legislative_session,
                &bill.identifier,
                row.chamber,
                pacific_midnight(row.date),
                row.motion,
                row.counts,
                &vote_url,
            );
            vote.add_source(&vote_url);

            let ballots = match self.fetcher.get(&vote_url).await {
                Ok(page) => parse_ballots(&page),
                Err(e) => Err(e),
            };
            match ballots {
                Ok(ballots) => {
                    for ballot in ballots {
                        vote.add_ballot(ballot.voter_name, ballot.option);
                    }
                    vote.add_source(bill_url);
                }
                Err(e) => {
                    log::warn!(
                        "failed to fetch vote page {vote_url}, adding vote without details: {e}"
                    );
                    self.stats.votes_without_ballots += 1;
                }
            }

            self.stats.votes += 1;
            events.push(vote);
        }

        events
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        self.fetcher
            .get(url)
            .await
            .map_err(|e| AppError::scrape(url, e))
    }
}
