// scraper.rs
use crate::domain::listing::{ListingDetail, ListingSummary};
use crate::scraper::pager::{PageBatch, PageSource, PageWalker, StopReason, WalkPolicy};
use crate::scraper::retry::{Sleeper, ThreadSleeper};
use crate::scraper::sites::{business_broker, flippa, Site};
use crate::scraper::transport::{fetch, log_egress_ip, PageRequest, ReqwestTransport, Transport};
use crate::scraper::ScraperError;
use tracing::{error, info};

pub struct ListingScraper {
    transport: Box<dyn Transport>,
    sleeper: Box<dyn Sleeper>,
    check_egress_ip: bool,
    max_pages: Option<u32>,
}

/// What a finished walk produced.
#[derive(Debug)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub pages_fetched: u32,
    pub stop_reason: Option<StopReason>,
}

impl ListingScraper {
    /// Live scraper: real HTTP through the optional proxy, real sleeps.
    pub fn new(proxy_url: Option<String>) -> Self {
        Self::with_parts(Box::new(ReqwestTransport::new(proxy_url)), Box::new(ThreadSleeper))
    }

    pub fn with_parts(transport: Box<dyn Transport>, sleeper: Box<dyn Sleeper>) -> Self {
        Self {
            transport,
            sleeper,
            check_egress_ip: false,
            max_pages: None,
        }
    }

    pub fn check_egress_ip(mut self, enabled: bool) -> Self {
        self.check_egress_ip = enabled;
        self
    }

    pub fn max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    fn log_egress(&self) {
        if self.check_egress_ip {
            log_egress_ip(self.transport.as_ref());
        }
    }

    /// Walk `source` to the end, handing every batch to `on_page`.
    pub fn fetch_all_paginated<S, F>(
        &self,
        source: &S,
        policy: &WalkPolicy,
        mut on_page: F,
    ) -> Result<(u32, Option<StopReason>), ScraperError>
    where
        S: PageSource,
        F: FnMut(PageBatch<S::Item>) -> Result<(), ScraperError>,
    {
        let policy = policy
            .clone()
            .with_max_pages(self.max_pages.or(policy.max_pages))
            .with_egress_check(self.check_egress_ip || policy.check_egress_ip);

        let mut walker = PageWalker::new(
            source,
            self.transport.as_ref(),
            self.sleeper.as_ref(),
            &policy,
        );

        for batch in walker.by_ref() {
            on_page(batch?)?;
        }

        info!(
            pages = walker.pages_fetched(),
            stop_reason = ?walker.stop_reason(),
            "walk finished"
        );
        Ok((walker.pages_fetched(), walker.stop_reason()))
    }

    /// Every detail-page link from the Flippa search API.
    ///
    /// A page that fails all its attempts ends the walk; the links gathered
    /// before it are still returned.
    pub fn flippa_links(&self) -> Result<PaginatedResult<String>, ScraperError> {
        self.flippa_links_from(&flippa::SearchIndex::new())
    }

    pub fn flippa_links_from(
        &self,
        index: &flippa::SearchIndex,
    ) -> Result<PaginatedResult<String>, ScraperError> {
        let mut links = Vec::new();

        let (pages_fetched, stop_reason) =
            self.fetch_all_paginated(index, &flippa::walk_policy(), |batch| {
                let before = links.len();
                links.extend(
                    batch
                        .items
                        .into_iter()
                        .filter_map(|listing| listing.listing_url)
                        .filter(|url| !url.is_empty()),
                );
                info!(page = batch.page, links = links.len() - before, "links scraped");
                Ok(())
            })?;

        Ok(PaginatedResult {
            items: links,
            pages_fetched,
            stop_reason,
        })
    }

    /// Every listing summary for one business-broker state page.
    ///
    /// A page that fails all its attempts aborts the walk with its error.
    pub fn business_broker_listings(
        &self,
        state_url: &str,
    ) -> Result<PaginatedResult<ListingSummary>, ScraperError> {
        let index = business_broker::StateIndex::new(state_url)?;
        let mut listings = Vec::new();

        let (pages_fetched, stop_reason) =
            self.fetch_all_paginated(&index, &business_broker::walk_policy(), |batch| {
                info!(page = batch.page, count = batch.items.len(), "listings found");
                listings.extend(batch.items);
                Ok(())
            })?;

        Ok(PaginatedResult {
            items: listings,
            pages_fetched,
            stop_reason,
        })
    }

    /// Fetch one detail page and extract it. Single attempt, no retry.
    pub fn scrape_detail(&self, url: &str) -> Result<ListingDetail, ScraperError> {
        let site = Site::from_url(url)?;
        self.log_egress();

        info!(%url, ?site, "scraping detail page");
        let resp = fetch(self.transport.as_ref(), &PageRequest::get(url))?;
        site.parse_detail(url, &resp.body)
    }

    /// Scrape each URL in turn. Failures are logged and skipped.
    pub fn scrape_details<I, U>(&self, urls: I) -> Vec<ListingDetail>
    where
        I: IntoIterator<Item = U>,
        U: AsRef<str>,
    {
        let mut details = Vec::new();
        for url in urls {
            let url = url.as_ref();
            match self.scrape_detail(url) {
                Ok(detail) => details.push(detail),
                Err(e) => error!(%url, error = %e, "error scraping detail page"),
            }
        }
        details
    }
}
