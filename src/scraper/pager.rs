// src/scraper/pager.rs
use crate::scraper::retry::{ExhaustionPolicy, RetryPolicy, Sleeper};
use crate::scraper::transport::{fetch, log_egress_ip, PageRequest, Transport};
use crate::scraper::ScraperError;
use std::time::Duration;
use tracing::{info, warn};

pub const INTER_PAGE_DELAY: Duration = Duration::from_secs(3);

/// What a single index page said.
#[derive(Debug, Clone, PartialEq)]
pub enum PageContent<T> {
    /// The site signalled the end of results (sentinel text or similar).
    NoMoreResults,
    Items(Vec<T>),
}

/// A paginated index: how to ask for page N and how to read the answer.
pub trait PageSource {
    type Item;

    fn request(&self, page: u32) -> Result<PageRequest, ScraperError>;

    fn parse(&self, page: u32, body: &str) -> Result<PageContent<Self::Item>, ScraperError>;
}

#[derive(Debug, Clone)]
pub struct WalkPolicy {
    pub retry: RetryPolicy,
    pub on_exhausted: ExhaustionPolicy,
    pub start_page: u32,
    /// Pause between two successful pages.
    pub inter_page_delay: Duration,
    /// Pause before every request attempt.
    pub request_delay: Duration,
    pub max_pages: Option<u32>,
    /// Log the egress IP before every request attempt.
    pub check_egress_ip: bool,
}

impl WalkPolicy {
    pub fn new(retry: RetryPolicy, on_exhausted: ExhaustionPolicy) -> Self {
        Self {
            retry,
            on_exhausted,
            start_page: 1,
            inter_page_delay: INTER_PAGE_DELAY,
            request_delay: Duration::ZERO,
            max_pages: None,
            check_egress_ip: false,
        }
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_egress_check(mut self, enabled: bool) -> Self {
        self.check_egress_ip = enabled;
        self
    }

    pub fn starting_at(mut self, page: u32) -> Self {
        self.start_page = page;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageBatch<T> {
    pub page: u32,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    NoMoreResults { page: u32 },
    /// `EndWalk` policy: the page failed every attempt and counts as empty.
    RetriesExhausted { page: u32 },
    /// `Abort` policy: the error was handed to the caller.
    Aborted { page: u32 },
    PageLimit { pages: u32 },
}

enum WalkState {
    Fresh,
    AfterPage,
    Stopped(StopReason),
}

/// Lazily walks an index one page at a time, in increasing order.
///
/// Yields `Ok` for every non-empty page. Under `ExhaustionPolicy::Abort` a
/// failed page is yielded once as `Err`, after which the iterator is done.
pub struct PageWalker<'a, S: PageSource> {
    source: &'a S,
    transport: &'a dyn Transport,
    sleeper: &'a dyn Sleeper,
    policy: &'a WalkPolicy,
    next_page: u32,
    pages_fetched: u32,
    state: WalkState,
}

impl<'a, S: PageSource> PageWalker<'a, S> {
    pub fn new(
        source: &'a S,
        transport: &'a dyn Transport,
        sleeper: &'a dyn Sleeper,
        policy: &'a WalkPolicy,
    ) -> Self {
        Self {
            source,
            transport,
            sleeper,
            policy,
            next_page: policy.start_page,
            pages_fetched: 0,
            state: WalkState::Fresh,
        }
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        match self.state {
            WalkState::Stopped(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    fn stop(&mut self, reason: StopReason) {
        self.state = WalkState::Stopped(reason);
    }

    fn fetch_page(&self, page: u32) -> Result<PageContent<S::Item>, ScraperError> {
        self.policy.retry.run(self.sleeper, |attempt| {
            if !self.policy.request_delay.is_zero() {
                self.sleeper.sleep(self.policy.request_delay);
            }

            if self.policy.check_egress_ip {
                log_egress_ip(self.transport);
            }

            let request = self.source.request(page)?;
            info!(page, attempt, url = %request.url, "fetching index page");

            let resp = fetch(self.transport, &request)?;
            self.source.parse(page, &resp.body)
        })
    }
}

impl<'a, S: PageSource> Iterator for PageWalker<'a, S> {
    type Item = Result<PageBatch<S::Item>, ScraperError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let WalkState::Stopped(_) = self.state {
            return None;
        }

        if let Some(max) = self.policy.max_pages {
            if self.pages_fetched >= max {
                info!(pages = self.pages_fetched, "page limit reached, stopping");
                self.stop(StopReason::PageLimit {
                    pages: self.pages_fetched,
                });
                return None;
            }
        }

        if let WalkState::AfterPage = self.state {
            self.sleeper.sleep(self.policy.inter_page_delay);
        }

        let page = self.next_page;

        match self.fetch_page(page) {
            Ok(PageContent::Items(items)) if !items.is_empty() => {
                info!(page, count = items.len(), "page parsed");
                self.next_page += 1;
                self.pages_fetched += 1;
                self.state = WalkState::AfterPage;
                Some(Ok(PageBatch { page, items }))
            }
            Ok(_) => {
                info!(page, "no listings found, stopping");
                self.stop(StopReason::NoMoreResults { page });
                None
            }
            Err(e) => match self.policy.on_exhausted {
                ExhaustionPolicy::Abort => {
                    warn!(page, error = %e, "page failed, aborting walk");
                    self.stop(StopReason::Aborted { page });
                    Some(Err(e))
                }
                ExhaustionPolicy::EndWalk => {
                    warn!(page, error = %e, "page failed, treating as empty");
                    self.stop(StopReason::RetriesExhausted { page });
                    None
                }
            },
        }
    }
}
