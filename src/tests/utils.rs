use crate::scraper::retry::Sleeper;
use crate::scraper::transport::{PageRequest, RawResponse, Transport};
use crate::scraper::ScraperError;
use reqwest::StatusCode;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Default)]
struct FakeState {
    responses: VecDeque<Result<RawResponse, ScraperError>>,
    requests: Vec<PageRequest>,
}

/// Replays canned responses in order and records every request it saw.
/// Clones share state, so a test can keep one handle and give the other away.
#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Rc<RefCell<FakeState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, response: Result<RawResponse, ScraperError>) -> Self {
        self.state.borrow_mut().responses.push_back(response);
        self
    }

    pub fn push_ok(self, body: impl Into<String>) -> Self {
        self.push(Ok(RawResponse {
            status: StatusCode::OK,
            retry_after: None,
            body: body.into(),
        }))
    }

    pub fn push_status(self, code: u16) -> Self {
        self.push(Ok(RawResponse {
            status: StatusCode::from_u16(code).unwrap(),
            retry_after: None,
            body: String::new(),
        }))
    }

    pub fn push_status_with_retry_after(self, code: u16, retry_after: &str) -> Self {
        self.push(Ok(RawResponse {
            status: StatusCode::from_u16(code).unwrap(),
            retry_after: Some(retry_after.to_string()),
            body: String::new(),
        }))
    }

    pub fn push_network_error(self) -> Self {
        self.push(Err(ScraperError::Network("connection reset by peer".into())))
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.state.borrow().requests.clone()
    }

    pub fn request_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    pub fn remaining(&self) -> usize {
        self.state.borrow().responses.len()
    }
}

impl Transport for FakeTransport {
    fn get(&self, request: &PageRequest) -> Result<RawResponse, ScraperError> {
        let mut state = self.state.borrow_mut();
        state.requests.push(request.clone());
        state
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(ScraperError::Network(format!("no canned response for {}", request.url))))
    }
}

/// Records requested sleeps instead of sleeping.
#[derive(Clone, Default)]
pub struct RecordingSleeper {
    sleeps: Rc<RefCell<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }
}

pub fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

/// Unique file path under the system temp dir.
pub fn temp_path(prefix: &str, ext: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("listing_scraper_{prefix}_{nanos}_{n}.{ext}"))
}

/// Business-broker search page whose ld+json lists `urls`.
pub fn business_broker_search_page(urls: &[&str]) -> String {
    let items: Vec<serde_json::Value> = urls
        .iter()
        .enumerate()
        .map(|(i, url)| {
            serde_json::json!({
                "@type": "ListItem",
                "position": i + 1,
                "item": {
                    "@type": "LocalBusiness",
                    "url": url,
                    "name": format!("Business {}", i + 1),
                    "image": "https://img.example/1.jpg",
                    "address": "Austin, TX",
                    "priceRange": "$100,000",
                    "telephone": "555-0100"
                }
            })
        })
        .collect();

    let ld = serde_json::json!({
        "@context": "https://schema.org",
        "@type": "SearchResultsPage",
        "mainEntity": { "@type": "ItemList", "itemListElement": items }
    });

    format!(
        r#"<html><head><script type="application/ld+json">{ld}</script></head>
        <body><h1>Businesses for sale</h1></body></html>"#
    )
}

pub fn business_broker_no_results_page() -> String {
    format!(
        "<html><body><div class=\"results\">{}.</div></body></html>",
        crate::scraper::sites::business_broker::NO_LISTINGS_TEXT
    )
}

/// Flippa search API body with one result per url (`None` = result without a link).
pub fn flippa_search_page(urls: &[Option<&str>]) -> String {
    let results: Vec<serde_json::Value> = urls
        .iter()
        .map(|url| serde_json::json!({ "listing_url": url, "title": "Listing" }))
        .collect();
    serde_json::json!({ "results": results, "meta": { "total": results.len() } }).to_string()
}

pub const BUSINESS_BROKER_DETAIL_HTML: &str = r#"<html><body>
<h1>Established Pizza Restaurant</h1>
<h2>Austin, TX</h2>
<span id="lblPrice">$350,000</span>
<span id="lblyrevenue">$900,000</span>
<div class="industry"><a href="/restaurants">Restaurants</a></div>
<table class="quickFacts">
  <tr><td class="label">Cash Flow: </td><td><span>$50,000</span></td></tr>
  <tr><td class="label">Year Established:</td><td><span>1998</span></td></tr>
  <tr><td class="label">Asking Price:</td><td><span>$349,000</span></td></tr>
  <tr><td class="label">Employees:</td><td><span>12</span></td></tr>
  <tr><td class="label">No value row</td></tr>
</table>
<div class="busListingContent">
BUSINESS OVERVIEW:
Family-run pizza restaurant with loyal customers.
Recently renovated.
REASON FOR SELLING:
Retirement.
</div>
</body></html>"#;

pub const FLIPPA_DETAIL_HTML: &str = r##"<html><body>
<div class="Onboarding__content"><h2>Profitable SaaS for Dentists</h2><p>SaaS</p></div>
<div class="tw-mb-8 tw-flex tw-flex-wrap">
  <a href="#">Sponsored</a><a href="#">Healthcare</a><a href="#"> Software </a><a href="#">Buy Now</a>
</div>
<div class="pg-1 mb-3">Subscription software for dental clinics.</div>
<div class="bid-box-price"><h5>USD $120,000</h5></div>
<div data-controller="toggle-class">Founded by a dentist in 2019.</div>
<div id="properties-summary">
  <div class="d-flex Onboarding__properties-item"><span class="pg-3">Site Age</span><div class="pg-1">4 years</div></div>
  <div class="d-flex Onboarding__properties-item"><span class="pg-3">Monthly Profit</span><div class="pg-1">$3,000 p/mo</div></div>
  <div class="d-flex Onboarding__properties-item"><span class="pg-3">Profit Margin</span><div class="pg-1">75%</div></div>
</div>
</body></html>"##;
