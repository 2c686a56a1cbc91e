// src/scraper/sites/business_broker.rs
//
// Business-broker directory: per-state HTML search pages with an ld+json
// item list, and detail pages with a quick-facts table.

use crate::domain::listing::{DetailField, ListingDetail, ListingSummary};
use crate::domain::logic::{apply_derivations, record_labeled_value, LabelRule, EARNINGS_DERIVATIONS};
use crate::domain::sections::record_sections;
use crate::scraper::html::{document_text, first_text, ld_json, selector};
use crate::scraper::models::LdSearchPage;
use crate::scraper::pager::{PageContent, PageSource, WalkPolicy};
use crate::scraper::retry::{ExhaustionPolicy, RetryPolicy, DEFAULT_MAX_ATTEMPTS};
use crate::scraper::transport::PageRequest;
use crate::scraper::ScraperError;
use scraper::Html;
use std::time::Duration;
use url::Url;

pub const HOST: &str = "businessbroker.net";
pub const NO_LISTINGS_TEXT: &str =
    "There are currently no listings that match your search criteria";

const RETRY_DELAY: Duration = Duration::from_secs(1);
const REQUEST_DELAY: Duration = Duration::from_secs(1);

fn is_year_established(key: &str) -> bool {
    key.contains("year_established")
}

fn is_business_overview(key: &str) -> bool {
    key.contains("business_overview")
}

pub const QUICK_FACT_RULES: &[LabelRule] = &[LabelRule {
    name: "year_established",
    matches: is_year_established,
    field: DetailField::BusinessAge,
}];

pub const SECTION_RULES: &[LabelRule] = &[LabelRule {
    name: "business_overview",
    matches: is_business_overview,
    field: DetailField::Description,
}];

/// A failed page aborts the whole walk.
pub fn walk_policy() -> WalkPolicy {
    WalkPolicy::new(
        RetryPolicy::fixed(DEFAULT_MAX_ATTEMPTS, RETRY_DELAY),
        ExhaustionPolicy::Abort,
    )
    .with_request_delay(REQUEST_DELAY)
}

/// Search results for one state, e.g.
/// `https://www.businessbroker.net/state/texas-businesses-for-sale.aspx`.
pub struct StateIndex {
    base_url: Url,
}

impl StateIndex {
    pub fn new(state_url: &str) -> Result<Self, ScraperError> {
        let base_url = Url::parse(state_url).map_err(|e| ScraperError::InvalidUrl {
            url: state_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { base_url })
    }

    /// Page 1 is the bare state URL; later pages set `page=N` on it.
    pub fn page_url(&self, page: u32) -> String {
        if page <= 1 {
            return self.base_url.to_string();
        }

        let mut url = self.base_url.clone();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != "page")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("page", &page.to_string());

        url.to_string()
    }
}

impl PageSource for StateIndex {
    type Item = ListingSummary;

    fn request(&self, page: u32) -> Result<PageRequest, ScraperError> {
        Ok(PageRequest::get(self.page_url(page)))
    }

    fn parse(&self, _page: u32, body: &str) -> Result<PageContent<ListingSummary>, ScraperError> {
        parse_search_page(body)
    }
}

/// Sentinel text ends the walk; otherwise the ld+json item list is the batch.
/// No ld+json block, or one without an item list, reads as an empty batch.
pub fn parse_search_page(body: &str) -> Result<PageContent<ListingSummary>, ScraperError> {
    let document = Html::parse_document(body);

    if document_text(&document).contains(NO_LISTINGS_TEXT) {
        return Ok(PageContent::NoMoreResults);
    }

    let Some(value) = ld_json(&document)? else {
        return Ok(PageContent::Items(Vec::new()));
    };
    if !value.is_object() {
        return Ok(PageContent::Items(Vec::new()));
    }

    let page: LdSearchPage =
        serde_json::from_value(value).map_err(|e| ScraperError::JsonParse(e.to_string()))?;

    Ok(PageContent::Items(page.into_summaries().unwrap_or_default()))
}

/// Pull a listing detail out of a detail page.
pub fn parse_detail(source_url: &str, html: &str) -> Result<ListingDetail, ScraperError> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let mut detail = ListingDetail::new(source_url);

    let named = [
        ("h1", DetailField::Title),
        ("h2", DetailField::Location),
        ("#lblPrice", DetailField::AskingPrice),
        ("#lblyrevenue", DetailField::AnnualRevenue),
    ];
    for (css, field) in named {
        if let Some(text) = first_text(root, &selector(css)?) {
            detail.set(field, text);
        }
    }

    if let Some(industry) = first_text(root, &selector(".industry a")?) {
        detail.industry.push(industry);
    }

    let row_sel = selector(".quickFacts tr")?;
    let label_sel = selector(".label")?;
    let value_sel = selector("td:last-child span")?;
    for row in document.select(&row_sel) {
        let (Some(label), Some(value)) = (first_text(row, &label_sel), first_text(row, &value_sel))
        else {
            continue;
        };
        record_labeled_value(&mut detail, QUICK_FACT_RULES, &label, value);
    }

    apply_derivations(&mut detail, EARNINGS_DERIVATIONS);

    if let Some(content) = document.select(&selector(".busListingContent")?).next() {
        let text: String = content.text().collect();
        record_sections(&mut detail, SECTION_RULES, &text);
    }

    Ok(detail)
}
