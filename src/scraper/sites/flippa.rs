// src/scraper/sites/flippa.rs
//
// Flippa: JSON search API for the index, HTML detail pages.

use crate::domain::listing::{DetailField, ListingDetail};
use crate::domain::logic::{record_labeled_value, LabelRule};
use crate::scraper::html::{first_match, first_text, selector};
use crate::scraper::models::{FlippaListing, FlippaSearchPage};
use crate::scraper::pager::{PageContent, PageSource, WalkPolicy};
use crate::scraper::retry::{ExhaustionPolicy, RetryPolicy, DEFAULT_MAX_ATTEMPTS};
use crate::scraper::transport::PageRequest;
use crate::scraper::ScraperError;
use scraper::Html;
use std::time::Duration;

pub const HOST: &str = "flippa.com";
pub const SEARCH_URL: &str = "https://flippa.com/search";
pub const PAGE_PARAM: &str = "page[number]";

const RETRY_DELAY: Duration = Duration::from_secs(10);

const SEARCH_FILTERS: &[(&str, &str)] = &[
    (
        "filter[property_type]",
        "website,fba,saas,ecommerce_store,plugin_and_extension,ai_apps_and_tools,youtube,ios_app,android_app,game,crypto_app,social_media,newsletter,service_and_agency,service,other",
    ),
    ("filter[revenue_generating]", "T,F"),
    ("filter[sale_method]", "auction,classified"),
    ("filter[status]", "open"),
    ("format", "js"),
    ("search_template", "most_relevant"),
];

/// Tag links that are badges rather than industries.
const IGNORED_TAGS: &[&str] = &["sponsored", "buy now", "confidential"];

fn is_asset_age(key: &str) -> bool {
    matches!(key, "site_age" | "app_age")
}

pub const PROPERTY_RULES: &[LabelRule] = &[LabelRule {
    name: "asset_age",
    matches: is_asset_age,
    field: DetailField::BusinessAge,
}];

/// A page that keeps failing ends the walk with what was collected so far.
pub fn walk_policy() -> WalkPolicy {
    WalkPolicy::new(
        RetryPolicy::fixed(DEFAULT_MAX_ATTEMPTS, RETRY_DELAY),
        ExhaustionPolicy::EndWalk,
    )
}

/// Open listings across every property type.
pub struct SearchIndex {
    endpoint: String,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::with_endpoint(SEARCH_URL)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn search_request(&self, page: u32) -> PageRequest {
        let mut req = PageRequest::get(&self.endpoint).accept("application/json, text/plain, */*");
        for (key, value) in SEARCH_FILTERS {
            req = req.with_query(*key, *value);
        }
        req.with_query(PAGE_PARAM, page.to_string())
    }
}

impl Default for SearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for SearchIndex {
    type Item = FlippaListing;

    fn request(&self, page: u32) -> Result<PageRequest, ScraperError> {
        Ok(self.search_request(page))
    }

    fn parse(&self, _page: u32, body: &str) -> Result<PageContent<FlippaListing>, ScraperError> {
        parse_search_page(body)
    }
}

/// An absent or empty `results` array is an empty batch.
pub fn parse_search_page(body: &str) -> Result<PageContent<FlippaListing>, ScraperError> {
    let page: FlippaSearchPage =
        serde_json::from_str(body).map_err(|e| ScraperError::JsonParse(e.to_string()))?;
    Ok(PageContent::Items(page.into_listings()))
}

pub fn parse_detail(source_url: &str, html: &str) -> Result<ListingDetail, ScraperError> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let mut detail = ListingDetail::new(source_url);

    if let Some(title) = first_text(root, &selector(".Onboarding__content h2")?) {
        detail.set(DetailField::Title, title);
    }

    if let Some(industry) = first_text(root, &selector(".Onboarding__content p")?) {
        detail.industry.push(industry);
    }

    if let Some(tags) = first_match(root, &selector(".tw-mb-8.tw-flex.tw-flex-wrap")?) {
        let link_sel = selector("a")?;
        for tag in tags.select(&link_sel) {
            let text: String = tag.text().collect::<String>().trim().to_string();
            if text.is_empty() || IGNORED_TAGS.contains(&text.to_lowercase().as_str()) {
                continue;
            }
            detail.industry.push(text);
        }
    }

    if let Some(description) = first_text(root, &selector(".pg-1.mb-3")?) {
        detail.set(DetailField::Description, description);
    }

    if let Some(price_box) = first_match(root, &selector(".bid-box-price")?) {
        if let Some(price) = first_text(price_box, &selector("h5")?) {
            detail.set(DetailField::AskingPrice, price);
        }
    }

    if let Some(about) = first_text(root, &selector("div[data-controller='toggle-class']")?) {
        detail
            .additional_info
            .insert("about_business".to_string(), about);
    }

    let row_sel = selector("#properties-summary .d-flex.Onboarding__properties-item")?;
    let label_sel = selector(".pg-3")?;
    let value_sel = selector(".pg-1")?;
    for row in document.select(&row_sel) {
        if let (Some(label), Some(value)) = (first_text(row, &label_sel), first_text(row, &value_sel)) {
            record_labeled_value(&mut detail, PROPERTY_RULES, &label, value);
        }
    }

    Ok(detail)
}
