pub mod business_broker;
pub mod flippa;

use crate::domain::listing::ListingDetail;
use crate::scraper::ScraperError;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    BusinessBroker,
    Flippa,
}

impl Site {
    /// Which site a detail URL belongs to, by host.
    pub fn from_url(url: &str) -> Result<Self, ScraperError> {
        let parsed = Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let host = parsed.host_str().unwrap_or_default();
        let on = |domain: &str| host == domain || host.ends_with(&format!(".{domain}"));

        if on(flippa::HOST) {
            Ok(Site::Flippa)
        } else if on(business_broker::HOST) {
            Ok(Site::BusinessBroker)
        } else {
            Err(ScraperError::InvalidUrl {
                url: url.to_string(),
                reason: "unsupported site".to_string(),
            })
        }
    }

    pub fn parse_detail(self, source_url: &str, html: &str) -> Result<ListingDetail, ScraperError> {
        match self {
            Site::BusinessBroker => business_broker::parse_detail(source_url, html),
            Site::Flippa => flippa::parse_detail(source_url, html),
        }
    }
}
