// src/scraper/transport.rs
use crate::scraper::user_agents::random_user_agent;
use crate::scraper::ScraperError;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, RETRY_AFTER, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
pub const IP_ECHO_URL: &str = "https://httpbin.org/ip";

/// One outbound GET, described independently of the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub accept: Option<&'static str>,
}

impl PageRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            accept: None,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn accept(mut self, accept: &'static str) -> Self {
        self.accept = Some(accept);
        self
    }

    /// Value of a query parameter, if set.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Whatever came back, before any status interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub retry_after: Option<String>,
    pub body: String,
}

pub trait Transport {
    fn get(&self, request: &PageRequest) -> Result<RawResponse, ScraperError>;
}

/// Blocking reqwest transport.
///
/// A fresh client is built for every request, so each page and each detail
/// fetch opens its own connection through the configured proxy.
pub struct ReqwestTransport {
    proxy_url: Option<String>,
}

impl ReqwestTransport {
    pub fn new(proxy_url: Option<String>) -> Self {
        Self { proxy_url }
    }

    fn build_client(&self) -> Result<Client, ScraperError> {
        let mut builder = Client::builder().timeout(REQUEST_TIMEOUT);

        if let Some(proxy_url) = &self.proxy_url {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(ScraperError::from_reqwest)?;
            builder = builder.proxy(proxy);
        }

        builder.build().map_err(ScraperError::from_reqwest)
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, request: &PageRequest) -> Result<RawResponse, ScraperError> {
        let client = self.build_client()?;

        let mut req = client
            .get(&request.url)
            .header(USER_AGENT, random_user_agent());
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(accept) = request.accept {
            req = req.header(ACCEPT, accept);
        }

        let resp = req.send().map_err(ScraperError::from_reqwest)?;

        let status = resp.status();
        let retry_after = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let body = resp.text().map_err(ScraperError::from_reqwest)?;

        debug!(url = %request.url, %status, bytes = body.len(), "response received");

        Ok(RawResponse {
            status,
            retry_after,
            body,
        })
    }
}

/// Issue one request. 429 becomes `RateLimited`, any other non-2xx `Status`.
pub fn fetch(transport: &dyn Transport, request: &PageRequest) -> Result<RawResponse, ScraperError> {
    let resp = transport.get(request)?;

    if resp.status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ScraperError::RateLimited {
            url: request.url.clone(),
            retry_after: parse_retry_after(resp.retry_after.as_deref()),
        });
    }

    if !resp.status.is_success() {
        return Err(ScraperError::Status {
            status: resp.status,
            url: request.url.clone(),
        });
    }

    Ok(resp)
}

/// `Retry-After` in delta-seconds form. HTTP-date values are not honored.
pub fn parse_retry_after(value: Option<&str>) -> Option<Duration> {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

#[derive(Debug, Deserialize)]
struct IpEcho {
    origin: Option<String>,
}

/// Ask the IP-echo service which address our traffic leaves from.
pub fn egress_ip(transport: &dyn Transport) -> Result<Option<String>, ScraperError> {
    let resp = fetch(transport, &PageRequest::get(IP_ECHO_URL))?;
    let echo: IpEcho =
        serde_json::from_str(&resp.body).map_err(|e| ScraperError::JsonParse(e.to_string()))?;
    Ok(echo.origin)
}

/// Log the egress IP. Failures are logged and otherwise ignored.
pub fn log_egress_ip(transport: &dyn Transport) {
    match egress_ip(transport) {
        Ok(Some(ip)) => info!(egress_ip = %ip, "request egress"),
        Ok(None) => warn!("IP echo response had no origin"),
        Err(e) => warn!(error = %e, "failed to log egress IP"),
    }
}
