pub mod config;
pub mod domain;
pub mod errors;
pub mod exports;
pub mod scraper;

#[cfg(test)]
mod tests;

pub use crate::config::Config;
pub use crate::domain::listing::{ListingDetail, ListingSummary};
pub use crate::errors::AppError;
pub use crate::scraper::{ListingScraper, ScraperError};
