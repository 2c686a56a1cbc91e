pub mod html;
pub mod models;
pub mod pager;
pub mod retry;
mod scraper;
mod scraper_error;
pub mod sites;
pub mod transport;
pub mod user_agents;

pub use self::scraper::{ListingScraper, PaginatedResult};
pub use self::scraper_error::ScraperError;
