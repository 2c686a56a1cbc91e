// errors.rs
use crate::scraper::ScraperError;
use std::path::PathBuf;

/// Errors at the edges of a run: configuration, output files, and whatever
/// the scraping layer gave up on.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Scraper(#[from] ScraperError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}
