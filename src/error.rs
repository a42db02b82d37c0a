//! Error taxonomy for the scraping core.
//!
//! Transport and decode failures abort the operation that hit them;
//! extraction misses never surface here — missing DOM elements and
//! unparseable numbers degrade to `None` fields on the records instead.

use reqwest::StatusCode;

#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} for {url}")]
    HttpStatus { status: StatusCode, url: String },

    #[error("envelope decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid selector: {0}")]
    Selector(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
