//! Blocking HTTP client for the upstream site.
//!
//! The site runs bot-challenge heuristics keyed on the request fingerprint,
//! so the client always presents a consistent browser-plausible identity.
//! A polite delay follows every request; it is a blocking pause on the
//! calling thread, matching the core's synchronous resource model.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use tracing::{debug, warn};

use crate::config::ScraperConfig;
use crate::creative::types::PageEnvelope;
use crate::error::{Result, ScrapeError};

pub struct HttpClient {
    http: Client,
    base_url: String,
    delay: Duration,
}

impl HttpClient {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            delay: Duration::from_millis(config.delay_ms),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a URL and return the response body.
    ///
    /// Non-success status is fatal for the request. The polite delay runs
    /// after the body has been read, on the calling thread.
    pub fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                status,
                url: url.to_string(),
            });
        }

        let text = response.text()?;
        self.polite_pause();
        Ok(text)
    }

    /// GET a listing endpoint and decode its JSON envelope.
    pub fn get_envelope(&self, url: &str) -> Result<PageEnvelope> {
        let body = self.get_text(url)?;
        decode_envelope(&body)
    }

    fn polite_pause(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}

/// Decode the `{ "islands": ..., "pages": ... }` envelope.
///
/// Strict typed decode first; on mismatch, one lenient pass over a raw JSON
/// value pulls whatever fragment fields are present (edge pages have been
/// seen with extra fields or one fragment missing). A body that isn't JSON
/// at all fails as a decode error.
pub(crate) fn decode_envelope(body: &str) -> Result<PageEnvelope> {
    match serde_json::from_str::<PageEnvelope>(body) {
        Ok(envelope) => Ok(envelope),
        Err(err) => {
            warn!("Strict envelope decode failed ({}), retrying leniently", err);
            let value: serde_json::Value = serde_json::from_str(body)?;
            Ok(PageEnvelope {
                islands: value
                    .get("islands")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                pages: value
                    .get("pages")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
            })
        }
    }
}
