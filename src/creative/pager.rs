//! Lazy pagination over the listing endpoints.
//!
//! `IslandPages` walks pages sequentially and yields entries one at a time.
//! It is generic over the page-fetch function so the walk-and-stop behavior
//! is exercised in tests without a network; the façade binds the real
//! endpoint, query parameters and HTTP client into the closure.

use std::collections::VecDeque;

use super::parser::{next_page_available, parse_islands_html};
use super::types::{ListingEntry, PageEnvelope};
use crate::error::Result;

pub struct IslandPages<F> {
    fetch: F,
    base_url: String,
    /// Ceiling on pages fetched; `None` walks until no next-page link
    max_pages: Option<u32>,
    next_page: u32,
    pages_fetched: u32,
    buffer: VecDeque<ListingEntry>,
    done: bool,
}

impl<F> IslandPages<F>
where
    F: Fn(u32) -> Result<PageEnvelope>,
{
    pub(crate) fn new(base_url: &str, max_pages: Option<u32>, fetch: F) -> Self {
        Self {
            fetch,
            base_url: base_url.to_string(),
            max_pages,
            next_page: 1,
            pages_fetched: 0,
            buffer: VecDeque::new(),
            done: false,
        }
    }

    fn page_cap_reached(&self) -> bool {
        self.max_pages
            .is_some_and(|cap| self.pages_fetched >= cap)
    }
}

impl<F> Iterator for IslandPages<F>
where
    F: Fn(u32) -> Result<PageEnvelope>,
{
    type Item = Result<ListingEntry>;

    /// A transport or decode failure ends the walk with a single `Err`;
    /// entries already yielded from earlier pages stand.
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.buffer.pop_front() {
                return Some(Ok(entry));
            }
            if self.done || self.page_cap_reached() {
                self.done = true;
                return None;
            }

            let envelope = match (self.fetch)(self.next_page) {
                Ok(envelope) => envelope,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            };
            self.pages_fetched += 1;

            let entries = match parse_islands_html(&envelope.islands, &self.base_url) {
                Ok(entries) => entries,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            };

            // Decide continuation now so an exhausted walk never issues
            // a request beyond the last linked page.
            if self.page_cap_reached() || !next_page_available(&envelope.pages, self.next_page) {
                self.done = true;
            } else {
                self.next_page += 1;
            }

            self.buffer.extend(entries);
        }
    }
}
