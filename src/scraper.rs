//! The scraper façade.
//!
//! One `CreativeScraper` owns the HTTP client and exposes every public
//! operation: listing walks, island details, creator aggregates, site-wide
//! stats. All I/O is sequential and blocking; the only state is the client
//! itself, so concurrent callers simply issue independent requests.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::client::HttpClient;
use crate::config::ScraperConfig;
use crate::creative::pager::IslandPages;
use crate::creative::types::{ListingEntry, PageEnvelope};
use crate::creator::{self, CreatorSummary};
use crate::error::Result;
use crate::island::{self, IslandDetails};
use crate::player_count::{self, PopularRelease};

/// Listing row optionally enriched with its detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedIsland {
    pub listing: ListingEntry,
    pub details: Option<IslandDetails>,
}

pub struct CreativeScraper {
    client: HttpClient,
}

impl CreativeScraper {
    pub fn new() -> Result<Self> {
        Self::with_config(ScraperConfig::default())
    }

    pub fn with_config(config: ScraperConfig) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(&config)?,
        })
    }

    /// Fetch one page of the site-wide "most played" listing.
    pub fn fetch_creative_page(&self, page: u32, hide_epic: bool) -> Result<PageEnvelope> {
        self.client
            .get_envelope(&creative_url(self.client.base_url(), page, hide_epic))
    }

    /// Fetch one page of a creator's listing.
    pub fn fetch_creator_page(&self, name: &str, page: u32) -> Result<PageEnvelope> {
        self.client
            .get_envelope(&creator_url(self.client.base_url(), name, page))
    }

    /// Walk the site-wide listing lazily, page by page. `hide_epic` asks
    /// the server to filter out first-party islands.
    pub fn iter_creative_list(
        &self,
        max_pages: Option<u32>,
        hide_epic: bool,
    ) -> IslandPages<impl Fn(u32) -> Result<PageEnvelope> + '_> {
        IslandPages::new(self.client.base_url(), max_pages, move |page| {
            self.fetch_creative_page(page, hide_epic)
        })
    }

    /// Walk one creator's listing lazily.
    pub fn iter_creator_list<'a>(
        &'a self,
        name: &str,
        max_pages: Option<u32>,
    ) -> IslandPages<impl Fn(u32) -> Result<PageEnvelope> + 'a> {
        let name = name.to_string();
        IslandPages::new(self.client.base_url(), max_pages, move |page| {
            self.fetch_creator_page(&name, page)
        })
    }

    /// Resolve one island's detail page from a bare code, a `code=` query
    /// tail, or a full URL.
    ///
    /// The fragment-mode page is fetched first; when it yields no cover
    /// image, the non-fragment page (same URL, `code` intact) is tried
    /// once, with every failure of that second fetch suppressed.
    pub fn fetch_island_details(&self, code_or_url: &str) -> Result<IslandDetails> {
        let canonical = island::canonical_url(self.client.base_url(), code_or_url);
        let html = self.client.get_text(&island::with_ajax(&canonical))?;
        let mut details = island::parse_island_page(&html, self.client.base_url())?;

        if details.image.is_none() {
            match self.client.get_text(&canonical) {
                Ok(full_page) => {
                    match island::parser::image_from_full_page(&full_page, self.client.base_url())
                    {
                        Ok(image) => details.image = image,
                        Err(err) => debug!("Image fallback parse failed: {}", err),
                    }
                }
                Err(err) => debug!("Non-fragment refetch failed: {}", err),
            }
        }

        info!(
            "Fetched island details for {}",
            details.code.as_deref().unwrap_or("<no code>")
        );
        Ok(details)
    }

    /// Aggregate a creator's listing into totals, plus a best-effort
    /// avatar lookup from the non-fragment profile page.
    pub fn fetch_creator_stats(&self, name_or_url: &str, max_pages: u32) -> Result<CreatorSummary> {
        let name = creator::resolve_name(name_or_url);

        let mut items = Vec::new();
        for entry in self.iter_creator_list(&name, Some(max_pages.max(1))) {
            items.push(entry?);
        }

        let avatar = self.fetch_creator_avatar(&name);
        info!("Creator {}: {} maps listed", name, items.len());
        Ok(CreatorSummary::from_items(name, items, avatar))
    }

    fn fetch_creator_avatar(&self, name: &str) -> Option<String> {
        let url = format!(
            "{}/creator?name={}",
            self.client.base_url(),
            urlencoding::encode(name)
        );
        match self.client.get_text(&url) {
            Ok(html) => match creator::parser::extract_avatar(&html, self.client.base_url()) {
                Ok(avatar) => avatar,
                Err(err) => {
                    debug!("Avatar extraction failed for {}: {}", name, err);
                    None
                }
            },
            Err(err) => {
                debug!("Avatar fetch failed for {}: {}", name, err);
                None
            }
        }
    }

    /// Site-wide concurrent player count; `Ok(None)` when the page loads
    /// but the headline phrase isn't found.
    pub fn fetch_global_player_count(&self) -> Result<Option<u64>> {
        let url = format!("{}/player-count", self.client.base_url());
        let html = self.client.get_text(&url)?;
        Ok(player_count::parse_player_count(&html))
    }

    /// The "Popular releases" strip from the player-count page.
    pub fn fetch_popular_releases(&self, limit: usize) -> Result<Vec<PopularRelease>> {
        let url = format!("{}/player-count", self.client.base_url());
        let html = self.client.get_text(&url)?;
        player_count::parse_popular_releases(&html, self.client.base_url(), limit)
    }

    /// Walk the listing and optionally enrich every row with its detail
    /// page. A failed detail fetch drops only that island's enrichment;
    /// the listing row is kept.
    pub fn scrape(&self, max_pages: Option<u32>, with_details: bool) -> Result<Vec<ScrapedIsland>> {
        let mut listings = Vec::new();
        for entry in self.iter_creative_list(max_pages, false) {
            listings.push(entry?);
        }

        let mut islands = Vec::with_capacity(listings.len());
        for listing in listings {
            let details = if with_details {
                match listing.code.as_deref() {
                    Some(code) => match self.fetch_island_details(code) {
                        Ok(details) => Some(details),
                        Err(err) => {
                            warn!("Skipping details for {}: {}", code, err);
                            None
                        }
                    },
                    None => None,
                }
            } else {
                None
            };
            islands.push(ScrapedIsland { listing, details });
        }
        Ok(islands)
    }
}

/// `page` is omitted for page 1, matching what the site itself emits.
fn creative_url(base_url: &str, page: u32, hide_epic: bool) -> String {
    let mut url = format!("{}/creative?", base_url);
    if page > 1 {
        url.push_str(&format!("page={}&", page));
    }
    if hide_epic {
        url.push_str("hideepic&");
    }
    url.push_str("ajax");
    url
}

fn creator_url(base_url: &str, name: &str, page: u32) -> String {
    let mut url = format!("{}/creator?name={}&", base_url, urlencoding::encode(name));
    if page > 1 {
        url.push_str(&format!("page={}&", page));
    }
    url.push_str("ajax");
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://fortnite.gg";

    #[test]
    fn test_creative_url() {
        assert_eq!(creative_url(BASE, 1, false), "https://fortnite.gg/creative?ajax");
        assert_eq!(
            creative_url(BASE, 2, false),
            "https://fortnite.gg/creative?page=2&ajax"
        );
        assert_eq!(
            creative_url(BASE, 1, true),
            "https://fortnite.gg/creative?hideepic&ajax"
        );
        assert_eq!(
            creative_url(BASE, 3, true),
            "https://fortnite.gg/creative?page=3&hideepic&ajax"
        );
    }

    #[test]
    fn test_creator_url_encodes_name() {
        assert_eq!(
            creator_url(BASE, "coolmaker", 1),
            "https://fortnite.gg/creator?name=coolmaker&ajax"
        );
        assert_eq!(
            creator_url(BASE, "team awesome", 2),
            "https://fortnite.gg/creator?name=team%20awesome&page=2&ajax"
        );
    }
}
