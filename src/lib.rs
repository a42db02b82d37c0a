//! Scraping core for fortnite.gg creative island statistics.
//!
//! Turns the site's semi-structured listing fragments and detail pages
//! into typed records: [`ListingEntry`] rows from the paged "most played"
//! and creator listings, [`IslandDetails`] from island pages, and derived
//! [`CreatorSummary`] aggregates. A notification/command front-end (bot,
//! CLI) consumes these records; rendering, subscriptions and caching live
//! there, not here.
//!
//! All extraction is best-effort by design — the upstream markup is an
//! unversioned external schema, so missing elements degrade to `None`
//! fields while transport and decode failures surface as [`ScrapeError`].
//!
//! ```no_run
//! use uefn_scraper::CreativeScraper;
//!
//! let scraper = CreativeScraper::new()?;
//! for entry in scraper.iter_creative_list(Some(1), true) {
//!     let entry = entry?;
//!     println!("{:?} {:?}", entry.rank, entry.title);
//! }
//! let details = scraper.fetch_island_details("1234-5678-9012-3456")?;
//! println!("{:?} {:?}", details.name, details.image);
//! # Ok::<(), uefn_scraper::ScrapeError>(())
//! ```

pub mod client;
pub mod config;
pub mod creative;
pub mod creator;
pub mod error;
pub mod island;
pub mod normalize;
pub mod player_count;
pub mod scraper;

pub use config::ScraperConfig;
pub use creative::{IslandPages, ListingEntry, PageEnvelope};
pub use creator::CreatorSummary;
pub use error::{Result, ScrapeError};
pub use island::IslandDetails;
pub use player_count::PopularRelease;
pub use scraper::{CreativeScraper, ScrapedIsland};
