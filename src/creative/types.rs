//! Creative listing data types

use serde::{Deserialize, Serialize};

/// JSON wrapper returned by the listing and creator endpoints in fragment
/// mode: two raw HTML fragments, one with the island cards and one with the
/// pagination links.
#[derive(Debug, Clone, Deserialize)]
pub struct PageEnvelope {
    pub islands: String,
    pub pages: String,
}

/// One island card from a listing page.
///
/// Every field mirrors what the card displayed at fetch time; a field the
/// markup didn't carry (or that failed to parse) is `None`. The 24h-window
/// metrics stay raw display strings — their formats vary per island and are
/// not always numeric ("12.5%", "1h 6m").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// Rank label as displayed on the card, 1-based
    pub rank: Option<u32>,
    /// Island code from the card link, e.g. "1234-5678-9012-3456"
    pub code: Option<String>,
    pub title: Option<String>,
    /// Absolute detail-page URL
    pub href: Option<String>,
    pub image: Option<String>,
    pub image_alt: Option<String>,
    /// Short current-player string from the thumbnail overlay ("1.2K")
    pub players_now_pretty: Option<String>,
    /// Current player count from the stat column
    pub players_now: Option<u64>,
    pub all_time_peak: Option<u64>,
    pub minutes_played: Option<String>,
    pub plays_24h: Option<String>,
    pub favorites_24h: Option<String>,
    pub recommends_24h: Option<String>,
    pub players_24h: Option<String>,
    pub avg_playtime_24h: Option<String>,
    pub retention_24h: Option<String>,
    /// Card carried the first-party (Epic) author marker
    pub by_epic: bool,
}
