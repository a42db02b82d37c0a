//! Site-wide stats data types

use serde::{Deserialize, Serialize};

/// One entry from the "Popular releases" section of the player-count page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularRelease {
    pub name: String,
    pub code: Option<String>,
    /// Absolute detail-page URL
    pub href: Option<String>,
    /// Best-effort current-player count from the surrounding markup
    pub players_now: Option<u64>,
}
