//! Island detail-page data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::normalize::parse_relative_or_absolute_date;

/// Everything extracted from one island detail page.
///
/// Count fields stay raw display strings; downstream consumers format them
/// differently and some are not numeric at all. `stats_overview` is an
/// ordered label -> value list whose key set is whatever the page chose to
/// publish ("Updated", "Release Date", ...), probed defensively via
/// [`IslandDetails::stat`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IslandDetails {
    /// Island code; when present, four groups of four digits
    pub code: Option<String>,
    pub name: Option<String>,
    pub creator: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    /// Resolved cover image URL, absolute
    pub image: Option<String>,
    pub players_now_text: Option<String>,
    pub peak_24h_text: Option<String>,
    pub all_time_peak_text: Option<String>,
    pub stats_overview: Vec<(String, String)>,
}

impl IslandDetails {
    /// Case-insensitive probe into the stats-overview list.
    pub fn stat(&self, label: &str) -> Option<&str> {
        self.stats_overview
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(label))
            .map(|(_, value)| value.as_str())
    }

    /// When the island was last updated, if the page published it in a
    /// recognizable form. This is the signal stale-content reminders key on.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.stat("Updated").and_then(parse_relative_or_absolute_date)
    }

    pub fn release_date(&self) -> Option<DateTime<Utc>> {
        self.stat("Release Date")
            .and_then(parse_relative_or_absolute_date)
    }
}
