//! Creator aggregate data types

use serde::{Deserialize, Serialize};

use crate::creative::types::ListingEntry;

/// Aggregate over one creator's current island listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorSummary {
    pub name: String,
    /// Sum of `players_now` across items, missing counts as 0
    pub total_players_now: u64,
    /// Number of listed islands
    pub total_maps: usize,
    pub items: Vec<ListingEntry>,
    pub avatar: Option<String>,
}

impl CreatorSummary {
    /// Build the summary from a resolved item list; the totals are derived
    /// here and nowhere else.
    pub fn from_items(name: String, items: Vec<ListingEntry>, avatar: Option<String>) -> Self {
        let total_players_now = items.iter().filter_map(|item| item.players_now).sum();
        let total_maps = items.len();
        Self {
            name,
            total_players_now,
            total_maps,
            items,
            avatar,
        }
    }
}
