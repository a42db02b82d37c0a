//! Creative listing: island cards, page envelopes, lazy pagination.

pub mod pager;
pub mod parser;
pub mod types;

pub use pager::IslandPages;
pub use parser::parse_islands_html;
pub use types::{ListingEntry, PageEnvelope};
