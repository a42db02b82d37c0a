//! Island detail pages: URL canonicalization, field extraction, cover
//! image resolution.

pub mod parser;
pub mod types;

pub use parser::{canonical_url, parse_island_page, with_ajax};
pub use types::IslandDetails;
