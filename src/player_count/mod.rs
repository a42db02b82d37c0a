//! Site-wide player count and popular-releases extraction.

pub mod parser;
pub mod types;

pub use parser::{parse_player_count, parse_popular_releases};
pub use types::PopularRelease;
