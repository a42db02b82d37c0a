//! Extraction for the site-wide player-count page.
//!
//! The page has no stable ids around the headline number or the "Popular
//! releases" strip, so both probes work off text landmarks: the count from
//! a "<N> PLAYERS RIGHT NOW" phrase in the flattened page text, the
//! releases by finding the section's text node and climbing to the nearest
//! ancestor that actually holds island links.

use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::info;

use super::types::PopularRelease;
use crate::creative::parser::{element_text, island_code_from_href, sel};
use crate::error::Result;
use crate::normalize::parse_plain_integer;

/// How many ancestors to climb from the section heading before giving up
/// and scanning the whole document.
const MAX_ANCESTOR_CLIMB: usize = 8;

/// Pull the global concurrent-player count out of the page, if the
/// headline phrase is present.
pub fn parse_player_count(html: &str) -> Option<u64> {
    let document = Html::parse_document(html);
    let flattened = element_text(&document.root_element());

    let re = Regex::new(r"(?i)([0-9][0-9,.\s]*)\s*PLAYERS\s+RIGHT\s+NOW").ok()?;
    let caps = re.captures(&flattened)?;
    parse_plain_integer(caps.get(1)?.as_str())
}

/// Extract up to `limit` entries from the "Popular releases" strip.
///
/// Missing section or links yield fewer (possibly zero) entries, never an
/// error; when the landmark text is absent the whole page is scanned.
pub fn parse_popular_releases(
    html: &str,
    base_url: &str,
    limit: usize,
) -> Result<Vec<PopularRelease>> {
    let document = Html::parse_document(html);
    let link_sel = sel(r#"a[href*="/island?"]"#)?;
    let marker = Regex::new(r"(?i)popular\s+releases")
        .map_err(|e| crate::error::ScrapeError::Parse(e.to_string()))?;

    let mut container: Option<ElementRef> = None;
    'marker: for node in document.tree.nodes() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        if !marker.is_match(text) {
            continue;
        }
        let mut cursor = node.parent();
        for _ in 0..MAX_ANCESTOR_CLIMB {
            let Some(current) = cursor else {
                break;
            };
            if let Some(el) = ElementRef::wrap(current) {
                if el.select(&link_sel).next().is_some() {
                    container = Some(el);
                    break 'marker;
                }
            }
            cursor = current.parent();
        }
    }

    let links: Vec<ElementRef> = match container {
        Some(el) => el.select(&link_sel).collect(),
        None => document.select(&link_sel).collect(),
    };

    let mut releases = Vec::new();
    for link in links.into_iter().take(limit) {
        let name = element_text(&link);
        if name.is_empty() {
            continue;
        }
        let href = link.value().attr("href");
        let around = link
            .parent()
            .and_then(ElementRef::wrap)
            .map(|parent| element_text(&parent))
            .unwrap_or_else(|| name.clone());

        releases.push(PopularRelease {
            name,
            code: href.and_then(island_code_from_href),
            href: href.map(|h| {
                if h.starts_with('/') {
                    format!("{}{}", base_url, h)
                } else {
                    h.to_string()
                }
            }),
            players_now: first_integer(&around),
        });
    }

    info!("Extracted {} popular releases", releases.len());
    Ok(releases)
}

/// First digit run in the text after dropping thousands separators.
fn first_integer(text: &str) -> Option<u64> {
    let cleaned = text.replace(',', "");
    let start = cleaned.find(|c: char| c.is_ascii_digit())?;
    let run: String = cleaned[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    run.parse().ok()
}
