//! Island-card extraction from listing fragments.
//!
//! The upstream markup is an unversioned external schema, so every field is
//! an independent nullable probe: a missing element, attribute or label
//! leaves that field `None` and the card still yields an entry. Order of
//! the returned entries is document order, which is display-rank order.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::info;

use super::types::ListingEntry;
use crate::error::{Result, ScrapeError};
use crate::normalize::parse_plain_integer;

/// Labels of the per-card stat rows, matched case-insensitively.
const STAT_MINUTES_PLAYED: &str = "Minutes Played";
const STAT_PLAYS_24H: &str = "24h Plays";
const STAT_FAVORITES_24H: &str = "24h Favorites";
const STAT_RECOMMENDS_24H: &str = "24h Recommends";
const STAT_PLAYERS_24H: &str = "24h Players";
const STAT_AVG_PLAYTIME_24H: &str = "24h Avg Playtime";
const STAT_RETENTION_24H: &str = "24h Retention";

pub(crate) fn sel(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(format!("{}: {:?}", css, e)))
}

/// Element text with whitespace collapsed, the way the site renders it.
pub(crate) fn element_text(el: &ElementRef) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pull the island code out of a card link's `code=` query parameter.
pub(crate) fn island_code_from_href(href: &str) -> Option<String> {
    let re = Regex::new(r"code=([0-9a-z_\-]+)").ok()?;
    re.captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Parse one page's island-card fragment into listing entries.
///
/// Pure: no network, no pagination knowledge. The only error is a CSS
/// selector failing to compile; per-card extraction never fails.
pub fn parse_islands_html(html: &str, base_url: &str) -> Result<Vec<ListingEntry>> {
    let fragment = Html::parse_fragment(html);

    let card_sel = sel("a.island")?;
    let rank_sel = sel(".rank")?;
    let title_sel = sel("h3.island-title")?;
    let img_sel = sel(".island-img img")?;
    let players_sel = sel(".island-img .players")?;
    let ccu_sel = sel(".column-2 .ccu")?;
    let peak_sel = sel(".column-2 .peak")?;
    let stat_sel = sel(".column-2 .table-stat")?;
    let span_sel = sel("span")?;

    let mut entries = Vec::new();

    for card in fragment.select(&card_sel) {
        let href = card.value().attr("href");
        let by_epic = card
            .value()
            .attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == "byepic"));

        let rank = card.select(&rank_sel).next().and_then(|el| {
            let text = element_text(&el);
            if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
                text.parse().ok()
            } else {
                None
            }
        });

        let title = card
            .select(&title_sel)
            .next()
            .map(|el| element_text(&el))
            .filter(|t| !t.is_empty());

        let img = card.select(&img_sel).next();
        let image = img.and_then(|el| el.value().attr("src")).map(String::from);
        let image_alt = img.and_then(|el| el.value().attr("alt")).map(String::from);

        let players_now_pretty = card
            .select(&players_sel)
            .next()
            .map(|el| element_text(&el))
            .filter(|t| !t.is_empty());

        let players_now = card
            .select(&ccu_sel)
            .next()
            .and_then(|el| parse_plain_integer(&element_text(&el)));
        let all_time_peak = card
            .select(&peak_sel)
            .next()
            .and_then(|el| parse_plain_integer(&element_text(&el)));

        let stat = |label: &str| labeled_stat(&card, &stat_sel, &span_sel, label);

        entries.push(ListingEntry {
            rank,
            code: href.and_then(island_code_from_href),
            title,
            href: href.map(|h| absolutize(base_url, h)),
            image,
            image_alt,
            players_now_pretty,
            players_now,
            all_time_peak,
            minutes_played: stat(STAT_MINUTES_PLAYED),
            plays_24h: stat(STAT_PLAYS_24H),
            favorites_24h: stat(STAT_FAVORITES_24H),
            recommends_24h: stat(STAT_RECOMMENDS_24H),
            players_24h: stat(STAT_PLAYERS_24H),
            avg_playtime_24h: stat(STAT_AVG_PLAYTIME_24H),
            retention_24h: stat(STAT_RETENTION_24H),
            by_epic,
        });
    }

    info!("Extracted {} island cards", entries.len());
    Ok(entries)
}

/// Find the stat row whose label span equals `label` case-insensitively and
/// return the row text with the label removed. Absent label -> `None`.
fn labeled_stat(
    card: &ElementRef,
    stat_sel: &Selector,
    span_sel: &Selector,
    label: &str,
) -> Option<String> {
    for row in card.select(stat_sel) {
        let Some(span) = row.select(span_sel).next() else {
            continue;
        };
        let span_text = element_text(&span);
        if !span_text.eq_ignore_ascii_case(label) {
            continue;
        }
        let value = element_text(&row)
            .replacen(&span_text, "", 1)
            .trim()
            .to_string();
        return Some(value);
    }
    None
}

fn absolutize(base_url: &str, href: &str) -> String {
    if href.starts_with('/') {
        format!("{}{}", base_url, href)
    } else {
        href.to_string()
    }
}

/// Whether the page-links fragment references `page=<current+1>`.
///
/// One rule for both the site-wide and creator-scoped listings: a loose
/// substring match, guarded so that the digits end at a boundary (`page=2`
/// is not satisfied by `page=20`).
pub fn next_page_available(pages_html: &str, current_page: u32) -> bool {
    let needle = format!("page={}", current_page + 1);
    pages_html.match_indices(&needle).any(|(idx, _)| {
        pages_html[idx + needle.len()..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_ascii_digit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://fortnite.gg";

    fn card(rank: &str, code: &str, title: &str, ccu: &str, extra_class: &str) -> String {
        format!(
            r##"<a class="island{extra_class}" href="/island?code={code}">
                <div class="rank">{rank}</div>
                <div class="island-img">
                    <img src="https://cdn.fortnite.gg/maps/{code}.jpg" alt="{title}">
                    <div class="players">1.2K</div>
                </div>
                <h3 class="island-title">{title}</h3>
                <div class="column-2">
                    <div class="ccu">{ccu} players</div>
                    <div class="peak">12,345</div>
                    <div class="table-stat"><span>Minutes Played</span> 1.3M</div>
                    <div class="table-stat"><span>24h Plays</span> 462.2K</div>
                    <div class="table-stat"><span>24h Avg Playtime</span> 1h 6m</div>
                    <div class="table-stat"><span>24h Retention</span> 12.5%</div>
                </div>
            </a>"##
        )
    }

    #[test]
    fn test_parse_full_card() {
        let html = card("1", "1234-5678-9012-3456", "Box Fight", "4,096", "");
        let entries = parse_islands_html(&html, BASE).unwrap();
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.rank, Some(1));
        assert_eq!(entry.code.as_deref(), Some("1234-5678-9012-3456"));
        assert_eq!(entry.title.as_deref(), Some("Box Fight"));
        assert_eq!(
            entry.href.as_deref(),
            Some("https://fortnite.gg/island?code=1234-5678-9012-3456")
        );
        assert_eq!(
            entry.image.as_deref(),
            Some("https://cdn.fortnite.gg/maps/1234-5678-9012-3456.jpg")
        );
        assert_eq!(entry.image_alt.as_deref(), Some("Box Fight"));
        assert_eq!(entry.players_now_pretty.as_deref(), Some("1.2K"));
        assert_eq!(entry.players_now, Some(4096));
        assert_eq!(entry.all_time_peak, Some(12345));
        assert_eq!(entry.minutes_played.as_deref(), Some("1.3M"));
        assert_eq!(entry.plays_24h.as_deref(), Some("462.2K"));
        assert_eq!(entry.avg_playtime_24h.as_deref(), Some("1h 6m"));
        assert_eq!(entry.retention_24h.as_deref(), Some("12.5%"));
        // Rows the card didn't carry
        assert_eq!(entry.favorites_24h, None);
        assert_eq!(entry.recommends_24h, None);
        assert_eq!(entry.players_24h, None);
        assert!(!entry.by_epic);
    }

    #[test]
    fn test_order_and_count_match_fragment() {
        let html = format!(
            "{}{}{}",
            card("1", "1111-1111-1111-1111", "First", "10", ""),
            card("2", "2222-2222-2222-2222", "Second", "9", ""),
            card("3", "3333-3333-3333-3333", "Third", "8", "")
        );
        let entries = parse_islands_html(&html, BASE).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries.iter().map(|e| e.rank).collect::<Vec<_>>(),
            vec![Some(1), Some(2), Some(3)]
        );
    }

    #[test]
    fn test_reextraction_is_deterministic() {
        let html = format!(
            "{}{}",
            card("1", "1111-1111-1111-1111", "First", "10", ""),
            card("2", "2222-2222-2222-2222", "Second", "9", "")
        );
        let first = parse_islands_html(&html, BASE).unwrap();
        let second = parse_islands_html(&html, BASE).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_by_epic_class_marker() {
        let html = card("1", "1111-1111-1111-1111", "Official", "10", " byepic");
        let entries = parse_islands_html(&html, BASE).unwrap();
        assert!(entries[0].by_epic);
    }

    #[test]
    fn test_malformed_card_degrades_without_error() {
        let malformed = r#"<a class="island" href="/island"><h3 class="island-title">Bare</h3></a>"#;
        let html = format!(
            "{}{}",
            malformed,
            card("2", "2222-2222-2222-2222", "Fine", "7", "")
        );
        let entries = parse_islands_html(&html, BASE).unwrap();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].rank, None);
        assert_eq!(entries[0].code, None);
        assert_eq!(entries[0].title.as_deref(), Some("Bare"));
        assert_eq!(entries[0].players_now, None);

        assert_eq!(entries[1].code.as_deref(), Some("2222-2222-2222-2222"));
        assert_eq!(entries[1].players_now, Some(7));
    }

    #[test]
    fn test_non_numeric_rank_is_null() {
        let html = card("NEW", "1111-1111-1111-1111", "Fresh", "3", "");
        let entries = parse_islands_html(&html, BASE).unwrap();
        assert_eq!(entries[0].rank, None);
    }

    #[test]
    fn test_empty_fragment() {
        assert!(parse_islands_html("", BASE).unwrap().is_empty());
        assert!(parse_islands_html("<div>no cards here</div>", BASE).unwrap().is_empty());
    }

    #[test]
    fn test_island_code_from_href() {
        assert_eq!(
            island_code_from_href("/island?code=1234-5678-9012-3456&foo=1"),
            Some("1234-5678-9012-3456".to_string())
        );
        assert_eq!(island_code_from_href("/island"), None);
    }

    #[test]
    fn test_next_page_available() {
        assert!(next_page_available(
            r#"<a href="/creative?page=2">2</a>"#,
            1
        ));
        assert!(next_page_available(r#"<a href="/creator?name=x&page=2">"#, 1));
        // page=20 must not satisfy a probe for page=2
        assert!(!next_page_available(r#"<a href="/creative?page=20">"#, 1));
        assert!(!next_page_available("", 1));
        assert!(!next_page_available(r#"<a href="/creative?page=1">"#, 1));
    }
}
