//! Island detail-page extraction.
//!
//! Fragment-mode detail pages vary a lot between island types; every field
//! is probed independently and misses degrade to `None`. The cover image in
//! particular moves around, so resolution is a strict fallback chain over
//! thumbnail element, background style, and social meta tags — the caller
//! adds a last-resort full-page refetch on top (see the façade).

use regex::Regex;
use scraper::Html;
use tracing::debug;

use super::types::IslandDetails;
use crate::creative::parser::{element_text, sel};
use crate::error::Result;

const ISLAND_CODE_PATTERN: &str = r"(\d{4}-\d{4}-\d{4}-\d{4})";

/// Trailing artifacts the site appends to truncated descriptions.
const READ_MORE_ARTIFACTS: &[&str] = &["...more", "\u{2026}more"];

/// Turn a bare code, a `code=...` query tail, or a full URL into the
/// canonical detail-page URL (without the fragment-mode parameter).
pub fn canonical_url(base_url: &str, code_or_url: &str) -> String {
    let input = code_or_url.trim();
    if input.starts_with("http") {
        return input.to_string();
    }
    if let Some((_, query)) = input.split_once('?') {
        return format!("{}/island?{}", base_url, query);
    }
    if input.contains("code=") {
        return format!("{}/island?{}", base_url, input);
    }
    format!("{}/island?code={}", base_url, urlencoding::encode(input))
}

/// Append the fragment-mode marker the way the site expects it.
pub fn with_ajax(url: &str) -> String {
    if url.contains('?') {
        format!("{}&ajax", url)
    } else {
        format!("{}?ajax", url)
    }
}

/// Make an extracted image reference absolute. Protocol-relative URLs get
/// "https:", root-relative paths get the site origin.
pub(crate) fn normalize_image_url(base_url: &str, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(rest) = raw.strip_prefix("//") {
        return Some(format!("https://{}", rest));
    }
    if raw.starts_with('/') {
        return Some(format!("{}{}", base_url, raw));
    }
    Some(raw.to_string())
}

/// Parse a fragment-mode detail page into an [`IslandDetails`] record.
///
/// The image field holds whatever the in-page fallback chain resolved;
/// `None` means the caller may still try the non-fragment page.
pub fn parse_island_page(html: &str, base_url: &str) -> Result<IslandDetails> {
    let document = Html::parse_document(html);

    let name = document
        .select(&sel("h1")?)
        .next()
        .map(|el| element_text(&el))
        .filter(|t| !t.is_empty());

    let code_re = Regex::new(ISLAND_CODE_PATTERN)
        .map_err(|e| crate::error::ScrapeError::Parse(e.to_string()))?;
    let mut code = document
        .select(&sel(".island-code-wrap")?)
        .next()
        .and_then(|el| {
            code_re
                .captures(&element_text(&el))
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        });
    if code.is_none() {
        // The code element is absent on some layouts; the code still
        // appears somewhere in the body (share links, meta description).
        code = code_re
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
    }

    let description = longest_description(&document)?;

    let tags = document
        .select(&sel(".island-tags .island-tag")?)
        .map(|el| element_text(&el))
        .filter(|t| !t.is_empty())
        .collect();

    let creator = document
        .select(&sel(r#"a[href^="/creator?"]"#)?)
        .next()
        .map(|el| element_text(&el))
        .filter(|t| !t.is_empty());

    let text_at = |css: &str| -> Result<Option<String>> {
        Ok(document
            .select(&sel(css)?)
            .next()
            .map(|el| element_text(&el))
            .filter(|t| !t.is_empty()))
    };

    let players_now_text = text_at(".js-players-now")?;
    let peak_24h_text = text_at(".js-24h-peak")?;
    let all_time_peak_text = text_at(".js-alltime-peak")?;

    let stats_overview = stats_overview(&document)?;
    let image = image_from_fragment(&document, base_url)?;

    Ok(IslandDetails {
        code,
        name,
        creator,
        description,
        tags,
        image,
        players_now_text,
        peak_24h_text,
        all_time_peak_text,
        stats_overview,
    })
}

/// The description shows up in several containers (full, trimmed, wrapped)
/// depending on length and layout; collect every candidate and keep the
/// longest, then strip the "read more" tail artifacts.
fn longest_description(document: &Html) -> Result<Option<String>> {
    let mut candidates: Vec<String> = Vec::new();
    for css in [
        ".island-desc-more",
        ".island-desc",
        ".island-desc-trimmed",
        ".island-desc-wrap",
    ] {
        for el in document.select(&sel(css)?) {
            let text = element_text(&el);
            if !text.is_empty() {
                candidates.push(text);
            }
        }
    }

    let Some(mut best) = candidates.into_iter().max_by_key(|t| t.len()) else {
        return Ok(None);
    };
    for artifact in READ_MORE_ARTIFACTS {
        best = best.replace(artifact, "");
    }
    let best = best.trim().to_string();
    Ok(if best.is_empty() { None } else { Some(best) })
}

/// Pair up the title/number sub-elements of each overview box, preserving
/// publication order. Boxes without a title are skipped; a missing number
/// keeps the label with an empty value.
fn stats_overview(document: &Html) -> Result<Vec<(String, String)>> {
    let box_sel = sel(".stats-overview-box")?;
    let title_sel = sel(".stats-overview-title")?;
    let number_sel = sel(".stats-overview-number")?;

    let mut overview = Vec::new();
    for stat_box in document.select(&box_sel) {
        let Some(title) = stat_box
            .select(&title_sel)
            .next()
            .map(|el| element_text(&el))
            .filter(|t| !t.is_empty())
        else {
            continue;
        };
        let number = stat_box
            .select(&number_sel)
            .next()
            .map(|el| element_text(&el))
            .unwrap_or_default();
        overview.push((title, number));
    }
    Ok(overview)
}

/// Steps (a)-(d) of the image fallback chain, against the fragment page.
fn image_from_fragment(document: &Html, base_url: &str) -> Result<Option<String>> {
    // (a) dedicated thumbnail
    if let Some(el) = document
        .select(&sel(".island-img-thumb img")?)
        .next()
        .or_else(|| {
            document
                .select(&sel(".island-img img").ok()?)
                .next()
        })
    {
        if let Some(url) = el
            .value()
            .attr("src")
            .and_then(|src| normalize_image_url(base_url, src))
        {
            return Ok(Some(url));
        }
    }

    // (b) background-image style on the detail background
    if let Some(style) = document
        .select(&sel(".island-detail-bg, .island-bg")?)
        .next()
        .and_then(|el| el.value().attr("style"))
    {
        if let Some(url) = background_image_url(style)
            .and_then(|raw| normalize_image_url(base_url, &raw))
        {
            return Ok(Some(url));
        }
    }

    // (c) Open Graph, (d) Twitter card
    if let Some(url) = meta_image(document, r#"meta[property="og:image"]"#, base_url)? {
        return Ok(Some(url));
    }
    if let Some(url) = meta_image(
        document,
        r#"meta[name="twitter:image"], meta[property="twitter:image"]"#,
        base_url,
    )? {
        return Ok(Some(url));
    }

    debug!("No cover image in fragment page");
    Ok(None)
}

/// Repeat of the chain against the full (non-fragment) page: meta tag
/// first, then the thumbnail element. Used by the last-resort refetch.
pub fn image_from_full_page(html: &str, base_url: &str) -> Result<Option<String>> {
    let document = Html::parse_document(html);

    if let Some(url) = meta_image(&document, r#"meta[property="og:image"]"#, base_url)? {
        return Ok(Some(url));
    }
    if let Some(el) = document
        .select(&sel(".island-img-thumb img, .island-img img")?)
        .next()
    {
        if let Some(url) = el
            .value()
            .attr("src")
            .and_then(|src| normalize_image_url(base_url, src))
        {
            return Ok(Some(url));
        }
    }
    Ok(None)
}

fn meta_image(document: &Html, css: &str, base_url: &str) -> Result<Option<String>> {
    Ok(document
        .select(&sel(css)?)
        .next()
        .and_then(|el| el.value().attr("content"))
        .and_then(|content| normalize_image_url(base_url, content)))
}

fn background_image_url(style: &str) -> Option<String> {
    let re = Regex::new(r#"url\(['"]?([^'")]+)['"]?\)"#).ok()?;
    re.captures(style)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://fortnite.gg";

    #[test]
    fn test_canonical_url_variants() {
        assert_eq!(
            canonical_url(BASE, "1234-5678-9012-3456"),
            "https://fortnite.gg/island?code=1234-5678-9012-3456"
        );
        assert_eq!(
            canonical_url(BASE, "/island?code=1234-5678-9012-3456"),
            "https://fortnite.gg/island?code=1234-5678-9012-3456"
        );
        assert_eq!(
            canonical_url(BASE, "code=1234-5678-9012-3456"),
            "https://fortnite.gg/island?code=1234-5678-9012-3456"
        );
        assert_eq!(
            canonical_url(BASE, "https://fortnite.gg/island?code=1111-2222-3333-4444"),
            "https://fortnite.gg/island?code=1111-2222-3333-4444"
        );
    }

    #[test]
    fn test_with_ajax() {
        assert_eq!(
            with_ajax("https://fortnite.gg/island?code=1"),
            "https://fortnite.gg/island?code=1&ajax"
        );
        assert_eq!(
            with_ajax("https://fortnite.gg/island"),
            "https://fortnite.gg/island?ajax"
        );
    }

    #[test]
    fn test_normalize_image_url() {
        assert_eq!(
            normalize_image_url(BASE, "//cdn.fortnite.gg/x.jpg"),
            Some("https://cdn.fortnite.gg/x.jpg".to_string())
        );
        assert_eq!(
            normalize_image_url(BASE, "/img/x.jpg"),
            Some("https://fortnite.gg/img/x.jpg".to_string())
        );
        assert_eq!(
            normalize_image_url(BASE, "https://elsewhere.example/x.jpg"),
            Some("https://elsewhere.example/x.jpg".to_string())
        );
        assert_eq!(normalize_image_url(BASE, ""), None);
        assert_eq!(normalize_image_url(BASE, "   "), None);
    }

    #[test]
    fn test_parse_full_detail_page() {
        let html = r#"
            <h1>Red vs Blue Rumble</h1>
            <div class="island-code-wrap">Copy code 1234-5678-9012-3456</div>
            <a href="/creator?name=coolmaker">coolmaker</a>
            <div class="island-desc-trimmed">Team up and fight across the...more</div>
            <div class="island-desc-more">Team up and fight across the biggest rumble island. Respawns on.</div>
            <div class="island-tags">
                <span class="island-tag">pvp</span>
                <span class="island-tag">team deathmatch</span>
            </div>
            <div class="island-img-thumb"><img src="//cdn.fortnite.gg/maps/1234.jpg"></div>
            <span class="js-players-now">5,210</span>
            <span class="js-24h-peak">8,001</span>
            <span class="js-alltime-peak">51,377</span>
            <div class="stats-overview-box">
                <div class="stats-overview-title">Updated</div>
                <div class="stats-overview-number">3 days ago</div>
            </div>
            <div class="stats-overview-box">
                <div class="stats-overview-title">Release Date</div>
                <div class="stats-overview-number">Feb 4, 2025</div>
            </div>
        "#;

        let details = parse_island_page(html, BASE).unwrap();
        assert_eq!(details.name.as_deref(), Some("Red vs Blue Rumble"));
        assert_eq!(details.code.as_deref(), Some("1234-5678-9012-3456"));
        assert_eq!(details.creator.as_deref(), Some("coolmaker"));
        assert_eq!(
            details.description.as_deref(),
            Some("Team up and fight across the biggest rumble island. Respawns on.")
        );
        assert_eq!(details.tags, vec!["pvp", "team deathmatch"]);
        assert_eq!(
            details.image.as_deref(),
            Some("https://cdn.fortnite.gg/maps/1234.jpg")
        );
        assert_eq!(details.players_now_text.as_deref(), Some("5,210"));
        assert_eq!(details.peak_24h_text.as_deref(), Some("8,001"));
        assert_eq!(details.all_time_peak_text.as_deref(), Some("51,377"));
        assert_eq!(
            details.stats_overview,
            vec![
                ("Updated".to_string(), "3 days ago".to_string()),
                ("Release Date".to_string(), "Feb 4, 2025".to_string()),
            ]
        );
    }

    #[test]
    fn test_description_strips_read_more_artifact() {
        let html = r#"<div class="island-desc">Endless duels…more</div>
            <div class="island-desc-wrap">Endless duels in the arena with friends...more</div>"#;
        let details = parse_island_page(html, BASE).unwrap();
        assert_eq!(
            details.description.as_deref(),
            Some("Endless duels in the arena with friends")
        );
    }

    #[test]
    fn test_code_falls_back_to_body_search() {
        let html = r#"<h1>No code element</h1>
            <script>share("https://fortnite.gg/island?code=9999-8888-7777-6666")</script>"#;
        let details = parse_island_page(html, BASE).unwrap();
        assert_eq!(details.code.as_deref(), Some("9999-8888-7777-6666"));
    }

    #[test]
    fn test_image_from_og_meta_only() {
        let html = r#"
            <h1>Meta Only</h1>
            <meta property="og:image" content="//cdn.fortnite.gg/og/meta-only.jpg">
        "#;
        let details = parse_island_page(html, BASE).unwrap();
        assert_eq!(
            details.image.as_deref(),
            Some("https://cdn.fortnite.gg/og/meta-only.jpg")
        );
    }

    #[test]
    fn test_image_from_background_style() {
        let html = r#"<div class="island-detail-bg" style="background-image: url('/img/bg/4242.jpg');"></div>"#;
        let details = parse_island_page(html, BASE).unwrap();
        assert_eq!(
            details.image.as_deref(),
            Some("https://fortnite.gg/img/bg/4242.jpg")
        );
    }

    #[test]
    fn test_image_priority_thumbnail_over_meta() {
        let html = r#"
            <div class="island-img"><img src="/maps/thumb.jpg"></div>
            <meta property="og:image" content="/og/social.jpg">
        "#;
        let details = parse_island_page(html, BASE).unwrap();
        assert_eq!(
            details.image.as_deref(),
            Some("https://fortnite.gg/maps/thumb.jpg")
        );
    }

    #[test]
    fn test_image_missing_everywhere() {
        let details = parse_island_page("<h1>Bare page</h1>", BASE).unwrap();
        assert_eq!(details.image, None);
    }

    #[test]
    fn test_image_from_full_page_prefers_meta() {
        let html = r#"
            <meta property="og:image" content="https://cdn.fortnite.gg/og/full.jpg">
            <div class="island-img"><img src="/maps/thumb.jpg"></div>
        "#;
        assert_eq!(
            image_from_full_page(html, BASE).unwrap().as_deref(),
            Some("https://cdn.fortnite.gg/og/full.jpg")
        );
    }

    #[test]
    fn test_twitter_meta_fallback() {
        let html = r#"<meta name="twitter:image" content="/og/tw.jpg">"#;
        let details = parse_island_page(html, BASE).unwrap();
        assert_eq!(
            details.image.as_deref(),
            Some("https://fortnite.gg/og/tw.jpg")
        );
    }
}
