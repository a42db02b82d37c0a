//! Creator-name resolution and profile-page avatar extraction.

use scraper::Html;
use url::Url;

use crate::creative::parser::sel;
use crate::error::Result;
use crate::island::parser::normalize_image_url;

/// Accept either a creator name or a creator-profile URL; URLs resolve to
/// their `name` query parameter, anything else passes through verbatim.
pub fn resolve_name(name_or_url: &str) -> String {
    let input = name_or_url.trim();
    if input.starts_with("http") {
        if let Ok(parsed) = Url::parse(input) {
            if let Some((_, value)) = parsed.query_pairs().find(|(key, _)| key == "name") {
                if !value.is_empty() {
                    return value.into_owned();
                }
            }
        }
    }
    input.to_string()
}

/// Best-effort avatar extraction from the non-fragment profile page:
/// dedicated avatar/header images first, then any image marked as an
/// avatar by its alt text, then the Open Graph card.
pub fn extract_avatar(html: &str, base_url: &str) -> Result<Option<String>> {
    let document = Html::parse_document(html);

    for css in [".creator-avatar img", ".creator-header img"] {
        if let Some(url) = document
            .select(&sel(css)?)
            .next()
            .and_then(|el| el.value().attr("src"))
            .and_then(|src| normalize_image_url(base_url, src))
        {
            return Ok(Some(url));
        }
    }

    for img in document.select(&sel("img")?) {
        let alt_is_avatar = img
            .value()
            .attr("alt")
            .is_some_and(|alt| alt.to_ascii_lowercase().contains("avatar"));
        if alt_is_avatar {
            if let Some(url) = img
                .value()
                .attr("src")
                .and_then(|src| normalize_image_url(base_url, src))
            {
                return Ok(Some(url));
            }
        }
    }

    if let Some(url) = document
        .select(&sel(r#"meta[property="og:image"]"#)?)
        .next()
        .and_then(|el| el.value().attr("content"))
        .and_then(|content| normalize_image_url(base_url, content))
    {
        return Ok(Some(url));
    }

    Ok(None)
}
