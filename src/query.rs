// src/query.rs

use url::form_urlencoded;

/// Query parameter that carries the target boss on detail pages.
pub const BOSS_PARAM: &str = "boss";

/// Boss named by the `boss` query parameter of `page_url`.
///
/// Accepts a full URL, a relative one, or a bare `?query`. The first `boss`
/// pair wins; a missing or empty value means no boss was specified.
pub fn boss_from_page_url(page_url: &str) -> Option<String> {
    let (_, rest) = page_url.split_once('?')?;
    let query = rest.split('#').next().unwrap_or_default();
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == BOSS_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Target boss from an explicit name, falling back to a page URL's query.
/// Empty names count as not specified.
pub fn resolve_boss(boss: Option<String>, page_url: Option<&str>) -> Option<String> {
    boss.filter(|b| !b.is_empty())
        .or_else(|| page_url.and_then(boss_from_page_url))
}

/// Link from the index to the detail page of `boss`.
pub fn detail_href(detail_page: &str, boss: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(boss.as_bytes()).collect();
    format!("{}?{}={}", detail_page, BOSS_PARAM, encoded)
}
