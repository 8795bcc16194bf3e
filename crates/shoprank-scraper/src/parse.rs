//! Text and price cleanup for upstream fields.
//!
//! Upstream titles embed search-highlight markup (`<b>…</b>`) and HTML
//! entities; prices arrive as `"12,900"`, `"12900원"` or plain numbers.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static NUMERIC_ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&#(?:[xX]([0-9a-fA-F]{1,6})|([0-9]{1,7}));").expect("valid entity regex")
});
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Removes every `<...>` tag from `input`.
#[must_use]
pub fn strip_markup(input: &str) -> String {
    TAG_RE.replace_all(input, "").into_owned()
}

/// Decodes the named entities upstream titles actually use plus numeric
/// character references. Unknown entities are left as-is.
#[must_use]
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    let numeric = NUMERIC_ENTITY_RE.replace_all(input, |caps: &regex::Captures<'_>| {
        let code = caps
            .get(1)
            .and_then(|hex| u32::from_str_radix(hex.as_str(), 16).ok())
            .or_else(|| caps.get(2).and_then(|dec| dec.as_str().parse::<u32>().ok()));
        code.and_then(char::from_u32)
            .map_or_else(|| caps[0].to_string(), |c| c.to_string())
    });
    // `&amp;` last so `&amp;lt;` decodes to the literal `&lt;`.
    numeric
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Strips markup, decodes entities, and collapses whitespace runs.
#[must_use]
pub fn clean_text(input: &str) -> String {
    let stripped = strip_markup(input);
    let decoded = decode_entities(&stripped);
    WHITESPACE_RE.replace_all(decoded.trim(), " ").into_owned()
}

/// Parses a KRW price string such as `"12,900"`, `"12900원"`, `"₩ 12,900"` or
/// `"12900.00"` into whole won.
///
/// Returns `None` for empty or non-numeric input.
#[must_use]
pub fn parse_price(raw: &str) -> Option<u64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('₩')
        .trim_end_matches('원')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(whole) = cleaned.parse::<u64>() {
        return Some(whole);
    }
    let value = cleaned.parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = value.round() as u64;
    Some(whole)
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
