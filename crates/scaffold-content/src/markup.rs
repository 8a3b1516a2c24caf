//! Container markup, escaping and the post-sanitize safety check
//!
//! This is the only place in the workspace that concatenates markup.

use crate::error::SanitizeError;
use crate::options::FORBIDDEN_TAGS;
use once_cell::sync::Lazy;
use regex::Regex;

/// One start or end tag; quoted attribute values are consumed whole, so a
/// `>` or `<` inside a value neither ends nor starts a tag
static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<(/?)([A-Za-z][^\s/>]*)((?:"[^"]*"|'[^']*'|[^'">])*)>"#).expect("static regex")
});

/// One attribute inside a tag body: name, then optional value
static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([^\s"'=/>]+)(?:\s*=\s*("[^"]*"|'[^']*'|[^\s"'>]+))?"#).expect("static regex")
});

/// Markup opener left outside any complete tag
static DANGLING_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[/!?A-Za-z]").expect("static regex"));

/// Attributes whose value is navigated to or fetched
const URL_ATTRIBUTES: [&str; 9] = [
    "href",
    "src",
    "action",
    "formaction",
    "xlink:href",
    "poster",
    "background",
    "cite",
    "data",
];

/// Escape text for element content
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape text for a double-quoted attribute value
#[must_use]
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Wrap already-safe inner markup in the accessible container
#[must_use]
pub(crate) fn container(aria_label: &str, inner_html: &str) -> String {
    format!(
        r#"<div role="region" aria-label="{}">{}</div>"#,
        escape_attribute(aria_label),
        inner_html
    )
}

/// Reject sanitizer output that still contains an executable context
///
/// Only tag names, attribute names and URL attribute values are inspected;
/// text and other attribute values may say anything.
///
/// # Errors
/// `SanitizeError::UnsafeOutput` naming the first offending construct
pub fn check_executable(html: &str) -> Result<(), SanitizeError> {
    let mut last = 0;
    for tag in TAG.captures_iter(html) {
        let whole = tag.get(0).map_or(0..0, |m| m.range());
        if DANGLING_OPEN.is_match(&html[last..whole.start]) {
            return Err(SanitizeError::UnsafeOutput("unterminated tag"));
        }
        last = whole.end;

        let name = &tag[2];
        if FORBIDDEN_TAGS.iter().any(|f| f.eq_ignore_ascii_case(name)) {
            return Err(SanitizeError::UnsafeOutput("script or style element"));
        }
        if tag[1].is_empty() {
            check_attributes(&tag[3])?;
        }
    }
    if DANGLING_OPEN.is_match(&html[last..]) {
        return Err(SanitizeError::UnsafeOutput("unterminated tag"));
    }
    Ok(())
}

fn check_attributes(body: &str) -> Result<(), SanitizeError> {
    for attribute in ATTRIBUTE.captures_iter(body) {
        let name = &attribute[1];
        if name.get(..2).is_some_and(|prefix| prefix.eq_ignore_ascii_case("on")) {
            return Err(SanitizeError::UnsafeOutput("event handler attribute"));
        }
        let Some(value) = attribute.get(2) else {
            continue;
        };
        if URL_ATTRIBUTES.iter().any(|u| u.eq_ignore_ascii_case(name)) && is_script_url(value.as_str()) {
            return Err(SanitizeError::UnsafeOutput("script url"));
        }
    }
    Ok(())
}

/// Browsers ignore whitespace and control characters inside a scheme
fn is_script_url(value: &str) -> bool {
    let scheme: String = value
        .trim_matches(|c| c == '"' || c == '\'')
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .take(11)
        .collect::<String>()
        .to_ascii_lowercase();
    scheme.starts_with("javascript:") || scheme.starts_with("vbscript:")
}
