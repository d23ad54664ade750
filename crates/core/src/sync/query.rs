//! The ephemeral channel: one parameter inside a location's query string.

use std::borrow::Cow;

/// Query parameter carrying the preview URL in shareable links.
pub const URL_PARAM: &str = "url";

fn pairs(query: &str) -> impl Iterator<Item = (&str, &str)> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
}

fn decode(component: &str) -> Option<String> {
    let spaced = component.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(Cow::into_owned)
}

/// Read parameter `name` from `query` (with or without the leading `?`).
///
/// Missing, empty, and undecodable values all read as `None`.
pub fn query_param(query: &str, name: &str) -> Option<String> {
    pairs(query)
        .find(|(key, _)| decode(key).as_deref() == Some(name))
        .and_then(|(_, value)| decode(value))
        .filter(|value| !value.is_empty())
}

/// Rebuild `query` with parameter `name` set to `value`, or removed when
/// `value` is `None`. Other parameters keep their order and encoding.
///
/// Returns `""` or a string starting with `?`.
pub fn with_query_param(query: &str, name: &str, value: Option<&str>) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut replaced = false;
    for (key, raw) in pairs(query) {
        if decode(key).as_deref() == Some(name) {
            if let (Some(value), false) = (value, replaced) {
                parts.push(format!("{}={}", urlencoding::encode(name), urlencoding::encode(value)));
                replaced = true;
            }
            continue;
        }
        if raw.is_empty() {
            parts.push(key.to_string());
        } else {
            parts.push(format!("{key}={raw}"));
        }
    }
    if let (Some(value), false) = (value, replaced) {
        parts.push(format!("{}={}", urlencoding::encode(name), urlencoding::encode(value)));
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!("?{}", parts.join("&"))
    }
}
