//! Filter state carried in the page URL.
//!
//! The dashboard keeps its whole filter in the query string or the fragment as
//! `application/x-www-form-urlencoded` pairs:
//!
//! ```text
//! #time=10:15&interval=PT1H&level=WARN&logger=org.example.A&logger=org.example.B&mdc[user]=alice
//! ```
//!
//! Single-valued keys take the last non-empty value, multi-valued keys (`logger`,
//! `marker`, `node`, `application`) repeat, and `mdc[<key>]` opens a dynamic namespace.
//! Empty values come from blank form controls and mean "no selection". Keys the view
//! does not know are kept verbatim so they survive a round trip.

use tracing::warn;
use url::form_urlencoded;

use crate::models::{Filter, FilterMode};

const MDC_PREFIX: &str = "mdc[";
const MDC_SUFFIX: &str = "]";

const KNOWN_KEYS: &[&str] = &[
    "time",
    "date",
    "instant",
    "interval",
    "level",
    "timezoneOffset",
    "thread",
    "includeLoggers",
    "includeMarkers",
    "logger",
    "marker",
    "node",
    "application",
];

/// Parse a query string or fragment, with or without its leading `?` / `#`.
#[must_use]
pub fn parse(input: &str) -> Filter {
    let mut filter = Filter::default();
    apply_query(&mut filter, input);
    filter
}

/// Parse the filter from both parts of a location.
///
/// The form writes its whole state to the fragment and detail links navigate to a
/// query, so a non-empty fragment replaces the query outright.
#[must_use]
pub fn parse_location(search: &str, hash: &str) -> Filter {
    if strip_marker(hash).is_empty() {
        parse(search)
    } else {
        parse(hash)
    }
}

/// Serialize a filter in canonical key order, without a leading `?`.
///
/// Empty strings are skipped: they parse back as "not set" anyway.
#[must_use]
pub fn serialize(filter: &Filter) -> String {
    let mut out = form_urlencoded::Serializer::new(String::new());

    let mut single = |key: &str, value: Option<&str>| {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            out.append_pair(key, value);
        }
    };
    single("time", filter.time.as_deref());
    single("date", filter.date.as_deref());
    single("instant", filter.instant.as_deref());
    single("interval", filter.interval.as_deref());
    single("level", filter.level.as_deref());
    single(
        "timezoneOffset",
        filter.timezone_offset.map(|o| o.to_string()).as_deref(),
    );
    single("includeLoggers", filter.include_loggers.map(FilterMode::as_str));

    append_all(&mut out, "logger", &filter.loggers);
    if let Some(mode) = filter.include_markers {
        out.append_pair("includeMarkers", mode.as_str());
    }
    append_all(&mut out, "marker", &filter.markers);
    if let Some(thread) = filter.thread.as_deref().filter(|t| !t.is_empty()) {
        out.append_pair("thread", thread);
    }
    append_all(&mut out, "node", &filter.nodes);
    append_all(&mut out, "application", &filter.applications);
    for condition in filter.mdc.iter().filter(|c| !c.value.is_empty()) {
        out.append_pair(&mdc_param(&condition.key), &condition.value);
    }
    for (key, value) in &filter.extra {
        out.append_pair(key, value);
    }
    out.finish()
}

/// A relative link that replaces the current query with `filter`.
#[must_use]
pub fn filter_href(filter: &Filter) -> String {
    format!("?{}", serialize(filter))
}

/// URL key of an MDC restriction: `mdc[<key>]`.
#[must_use]
pub fn mdc_param(key: &str) -> String {
    format!("{MDC_PREFIX}{key}{MDC_SUFFIX}")
}

/// The `<key>` of an `mdc[<key>]` parameter.
#[must_use]
pub fn mdc_key(param: &str) -> Option<&str> {
    param
        .strip_prefix(MDC_PREFIX)?
        .strip_suffix(MDC_SUFFIX)
        .filter(|key| !key.is_empty())
}

fn append_all(
    out: &mut form_urlencoded::Serializer<'_, String>,
    key: &str,
    values: &[String],
) {
    for value in values.iter().filter(|v| !v.is_empty()) {
        out.append_pair(key, value);
    }
}

fn strip_marker(input: &str) -> &str {
    input
        .strip_prefix('?')
        .or_else(|| input.strip_prefix('#'))
        .unwrap_or(input)
}

fn apply_query(filter: &mut Filter, input: &str) {
    for (key, value) in form_urlencoded::parse(strip_marker(input).as_bytes()) {
        apply_pair(filter, &key, value.into_owned());
    }
}

fn apply_pair(filter: &mut Filter, key: &str, value: String) {
    if let Some(name) = mdc_key(key) {
        if !value.is_empty() {
            filter.mdc.set(name, value);
        }
        return;
    }
    if value.is_empty() && KNOWN_KEYS.contains(&key) {
        return;
    }

    match key {
        "time" => filter.time = Some(value),
        "date" => filter.date = Some(value),
        "instant" => filter.instant = Some(value),
        "interval" => filter.interval = Some(value),
        "level" => filter.level = Some(value),
        "thread" => filter.thread = Some(value),
        "timezoneOffset" => match value.trim().parse::<i32>() {
            Ok(offset) => filter.timezone_offset = Some(offset),
            Err(_) => keep_opaque(filter, key, value),
        },
        "includeLoggers" => match value.parse::<FilterMode>() {
            Ok(mode) => filter.include_loggers = Some(mode),
            Err(_) => keep_opaque(filter, key, value),
        },
        "includeMarkers" => match value.parse::<FilterMode>() {
            Ok(mode) => filter.include_markers = Some(mode),
            Err(_) => keep_opaque(filter, key, value),
        },
        "logger" => filter.loggers.push(value),
        "marker" => filter.markers.push(value),
        "node" => filter.nodes.push(value),
        "application" => filter.applications.push(value),
        _ => filter.extra.push((key.to_string(), value)),
    }
}

fn keep_opaque(filter: &mut Filter, key: &str, value: String) {
    warn!(key, value = %value, "unrecognized filter value kept as-is");
    filter.extra.push((key.to_string(), value));
}
