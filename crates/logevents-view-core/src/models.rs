//! Data models for the dashboard view.
//!
//! - [`Filter`]: the user's filter, carried in the page URL (see [`crate::codec`])
//! - [`Facets`]: server-computed distinct attribute values for the current interval
//! - [`LogEvent`]: one matching event, as serialized by the log server
//!
//! All three are transient render input. `Facets` and `LogEvent` lists are replaced
//! wholesale on every server response and never mutated in place.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

// =============================================================================
// Filter
// =============================================================================

/// Whether the checked values of a facet select matching events or hide them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    Include,
    Exclude,
}

impl FilterMode {
    pub const ALL: [Self; 2] = [Self::Include, Self::Exclude];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Include => "include",
            Self::Exclude => "exclude",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Include => "Include",
            Self::Exclude => "Exclude",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "include" => Ok(Self::Include),
            "exclude" => Ok(Self::Exclude),
            other => Err(format!("unknown filter mode: {other}")),
        }
    }
}

/// A single `mdc[<key>]=<value>` restriction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MdcCondition {
    pub key: String,
    pub value: String,
}

/// Ordered MDC restrictions with unique keys.
///
/// Keys keep the position where they were first set; setting an existing key replaces
/// its value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MdcFilter(Vec<MdcCondition>);

impl MdcFilter {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(existing) = self.0.iter_mut().find(|c| c.key == key) {
            existing.value = value;
        } else {
            self.0.push(MdcCondition { key, value });
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|c| c.key == key)
            .map(|c| c.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &MdcCondition> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MdcFilter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filter = Self::new();
        for (key, value) in iter {
            filter.set(key, value);
        }
        filter
    }
}

/// The dashboard filter as carried in the page URL.
///
/// Every field is optional. A field missing from the URL is left unset rather than
/// replaced with a guessed default; the server applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Filter {
    /// Center of the time window, `HH:MM`.
    pub time: Option<String>,
    /// Date of the time window, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Absolute center of the time window; takes precedence over `time`/`date` server side.
    pub instant: Option<String>,
    /// Half-width of the time window as an ISO-8601 duration token.
    pub interval: Option<String>,
    /// Minimum severity.
    pub level: Option<String>,
    /// Browser timezone offset in minutes.
    pub timezone_offset: Option<i32>,
    pub loggers: Vec<String>,
    pub markers: Vec<String>,
    pub thread: Option<String>,
    pub nodes: Vec<String>,
    pub applications: Vec<String>,
    pub mdc: MdcFilter,
    pub include_loggers: Option<FilterMode>,
    pub include_markers: Option<FilterMode>,
    /// Keys this view does not interpret, preserved in URL order.
    pub extra: Vec<(String, String)>,
}

impl Filter {
    /// Values of a multi-valued checkbox facet, by its URL key.
    #[must_use]
    pub fn values_for(&self, name: &str) -> &[String] {
        match name {
            "logger" => &self.loggers,
            "marker" => &self.markers,
            "node" => &self.nodes,
            "application" => &self.applications,
            _ => &[],
        }
    }

    /// True if `value` is among the selected values of the named facet.
    #[must_use]
    pub fn is_selected(&self, name: &str, value: &str) -> bool {
        self.values_for(name).iter().any(|v| v == value)
    }

    /// The part of this filter that describes the time window and severity.
    ///
    /// Detail links start from this and add exactly one attribute restriction.
    #[must_use]
    pub fn window(&self) -> Self {
        Self {
            time: self.time.clone(),
            interval: self.interval.clone(),
            level: self.level.clone(),
            timezone_offset: self.timezone_offset,
            ..Self::default()
        }
    }
}

// =============================================================================
// Facets
// =============================================================================

/// A logger seen in the current interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggerFacet {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviated_name: Option<String>,
}

impl LoggerFacet {
    /// Text shown next to the checkbox.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.abbreviated_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.name)
    }
}

/// An MDC key seen in the current interval, with its distinct values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdcFacet {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// Distinct attribute values for the current interval, as computed by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Facets {
    /// Events in the time interval before attribute filtering.
    pub row_count: Option<u64>,
    /// Events left after attribute filtering.
    pub filtered_count: Option<u64>,
    pub loggers: Vec<LoggerFacet>,
    pub markers: Vec<String>,
    pub threads: Vec<String>,
    pub nodes: Vec<String>,
    pub applications: Vec<String>,
    pub mdc: Vec<MdcFacet>,
}

impl Facets {
    /// Canonical display order: every list sorted lexicographically.
    ///
    /// Server order carries no meaning, so this runs before any node is built.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut facets = self.clone();
        facets.loggers.sort_by(|a, b| a.name.cmp(&b.name));
        facets.markers.sort();
        facets.threads.sort();
        facets.nodes.sort();
        facets.applications.sort();
        facets.mdc.sort_by(|a, b| a.name.cmp(&b.name));
        for entry in &mut facets.mdc {
            entry.values.sort();
        }
        facets
    }

    /// True when the selected time interval holds no events at all.
    #[must_use]
    pub fn is_empty_interval(&self) -> bool {
        self.row_count == Some(0)
    }
}

// =============================================================================
// Log events
// =============================================================================

/// One span of a formatted message. `kind` is the styling hook (`argument`, `constant`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSpan {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// An MDC property attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdcEntry {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

/// One element of an exception stack trace.
///
/// A frame either carries a `source_link`, raw location fields, or neither (a pure
/// elision record). `ignored_frames` counts frames collapsed next to this one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StackFrame {
    pub class_name: Option<String>,
    pub method_name: Option<String>,
    pub file_name: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub line_number: Option<String>,
    pub source_link: Option<String>,
    pub ignored_frames: u32,
}

/// A log event as serialized by the log server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    #[serde(deserialize_with = "instant_from_millis_or_iso")]
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub level_icon: String,
    #[serde(default)]
    pub abbreviated_logger: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub logger: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thread: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub node: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub application: String,
    #[serde(default)]
    pub marker: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mdc: Vec<MdcEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: Vec<MessageSpan>,
    #[serde(default)]
    pub throwable: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stack_trace: Vec<StackFrame>,
}

impl LogEvent {
    /// Logger name for the card header, abbreviated here when the server did not.
    #[must_use]
    pub fn display_logger(&self) -> String {
        match self.abbreviated_logger.as_deref() {
            Some(abbreviated) if !abbreviated.is_empty() => abbreviated.to_string(),
            _ => abbreviate_logger_name(&self.logger, 0),
        }
    }
}

/// Shorten a dotted logger name to fit `max_length` characters where possible.
///
/// The final component is always kept whole; leading package components are kept in
/// full while the budget allows and cut to their initial after that. With a budget of
/// 0, `org.example.Logger` becomes `o.e.Logger`.
#[must_use]
pub fn abbreviate_logger_name(name: &str, max_length: usize) -> String {
    let parts: Vec<&str> = name.split('.').collect();
    let Some((last, packages)) = parts.split_last() else {
        return name.to_string();
    };
    let mut remainder =
        max_length as i64 - last.chars().count() as i64 - (packages.len() as i64 * 2);

    let mut result = String::with_capacity(name.len());
    for part in packages {
        let len = part.chars().count() as i64;
        if len > remainder {
            remainder = 0;
            if let Some(initial) = part.chars().next() {
                result.push(initial);
            }
        } else {
            remainder -= len + 1;
            result.push_str(part);
        }
        result.push('.');
    }
    result.push_str(last);
    result
}

/// The combined server response: facets for the interval plus the matching events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardPayload {
    pub facets: Facets,
    pub events: Vec<LogEvent>,
}

pub fn parse_payload(json: &str) -> Result<DashboardPayload> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_facets(json: &str) -> Result<Facets> {
    Ok(serde_json::from_str(json)?)
}

pub fn parse_events(json: &str) -> Result<Vec<LogEvent>> {
    Ok(serde_json::from_str(json)?)
}

// =============================================================================
// Lenient field decoding
// =============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Int(i64),
    Float(f64),
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<StringOrNumber> = Option::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        StringOrNumber::Text(text) => text,
        StringOrNumber::Int(n) => n.to_string(),
        StringOrNumber::Float(n) => n.to_string(),
    }))
}

/// `null` reads as the empty value; the database backend leaves columns unset.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInstant {
    Millis(i64),
    Text(String),
}

fn instant_from_millis_or_iso<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match RawInstant::deserialize(deserializer)? {
        RawInstant::Millis(millis) => Utc
            .timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {millis}"))),
        RawInstant::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| D::Error::custom(format!("invalid instant {text:?}: {e}"))),
    }
}
