//! Configuration for the dashboard view.
//!
//! The page shell ships fixed option lists for the interval and level selects; the
//! renderers rebuild those selects from this configuration on every pass. Native callers
//! load it from environment variables, the browser frontend from a JSON object.

use std::env;

use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::{Deserialize, Serialize};

/// One `<option>` of a fixed select list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Time zone event timestamps are shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayZone {
    /// The host's zone, resolved for each instant so daylight saving applies.
    Local,
    Fixed(FixedOffset),
}

impl DisplayZone {
    /// `HH:MM:SS` of `time` in this zone.
    #[must_use]
    pub fn format_time(self, time: &DateTime<Utc>) -> String {
        const FORMAT: &str = "%H:%M:%S";
        match self {
            Self::Local => time.with_timezone(&Local).format(FORMAT).to_string(),
            Self::Fixed(offset) => time.with_timezone(&offset).format(FORMAT).to_string(),
        }
    }
}

/// Main configuration struct for the dashboard view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewConfig {
    /// Options of the interval select, as ISO-8601 durations.
    pub interval_options: Vec<SelectOption>,
    /// Options of the minimum-level select, most severe first.
    pub level_options: Vec<SelectOption>,
    /// `target` attribute of source-code links in stack traces.
    pub source_link_target: String,
    /// Offset used for event timestamps. `None` means the host's local offset.
    pub utc_offset_minutes: Option<i32>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            interval_options: default_interval_options(),
            level_options: default_level_options(),
            source_link_target: "source".to_string(),
            utc_offset_minutes: None,
        }
    }
}

fn default_interval_options() -> Vec<SelectOption> {
    [
        ("PT1M", "1 minute"),
        ("PT5M", "5 minutes"),
        ("PT10M", "10 minutes"),
        ("PT15M", "15 minutes"),
        ("PT30M", "30 minutes"),
        ("PT1H", "1 hour"),
        ("PT4H", "4 hours"),
        ("PT12H", "12 hours"),
        ("P1D", "1 day"),
    ]
    .into_iter()
    .map(|(value, label)| SelectOption::new(value, label))
    .collect()
}

fn default_level_options() -> Vec<SelectOption> {
    ["ERROR", "WARN", "INFO", "DEBUG", "TRACE"]
        .into_iter()
        .map(|level| SelectOption::new(level, level))
        .collect()
}

impl ViewConfig {
    /// Load configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(options) = env_options("LOGEVENTS_VIEW_INTERVALS") {
            config.interval_options = options;
        }
        if let Some(options) = env_options("LOGEVENTS_VIEW_LEVELS") {
            config.level_options = options;
        }
        if let Some(v) = env_value("LOGEVENTS_VIEW_SOURCE_TARGET").filter(|v| !v.trim().is_empty()) {
            config.source_link_target = v.trim().to_string();
        }
        config.utc_offset_minutes = env_i32_opt("LOGEVENTS_VIEW_UTC_OFFSET_MINUTES");

        config
    }

    /// Parse a configuration object as sent by the page (camelCase JSON, all fields optional).
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Zone used to display event timestamps.
    ///
    /// Out-of-range configured offsets fall back to the host's zone.
    #[must_use]
    pub fn display_zone(&self) -> DisplayZone {
        self.utc_offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes.saturating_mul(60)))
            .map_or(DisplayZone::Local, DisplayZone::Fixed)
    }
}

// Helper functions for environment variable parsing

#[cfg(test)]
thread_local! {
    static TEST_ENV_OVERRIDES: std::cell::RefCell<std::collections::HashMap<String, String>> =
        std::cell::RefCell::new(std::collections::HashMap::new());
}

#[cfg(test)]
fn test_env_override_value(key: &str) -> Option<String> {
    TEST_ENV_OVERRIDES.with(|cell| cell.borrow().get(key).cloned())
}

/// Read a configuration value from the environment.
#[must_use]
pub fn env_value(key: &str) -> Option<String> {
    #[cfg(test)]
    if let Some(v) = test_env_override_value(key) {
        return Some(v);
    }
    env::var(key).ok()
}

fn env_i32_opt(key: &str) -> Option<i32> {
    env_value(key).and_then(|v| v.trim().parse().ok())
}

/// Parse an option list of the form `value=Label,value2=Label 2,value3`.
///
/// Entries without `=` use the value as label. Returns `None` when no entry survives,
/// so an empty variable keeps the defaults.
fn parse_options(raw: &str) -> Option<Vec<SelectOption>> {
    let options: Vec<SelectOption> = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let (value, label) = entry.split_once('=').unwrap_or((entry, entry));
            let value = value.trim();
            if value.is_empty() {
                return None;
            }
            let label = label.trim();
            Some(SelectOption::new(value, if label.is_empty() { value } else { label }))
        })
        .collect();
    if options.is_empty() { None } else { Some(options) }
}

fn env_options(key: &str) -> Option<Vec<SelectOption>> {
    env_value(key).and_then(|raw| parse_options(&raw))
}
