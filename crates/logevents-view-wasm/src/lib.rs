//! WASM frontend for the LogEvents dashboard.
//!
//! This crate runs the dashboard renderers in the browser. The filter lives in the
//! page URL; the page script fetches the server payload for that filter and hands the
//! JSON to [`LogEventsView`], which renders it into the page's regions.
//!
//! # Architecture
//!
//! ```text
//! Browser page                      LogEvents server
//!   ├─ location (#filter)  ───────→  /api/events?<filter>
//!   ├─ LogEventsView       ←───────  { facets, events }
//!   │    ├─ FacetPanel
//!   │    └─ EventTable
//!   └─ filter form  ── apply_form ─→ location.hash
//! ```
//!
//! # Building
//!
//! ```bash
//! wasm-pack build crates/logevents-view-wasm --target web
//! ```
//!
//! # Usage
//!
//! ```javascript
//! import init, { LogEventsView } from './logevents_view_wasm.js';
//!
//! async function main() {
//!     await init();
//!     const view = new LogEventsView();
//!     const response = await fetch('/api/events' + window.location.hash.replace('#', '?'));
//!     view.show_payload(await response.text());
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;

// ──────────────────────────────────────────────────────────────────────────────
// Shared logic (WASM-compatible)
// ──────────────────────────────────────────────────────────────────────────────

use logevents_view_core::{
    Document, Error, Filter, Result, ViewConfig, codec, parse_events, parse_facets,
    parse_payload, render_dashboard, show_events, show_facets,
};
use url::form_urlencoded;

/// Render state behind the JavaScript API.
///
/// Kept free of browser types so it can be driven natively against a
/// [`logevents_view_core::PageDocument`].
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    config: ViewConfig,
}

impl ViewState {
    #[must_use]
    pub const fn new(config: ViewConfig) -> Self {
        Self { config }
    }

    pub fn from_config_json(json: &str) -> Result<Self> {
        Ok(Self::new(ViewConfig::from_json(json)?))
    }

    #[must_use]
    pub const fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn show_facets(&self, doc: &mut impl Document, filter: &Filter, json: &str) -> Result<()> {
        let facets = parse_facets(json)?;
        show_facets(doc, filter, &facets, &self.config)
    }

    pub fn show_events(&self, doc: &mut impl Document, filter: &Filter, json: &str) -> Result<()> {
        let events = parse_events(json)?;
        show_events(doc, filter, &events, &self.config)
    }

    pub fn show_payload(&self, doc: &mut impl Document, filter: &Filter, json: &str) -> Result<()> {
        let payload = parse_payload(json)?;
        render_dashboard(doc, filter, &payload, &self.config)
    }
}

/// Build the filter a submitted form describes.
///
/// The pairs go through the same URL decoding as a location, so blank controls
/// drop out and unknown fields are kept.
pub fn filter_from_form<I, K, V>(pairs: I) -> Filter
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        query.append_pair(key.as_ref(), value.as_ref());
    }
    codec::parse(&query.finish())
}

/// Fragment for `location.hash`, including the leading `#`.
#[must_use]
pub fn location_hash(filter: &Filter) -> String {
    format!("#{}", codec::serialize(filter))
}

/// Parse a filter given as JSON by the page script.
pub fn filter_from_json(json: &str) -> Result<Filter> {
    Ok(serde_json::from_str(json)?)
}

/// Message for errors crossing into JavaScript.
#[must_use]
pub fn error_message(err: &Error) -> String {
    format!("{}: {err}", err.error_type())
}

// ──────────────────────────────────────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────────────────────────────────────
