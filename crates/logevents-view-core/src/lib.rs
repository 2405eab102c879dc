//! Filter codec and renderers for the LogEvents dashboard
//!
//! This crate provides:
//! - The dashboard filter and its URL form (`Filter`, [`codec`])
//! - Server payload models (`Facets`, `LogEvent`, `DashboardPayload`)
//! - A typed element tree and the `Document` the renderers write into
//! - The facet panel and event table renderers
//! - View configuration and error types
//!
//! Nothing here touches a browser. The `logevents-view-wasm` crate implements
//! [`Document`] over the real DOM; [`PageDocument`] does the same in memory.

#![forbid(unsafe_code)]

pub mod codec;
pub mod config;
pub mod document;
pub mod dom;
pub mod error;
pub mod event_table;
pub mod facet_panel;
pub mod html;
pub mod models;
pub mod render;

#[cfg(test)]
mod proptest_generators;

// Re-export key types for convenience
pub use config::{DisplayZone, SelectOption, ViewConfig};
pub use document::{Document, PageDocument};
pub use dom::{Element, Node};
pub use error::{Error, Result};
pub use event_table::show_events;
pub use facet_panel::show_facets;
pub use models::{
    DashboardPayload, Facets, Filter, FilterMode, LogEvent, MdcCondition, MdcFilter,
    abbreviate_logger_name, parse_events, parse_facets, parse_payload,
};
pub use render::{render_dashboard, render_static_page};
