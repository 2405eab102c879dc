//! One full render pass for a server response.

use tracing::info;

use crate::config::ViewConfig;
use crate::document::{Document, PageDocument};
use crate::error::Result;
use crate::event_table::show_events;
use crate::facet_panel::show_facets;
use crate::models::{DashboardPayload, Filter};

/// Render facets and events of `payload` into `doc`.
pub fn render_dashboard(
    doc: &mut impl Document,
    filter: &Filter,
    payload: &DashboardPayload,
    config: &ViewConfig,
) -> Result<()> {
    show_facets(doc, filter, &payload.facets, config)?;
    show_events(doc, filter, &payload.events, config)?;
    info!(
        events = payload.events.len(),
        row_count = ?payload.facets.row_count,
        filtered_count = ?payload.facets.filtered_count,
        "dashboard rendered"
    );
    Ok(())
}

/// Render `payload` into a fresh page shell and return the page HTML.
pub fn render_static_page(
    filter: &Filter,
    payload: &DashboardPayload,
    config: &ViewConfig,
) -> Result<String> {
    let mut doc = PageDocument::shell(config);
    render_dashboard(&mut doc, filter, payload, config)?;
    Ok(doc.to_html())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::region;
    use crate::dom::Element;
    use crate::models::parse_payload;

    #[test]
    fn fills_both_facets_and_events() {
        let payload = parse_payload(
            r#"{
                "facets": {"rowCount": 1, "filteredCount": 1, "threads": ["main"]},
                "events": [{"time": 0, "levelIcon": "I", "logger": "a.B", "thread": "main"}]
            }"#,
        )
        .unwrap();
        let config = ViewConfig::default();
        let mut doc = PageDocument::shell(&config);
        render_dashboard(&mut doc, &Filter::default(), &payload, &config).unwrap();
        assert_eq!(doc.region(region::EVENTS).unwrap().children.len(), 1);
        assert_eq!(doc.region(region::INTERVAL_MATCH_COUNT).unwrap().text_content(), "1");
    }

    #[test]
    fn bare_page_reports_first_missing_region() {
        let mut doc = PageDocument::new(Element::new("body"));
        let err = render_dashboard(
            &mut doc,
            &Filter::default(),
            &DashboardPayload::default(),
            &ViewConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Page region not found: #time");
    }

    #[test]
    fn static_page_contains_event_cards() {
        let payload = parse_payload(
            r#"{"events": [{"time": "2024-01-01T00:00:00Z", "levelIcon": "E", "logger": "a.B"}]}"#,
        )
        .unwrap();
        let html = render_static_page(&Filter::default(), &payload, &ViewConfig::default()).unwrap();
        assert!(html.contains(r#"<div class="event" data-event-index="0">"#));
        assert!(html.contains("[a.B]: "));
    }
}
