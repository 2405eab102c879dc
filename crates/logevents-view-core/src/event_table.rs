//! Event cards for the matching log events.
//!
//! Each event becomes one `div.event` card: a header line (level glyph, local time,
//! abbreviated logger), the formatted message, and a details list whose values link
//! back to the dashboard with that value added to the current time window.

use tracing::debug;

use crate::codec::filter_href;
use crate::config::{DisplayZone, ViewConfig};
use crate::document::{Document, region};
use crate::dom::{Element, Node};
use crate::error::Result;
use crate::models::{Filter, LogEvent, MessageSpan, StackFrame};

/// Marker appended to the card header of events that carry an exception.
pub const THROWABLE_MARKER: &str = " \u{2757}";

/// Replace the event list with one card per event, in input order.
pub fn show_events(
    doc: &mut impl Document,
    filter: &Filter,
    events: &[LogEvent],
    config: &ViewConfig,
) -> Result<()> {
    let zone = config.display_zone();
    let cards: Vec<Node> = events
        .iter()
        .enumerate()
        .map(|(index, event)| {
            event_card(index, event, filter, zone, &config.source_link_target).into()
        })
        .collect();
    doc.replace_children(region::EVENTS, cards)?;
    debug!(events = events.len(), "rendered events");
    Ok(())
}

/// An event attribute a detail link can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute<'a> {
    Logger,
    Thread,
    Node,
    Application,
    Marker,
    Mdc(&'a str),
}

/// The current time window narrowed to events whose `attribute` equals `value`.
#[must_use]
pub fn detail_filter(filter: &Filter, attribute: Attribute<'_>, value: &str) -> Filter {
    let mut narrowed = filter.window();
    let value = value.to_string();
    match attribute {
        Attribute::Logger => narrowed.loggers.push(value),
        Attribute::Thread => narrowed.thread = Some(value),
        Attribute::Node => narrowed.nodes.push(value),
        Attribute::Application => narrowed.applications.push(value),
        Attribute::Marker => narrowed.markers.push(value),
        Attribute::Mdc(key) => narrowed.mdc.set(key, value),
    }
    narrowed
}

/// Build the card for one event.
#[must_use]
pub fn event_card(
    index: usize,
    event: &LogEvent,
    filter: &Filter,
    zone: DisplayZone,
    source_target: &str,
) -> Element {
    let time = zone.format_time(&event.time);
    let mut card = Element::new("div")
        .class("event")
        .attr("data-event-index", index.to_string())
        .child(Element::new("button").text(event.level_icon.clone()))
        .text(time)
        .child(
            Element::new("span")
                .class("loggerName")
                .text(format!(" [{}]: ", event.display_logger())),
        );
    if event.throwable.is_some() {
        card = card.text(THROWABLE_MARKER);
    }
    card.child(formatted_message(&event.message))
        .child(Element::new("div").class("details").child(details(event, filter, source_target)))
}

fn formatted_message(spans: &[MessageSpan]) -> Element {
    Element::new("div").class("formattedMessage").children(spans.iter().map(|span| {
        Element::new("span")
            .class(span.kind.as_deref().unwrap_or_default())
            .text(span.text.clone())
            .into()
    }))
}

fn details(event: &LogEvent, filter: &Filter, source_target: &str) -> Element {
    let link_row = |label: &str, attribute: Attribute<'_>, value: &str| -> Node {
        let href = filter_href(&detail_filter(filter, attribute, value));
        Element::new("li")
            .child(Element::new("strong").text(format!("{label}:")))
            .text(" ")
            .child(Element::new("a").attr("href", href).text(value))
            .into()
    };

    let mut rows = vec![
        link_row("Logger", Attribute::Logger, &event.logger),
        link_row("Thread", Attribute::Thread, &event.thread),
        link_row("Node", Attribute::Node, &event.node),
        link_row("Application", Attribute::Application, &event.application),
    ];
    if let Some(marker) = event.marker.as_deref() {
        rows.push(link_row("Marker", Attribute::Marker, marker));
    }
    if !event.mdc.is_empty() {
        let entries = event
            .mdc
            .iter()
            .map(|entry| link_row(&entry.name, Attribute::Mdc(&entry.name), &entry.value));
        rows.push(
            Element::new("li")
                .child(Element::new("strong").text("MDC"))
                .child(Element::new("ul").children(entries))
                .into(),
        );
    }
    if let Some(throwable) = event.throwable.as_deref() {
        rows.push(
            Element::new("li")
                .child(Element::new("strong").text("Exception:"))
                .text(format!(" {throwable}"))
                .child(stack_trace(&event.stack_trace, source_target))
                .into(),
        );
    }
    Element::new("ul").children(rows)
}

/// The `pre.stackTrace` block, one line per frame that has something to show.
#[must_use]
pub fn stack_trace(frames: &[StackFrame], source_target: &str) -> Element {
    let mut pre = Element::new("pre").class("stackTrace");
    for frame in frames {
        let mut produced = false;
        let method = frame.method_name.as_deref().unwrap_or_default();
        if let Some(link) = frame.source_link.as_deref() {
            let class = frame.class_name.as_deref().unwrap_or_default();
            pre = pre.child(
                Element::new("a")
                    .attr("target", source_target)
                    .attr("href", link)
                    .text(format!("{class}#{method}")),
            );
            produced = true;
        } else if let Some(class) = frame.class_name.as_deref() {
            pre = pre.text(format!(
                "{class}#{method}({}:{})",
                frame.file_name.as_deref().unwrap_or_default(),
                frame.line_number.as_deref().unwrap_or_default(),
            ));
            produced = true;
        }
        if frame.ignored_frames > 0 {
            pre = pre.text(format!("[{} skipped]", frame.ignored_frames));
            produced = true;
        }
        if produced {
            pre = pre.text("\n");
        }
    }
    pre
}
