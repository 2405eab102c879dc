//! The page the renderers write into.
//!
//! Renderers never touch a global DOM. They receive a [`Document`] and address page
//! regions by id; the browser frontend implements it over `web_sys`, and
//! [`PageDocument`] implements it over an in-memory [`Element`] tree for tests and
//! static export.

use crate::config::{SelectOption, ViewConfig};
use crate::dom::{Element, Node};
use crate::error::{Error, Result};
use crate::html;

/// Ids of the page regions the renderers address.
pub mod region {
    pub const FILTER_FORM: &str = "filter";
    pub const TIME: &str = "time";
    pub const DATE: &str = "date";
    pub const INTERVAL: &str = "interval";
    pub const LEVEL: &str = "level";
    pub const TIMEZONE_OFFSET: &str = "timezoneOffset";
    pub const INTERVAL_MATCH_COUNT: &str = "intervalMatchCount";
    pub const FILTER_MATCH_COUNT: &str = "filterMatchCount";
    pub const DETAILED_FILTER: &str = "detailedFilter";
    pub const LOGGERS: &str = "loggers";
    pub const MARKERS: &str = "markers";
    pub const NODES: &str = "nodes";
    pub const APPLICATIONS: &str = "applications";
    pub const THREADS: &str = "threads";
    pub const MDC_FILTER: &str = "mdcFilter";
    pub const EVENTS: &str = "events";
}

/// Body class set when the selected interval holds no events.
pub const DRAWER_OPEN_CLASS: &str = "drawerOpen";

/// Mutable access to the page regions.
///
/// Every operation addresses a region by id and fails with
/// [`Error::MissingRegion`] when the page has no such element.
pub trait Document {
    /// Replace all children of the region.
    fn replace_children(&mut self, id: &str, nodes: Vec<Node>) -> Result<()>;

    /// Set the current value of an input or select.
    fn set_value(&mut self, id: &str, value: &str) -> Result<()>;

    /// Replace the region's content with plain text.
    fn set_text(&mut self, id: &str, text: &str) -> Result<()>;

    fn set_visible(&mut self, id: &str, visible: bool) -> Result<()>;

    fn add_body_class(&mut self, class: &str) -> Result<()>;
}

/// In-memory page over an element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDocument {
    root: Element,
}

impl PageDocument {
    /// Wrap an existing tree. Body-class operations need a `body` element somewhere in it.
    #[must_use]
    pub const fn new(root: Element) -> Self {
        Self { root }
    }

    /// The standard dashboard page with every region empty.
    ///
    /// Interval and level selects are pre-filled from `config` so the page is usable
    /// before the first render.
    #[must_use]
    pub fn shell(config: &ViewConfig) -> Self {
        let form = Element::new("form")
            .attr("id", region::FILTER_FORM)
            .child(
                Element::new("div")
                    .class("window")
                    .child(labelled("Time", input("time", region::TIME)))
                    .child(labelled("Date", input("date", region::DATE)))
                    .child(labelled(
                        "Interval",
                        select(region::INTERVAL, "interval", &config.interval_options),
                    ))
                    .child(labelled(
                        "Level",
                        select(region::LEVEL, "level", &config.level_options),
                    ))
                    .child(input("hidden", region::TIMEZONE_OFFSET)),
            )
            .child(
                Element::new("div")
                    .class("counts")
                    .child(Element::new("span").attr("id", region::INTERVAL_MATCH_COUNT))
                    .text(" events in interval, ")
                    .child(Element::new("span").attr("id", region::FILTER_MATCH_COUNT))
                    .text(" matching filter"),
            )
            .child(
                Element::new("details")
                    .attr("id", region::DETAILED_FILTER)
                    .flag("open", true)
                    .child(Element::new("summary").text("Filter"))
                    .child(fieldset("Loggers", Element::new("div").attr("id", region::LOGGERS)))
                    .child(fieldset("Markers", Element::new("div").attr("id", region::MARKERS)))
                    .child(fieldset("Thread", Element::new("div").attr("id", region::THREADS)))
                    .child(fieldset("Nodes", Element::new("div").attr("id", region::NODES)))
                    .child(fieldset(
                        "Applications",
                        Element::new("div").attr("id", region::APPLICATIONS),
                    ))
                    .child(fieldset("MDC", Element::new("div").attr("id", region::MDC_FILTER))),
            )
            .child(Element::new("button").attr("type", "submit").text("Search"));

        let root = Element::new("html")
            .child(
                Element::new("head")
                    .child(Element::new("meta").attr("charset", "utf-8"))
                    .child(Element::new("title").text("Log events")),
            )
            .child(
                Element::new("body")
                    .child(form)
                    .child(Element::new("div").attr("id", region::EVENTS).class("events")),
            );
        Self { root }
    }

    #[must_use]
    pub const fn root(&self) -> &Element {
        &self.root
    }

    /// The region with the given id.
    pub fn region(&self, id: &str) -> Result<&Element> {
        self.root
            .find_by_id(id)
            .ok_or_else(|| Error::MissingRegion(id.to_string()))
    }

    fn region_mut(&mut self, id: &str) -> Result<&mut Element> {
        self.root
            .find_by_id_mut(id)
            .ok_or_else(|| Error::MissingRegion(id.to_string()))
    }

    fn body_mut(&mut self) -> Result<&mut Element> {
        find_tag_mut(&mut self.root, "body").ok_or_else(|| Error::MissingRegion("body".to_string()))
    }

    /// Serialize the whole page, including the doctype.
    #[must_use]
    pub fn to_html(&self) -> String {
        format!("<!DOCTYPE html>\n{}\n", html::element_to_html(&self.root))
    }
}

impl Document for PageDocument {
    fn replace_children(&mut self, id: &str, nodes: Vec<Node>) -> Result<()> {
        self.region_mut(id)?.children = nodes;
        Ok(())
    }

    fn set_value(&mut self, id: &str, value: &str) -> Result<()> {
        let element = self.region_mut(id)?;
        match element.tag.as_str() {
            "input" => {
                element.set_attr("value", value);
                Ok(())
            }
            "select" => {
                for option in element.children.iter_mut().filter_map(|child| match child {
                    Node::Element(option) if option.tag == "option" => Some(option),
                    _ => None,
                }) {
                    if option.get_attr("value") == Some(value) {
                        option.set_attr("selected", "selected");
                    } else {
                        option.remove_attr("selected");
                    }
                }
                Ok(())
            }
            _ => Err(Error::NotAnInput(id.to_string())),
        }
    }

    fn set_text(&mut self, id: &str, text: &str) -> Result<()> {
        self.region_mut(id)?.children = vec![Node::text(text)];
        Ok(())
    }

    fn set_visible(&mut self, id: &str, visible: bool) -> Result<()> {
        let element = self.region_mut(id)?;
        if visible {
            element.remove_attr("hidden");
        } else {
            element.set_attr("hidden", "hidden");
        }
        Ok(())
    }

    fn add_body_class(&mut self, class: &str) -> Result<()> {
        self.body_mut()?.add_class(class);
        Ok(())
    }
}

fn find_tag_mut<'a>(element: &'a mut Element, tag: &str) -> Option<&'a mut Element> {
    if element.tag == tag {
        return Some(element);
    }
    element.children.iter_mut().find_map(|child| match child {
        Node::Element(child) => find_tag_mut(child, tag),
        Node::Text(_) => None,
    })
}

fn input(kind: &str, id: &str) -> Element {
    Element::new("input")
        .attr("type", kind)
        .attr("id", id)
        .attr("name", id)
}

fn select(id: &str, name: &str, options: &[SelectOption]) -> Element {
    Element::new("select")
        .attr("id", id)
        .attr("name", name)
        .children(options.iter().map(|option| {
            Element::new("option")
                .attr("value", option.value.clone())
                .text(option.label.clone())
                .into()
        }))
}

fn labelled(label: &str, control: Element) -> Element {
    Element::new("label").text(format!("{label} ")).child(control)
}

fn fieldset(legend: &str, content: Element) -> Element {
    Element::new("fieldset")
        .child(Element::new("legend").text(legend))
        .child(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_REGIONS: &[&str] = &[
        region::TIME,
        region::DATE,
        region::INTERVAL,
        region::LEVEL,
        region::TIMEZONE_OFFSET,
        region::INTERVAL_MATCH_COUNT,
        region::FILTER_MATCH_COUNT,
        region::DETAILED_FILTER,
        region::LOGGERS,
        region::MARKERS,
        region::NODES,
        region::APPLICATIONS,
        region::THREADS,
        region::MDC_FILTER,
        region::EVENTS,
    ];

    #[test]
    fn shell_has_every_region() {
        let doc = PageDocument::shell(&ViewConfig::default());
        for id in ALL_REGIONS {
            assert!(doc.region(id).is_ok(), "missing region {id}");
        }
    }

    #[test]
    fn shell_prefills_fixed_selects() {
        let config = ViewConfig::default();
        let doc = PageDocument::shell(&config);
        let interval = doc.region(region::INTERVAL).unwrap();
        assert_eq!(interval.child_elements().count(), config.interval_options.len());
        let level = doc.region(region::LEVEL).unwrap();
        assert_eq!(level.child_elements().next().unwrap().text_content(), "ERROR");
    }

    #[test]
    fn missing_region_is_an_error() {
        let mut doc = PageDocument::new(Element::new("body"));
        let err = doc.set_text("events", "x").unwrap_err();
        assert!(matches!(err, Error::MissingRegion(ref id) if id == "events"));
    }

    #[test]
    fn set_value_updates_inputs_and_selects() {
        let mut doc = PageDocument::shell(&ViewConfig::default());
        doc.set_value(region::TIME, "10:15").unwrap();
        assert_eq!(doc.region(region::TIME).unwrap().get_attr("value"), Some("10:15"));

        doc.set_value(region::LEVEL, "WARN").unwrap();
        let selected: Vec<_> = doc
            .region(region::LEVEL)
            .unwrap()
            .child_elements()
            .filter(|o| o.has_attr("selected"))
            .filter_map(|o| o.get_attr("value"))
            .collect();
        assert_eq!(selected, vec!["WARN"]);

        let err = doc.set_value(region::EVENTS, "x").unwrap_err();
        assert_eq!(err.error_type(), "NOT_AN_INPUT");
    }

    #[test]
    fn visibility_toggles_hidden_attribute() {
        let mut doc = PageDocument::shell(&ViewConfig::default());
        doc.set_visible(region::DETAILED_FILTER, false).unwrap();
        assert!(doc.region(region::DETAILED_FILTER).unwrap().has_attr("hidden"));
        doc.set_visible(region::DETAILED_FILTER, true).unwrap();
        assert!(!doc.region(region::DETAILED_FILTER).unwrap().has_attr("hidden"));
    }

    #[test]
    fn body_class_is_added_once() {
        let mut doc = PageDocument::shell(&ViewConfig::default());
        doc.add_body_class(DRAWER_OPEN_CLASS).unwrap();
        doc.add_body_class(DRAWER_OPEN_CLASS).unwrap();
        let body = doc.root().find_all("body")[0];
        assert_eq!(body.get_attr("class"), Some(DRAWER_OPEN_CLASS));
    }

    #[test]
    fn to_html_starts_with_doctype() {
        let html = PageDocument::shell(&ViewConfig::default()).to_html();
        assert!(html.starts_with("<!DOCTYPE html>\n<html>"));
        assert!(html.contains(r#"<div id="events" class="events"></div>"#));
    }
}
