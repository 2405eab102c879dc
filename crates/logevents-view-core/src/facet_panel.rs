//! Filter controls built from the server's facets.
//!
//! [`show_facets`] rebuilds every facet region from scratch, so rendering the same
//! input twice leaves the page exactly as one render would. Facet lists are sorted by
//! [`Facets::normalized`] before any node is built; the node builders below are pure
//! and can be tested without a page.

use tracing::debug;

use crate::codec::mdc_param;
use crate::config::{SelectOption, ViewConfig};
use crate::document::{DRAWER_OPEN_CLASS, Document, region};
use crate::dom::{Element, Node};
use crate::error::Result;
use crate::models::{Facets, Filter, FilterMode, MdcFacet};

/// Text of the disabled option separating a custom interval from the fixed list.
pub const INTERVAL_SEPARATOR: &str = "--------------";

/// Synchronize the filter controls with `filter` and rebuild the facet regions.
pub fn show_facets(
    doc: &mut impl Document,
    filter: &Filter,
    facets: &Facets,
    config: &ViewConfig,
) -> Result<()> {
    let facets = facets.normalized();

    doc.set_value(region::TIME, filter.time.as_deref().unwrap_or_default())?;
    doc.set_value(region::DATE, filter.date.as_deref().unwrap_or_default())?;
    doc.replace_children(
        region::INTERVAL,
        interval_options(&config.interval_options, filter.interval.as_deref()),
    )?;
    doc.replace_children(
        region::LEVEL,
        level_options(&config.level_options, filter.level.as_deref()),
    )?;
    if let Some(offset) = filter.timezone_offset {
        doc.set_value(region::TIMEZONE_OFFSET, &offset.to_string())?;
    }

    doc.set_text(region::INTERVAL_MATCH_COUNT, &count_text(facets.row_count))?;
    doc.set_text(region::FILTER_MATCH_COUNT, &count_text(facets.filtered_count))?;
    if facets.is_empty_interval() {
        doc.set_visible(region::DETAILED_FILTER, false)?;
        doc.add_body_class(DRAWER_OPEN_CLASS)?;
    } else {
        doc.set_visible(region::DETAILED_FILTER, true)?;
    }

    doc.replace_children(region::THREADS, vec![thread_select(&facets.threads).into()])?;

    let mut loggers: Vec<Node> = vec![mode_selector("includeLoggers", filter.include_loggers).into()];
    loggers.extend(facets.loggers.iter().map(|logger| {
        Node::from(checkbox(
            "logger",
            &logger.name,
            logger.display_name(),
            filter.is_selected("logger", &logger.name),
        ))
    }));
    doc.replace_children(region::LOGGERS, loggers)?;

    let mut markers: Vec<Node> = vec![mode_selector("includeMarkers", filter.include_markers).into()];
    markers.extend(checkboxes("marker", &facets.markers, filter));
    doc.replace_children(region::MARKERS, markers)?;

    doc.replace_children(region::NODES, checkboxes("node", &facets.nodes, filter).collect())?;
    doc.replace_children(
        region::APPLICATIONS,
        checkboxes("application", &facets.applications, filter).collect(),
    )?;

    doc.replace_children(
        region::MDC_FILTER,
        facets.mdc.iter().map(|entry| mdc_row(entry, filter).into()).collect(),
    )?;

    debug!(
        loggers = facets.loggers.len(),
        markers = facets.markers.len(),
        threads = facets.threads.len(),
        nodes = facets.nodes.len(),
        applications = facets.applications.len(),
        mdc_keys = facets.mdc.len(),
        row_count = ?facets.row_count,
        "rendered facets"
    );
    Ok(())
}

fn count_text(count: Option<u64>) -> String {
    count.map(|c| c.to_string()).unwrap_or_default()
}

fn option(value: &str, text: &str, selected: bool) -> Element {
    Element::new("option")
        .attr("value", value)
        .flag("selected", selected)
        .text(text)
}

/// Options of the interval select.
///
/// A filter interval outside the fixed list is kept: it is offered first and selected,
/// followed by a disabled separator.
#[must_use]
pub fn interval_options(fixed: &[SelectOption], current: Option<&str>) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(fixed.len() + 2);
    if let Some(custom) = current.filter(|c| !fixed.iter().any(|o| o.value == *c)) {
        nodes.push(option(custom, custom, true).into());
        nodes.push(
            Element::new("option")
                .flag("disabled", true)
                .text(INTERVAL_SEPARATOR)
                .into(),
        );
    }
    nodes.extend(
        fixed
            .iter()
            .map(|o| option(&o.value, &o.label, current == Some(o.value.as_str())).into()),
    );
    nodes
}

/// Options of the level select. Unknown levels select nothing.
#[must_use]
pub fn level_options(fixed: &[SelectOption], current: Option<&str>) -> Vec<Node> {
    fixed
        .iter()
        .map(|o| option(&o.value, &o.label, current == Some(o.value.as_str())).into())
        .collect()
}

/// The thread select: an empty "any thread" option followed by one option per thread.
#[must_use]
pub fn thread_select(threads: &[String]) -> Element {
    Element::new("select")
        .attr("name", "thread")
        .child(Element::new("option").attr("value", ""))
        .children(threads.iter().map(|t| option(t, t, false).into()))
}

/// The include/exclude select heading a facet list.
#[must_use]
pub fn mode_selector(name: &str, current: Option<FilterMode>) -> Element {
    Element::new("div").class("facetMode").child(
        Element::new("select")
            .attr("name", name)
            .children(
                FilterMode::ALL
                    .iter()
                    .map(|mode| option(mode.as_str(), mode.label(), current == Some(*mode)).into()),
            ),
    )
}

/// One labelled checkbox, checked when the filter selects `value`.
#[must_use]
pub fn checkbox(name: &str, value: &str, label: &str, checked: bool) -> Element {
    Element::new("div").child(
        Element::new("label")
            .child(
                Element::new("input")
                    .attr("type", "checkbox")
                    .attr("name", name)
                    .attr("value", value)
                    .flag("checked", checked),
            )
            .text(label),
    )
}

fn checkboxes<'a>(
    name: &'a str,
    values: &'a [String],
    filter: &'a Filter,
) -> impl Iterator<Item = Node> + 'a {
    values
        .iter()
        .map(move |value| checkbox(name, value, value, filter.is_selected(name, value)).into())
}

/// One MDC row: `<key>: ` with a select of the key's values.
#[must_use]
pub fn mdc_row(entry: &MdcFacet, filter: &Filter) -> Element {
    let current = filter.mdc.get(&entry.name);
    let select = Element::new("select")
        .attr("name", mdc_param(&entry.name))
        .child(Element::new("option").attr("value", ""))
        .children(
            entry
                .values
                .iter()
                .map(|v| option(v, v, current == Some(v.as_str())).into()),
        );
    Element::new("div").child(
        Element::new("label")
            .text(format!("{}: ", entry.name))
            .child(select),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PageDocument;
    use crate::models::{LoggerFacet, MdcFilter};
    use pretty_assertions::assert_eq;

    fn selected_values(nodes: &[Node]) -> Vec<String> {
        nodes
            .iter()
            .filter_map(Node::as_element)
            .filter(|o| o.has_attr("selected"))
            .map(Element::text_content)
            .collect()
    }

    fn option_texts(nodes: &[Node]) -> Vec<String> {
        nodes.iter().map(Node::text_content).collect()
    }

    #[test]
    fn known_interval_is_selected_without_synthesis() {
        let fixed = ViewConfig::default().interval_options;
        let nodes = interval_options(&fixed, Some("PT1H"));
        assert_eq!(nodes.len(), fixed.len());
        assert_eq!(selected_values(&nodes), vec!["1 hour"]);
    }

    #[test]
    fn unknown_interval_is_prepended_with_separator() {
        let fixed = ViewConfig::default().interval_options;
        let nodes = interval_options(&fixed, Some("CUSTOM"));
        assert_eq!(nodes.len(), fixed.len() + 2);
        let texts = option_texts(&nodes);
        assert_eq!(texts[0], "CUSTOM");
        assert_eq!(texts[1], INTERVAL_SEPARATOR);
        assert!(nodes[1].as_element().unwrap().has_attr("disabled"));
        assert_eq!(selected_values(&nodes), vec!["CUSTOM"]);
    }

    #[test]
    fn missing_interval_selects_nothing() {
        let fixed = ViewConfig::default().interval_options;
        let nodes = interval_options(&fixed, None);
        assert_eq!(nodes.len(), fixed.len());
        assert!(selected_values(&nodes).is_empty());
    }

    #[test]
    fn unknown_level_is_not_synthesized() {
        let fixed = ViewConfig::default().level_options;
        assert!(selected_values(&level_options(&fixed, Some("FATAL"))).is_empty());
        assert_eq!(selected_values(&level_options(&fixed, Some("WARN"))), vec!["WARN"]);
    }

    #[test]
    fn thread_select_starts_with_empty_option() {
        let select = thread_select(&["main".to_string(), "worker-1".to_string()]);
        let values: Vec<_> = select
            .child_elements()
            .map(|o| o.get_attr("value").unwrap_or_default().to_string())
            .collect();
        assert_eq!(values, vec!["", "main", "worker-1"]);
        assert!(select.child_elements().all(|o| !o.has_attr("selected")));
    }

    #[test]
    fn mode_selector_reflects_filter_mode() {
        let selector = mode_selector("includeMarkers", Some(FilterMode::Exclude));
        let select = selector.find_all("select")[0];
        assert_eq!(select.get_attr("name"), Some("includeMarkers"));
        let selected: Vec<_> = select
            .child_elements()
            .filter(|o| o.has_attr("selected"))
            .filter_map(|o| o.get_attr("value"))
            .collect();
        assert_eq!(selected, vec!["exclude"]);

        let unset = mode_selector("includeLoggers", None);
        assert!(unset.find_all("option").iter().all(|o| !o.has_attr("selected")));
    }

    #[test]
    fn mdc_row_selects_current_value() {
        let entry = MdcFacet {
            name: "user".into(),
            values: vec!["alice".into(), "bob".into()],
        };
        let filter = Filter {
            mdc: MdcFilter::from_iter([("user", "bob")]),
            ..Filter::default()
        };
        let row = mdc_row(&entry, &filter);
        assert_eq!(row.text_content(), "user: alicebob");
        let select = row.find_all("select")[0];
        assert_eq!(select.get_attr("name"), Some("mdc[user]"));
        let options = select.find_all("option");
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].get_attr("value"), Some(""));
        assert!(options[2].has_attr("selected"));
        assert!(!options[1].has_attr("selected"));
    }

    #[test]
    fn show_facets_checks_selected_loggers_in_sorted_order() {
        let mut doc = PageDocument::shell(&ViewConfig::default());
        let filter = Filter {
            loggers: vec!["com.example.Foo".into()],
            ..Filter::default()
        };
        let facets = Facets {
            row_count: Some(3),
            filtered_count: Some(1),
            loggers: vec![
                LoggerFacet { name: "org.example.Bar".into(), abbreviated_name: Some("o.e.Bar".into()) },
                LoggerFacet { name: "com.example.Foo".into(), abbreviated_name: None },
            ],
            ..Facets::default()
        };
        show_facets(&mut doc, &filter, &facets, &ViewConfig::default()).unwrap();

        let loggers = doc.region(region::LOGGERS).unwrap();
        let boxes = loggers
            .find_all("input")
            .into_iter()
            .map(|i| (i.get_attr("value").unwrap_or_default(), i.has_attr("checked")))
            .collect::<Vec<_>>();
        assert_eq!(boxes, vec![("com.example.Foo", true), ("org.example.Bar", false)]);
        assert!(loggers.text_content().ends_with("com.example.Fooo.e.Bar"));
    }

    #[test]
    fn show_facets_sets_window_inputs() {
        let mut doc = PageDocument::shell(&ViewConfig::default());
        let filter = Filter {
            time: Some("10:15".into()),
            timezone_offset: Some(-60),
            ..Filter::default()
        };
        show_facets(&mut doc, &filter, &Facets::default(), &ViewConfig::default()).unwrap();
        assert_eq!(doc.region(region::TIME).unwrap().get_attr("value"), Some("10:15"));
        assert_eq!(doc.region(region::DATE).unwrap().get_attr("value"), Some(""));
        assert_eq!(
            doc.region(region::TIMEZONE_OFFSET).unwrap().get_attr("value"),
            Some("-60")
        );
    }

    #[test]
    fn missing_counts_render_empty_and_keep_filter_visible() {
        let mut doc = PageDocument::shell(&ViewConfig::default());
        show_facets(&mut doc, &Filter::default(), &Facets::default(), &ViewConfig::default())
            .unwrap();
        assert_eq!(doc.region(region::INTERVAL_MATCH_COUNT).unwrap().text_content(), "");
        assert!(!doc.region(region::DETAILED_FILTER).unwrap().has_attr("hidden"));
    }

    #[test]
    fn empty_facets_render_only_static_controls() {
        let mut doc = PageDocument::shell(&ViewConfig::default());
        show_facets(&mut doc, &Filter::default(), &Facets::default(), &ViewConfig::default())
            .unwrap();
        assert!(doc.region(region::NODES).unwrap().children.is_empty());
        assert!(doc.region(region::MDC_FILTER).unwrap().children.is_empty());
        assert_eq!(doc.region(region::LOGGERS).unwrap().find_all("input").len(), 0);
        assert_eq!(doc.region(region::LOGGERS).unwrap().find_all("select").len(), 1);
        assert_eq!(doc.region(region::THREADS).unwrap().find_all("option").len(), 1);
    }
}
