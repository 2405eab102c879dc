//! Typed element tree.
//!
//! Renderers describe their output as [`Node`] values instead of HTML strings. A
//! [`crate::document::Document`] then materializes the nodes into a real or in-memory
//! page, and tests assert on the tree directly.

/// A node of the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    #[must_use]
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// Concatenated text of this node and all its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    // ── Builders ────────────────────────────────────────────────────────

    #[must_use]
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set a boolean attribute (`checked`, `selected`, `disabled`) when `on`.
    #[must_use]
    pub fn flag(self, name: &str, on: bool) -> Self {
        if on { self.attr(name, name) } else { self }
    }

    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    #[must_use]
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    // ── Mutation ────────────────────────────────────────────────────────

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
        } else {
            self.attributes.push((name.to_string(), value));
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attributes.retain(|(n, _)| n != name);
    }

    pub fn add_class(&mut self, class: &str) {
        if class.is_empty() || self.has_class(class) {
            return;
        }
        let classes = match self.get_attr("class") {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr("class", classes);
    }

    // ── Queries ─────────────────────────────────────────────────────────

    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_some()
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get_attr("id")
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    #[must_use]
    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }

    /// Direct element children, skipping text nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// All descendant elements in document order, excluding `self`.
    #[must_use]
    pub fn descendants(&self) -> Vec<&Self> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, out: &mut Vec<&'a Self>) {
        for child in self.child_elements() {
            out.push(child);
            child.collect_descendants(out);
        }
    }

    /// Descendants with the given tag name.
    #[must_use]
    pub fn find_all(&self, tag: &str) -> Vec<&Self> {
        self.descendants()
            .into_iter()
            .filter(|e| e.tag == tag)
            .collect()
    }

    /// This element or the first descendant with the given id.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Self> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.child_elements().find_map(|child| child.find_by_id(id))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Self> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| match child {
            Node::Element(element) => element.find_by_id_mut(id),
            Node::Text(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("div")
            .attr("id", "root")
            .child(
                Element::new("ul")
                    .attr("id", "list")
                    .child(Element::new("li").text("one"))
                    .child(Element::new("li").text("two")),
            )
            .text(" tail")
    }

    #[test]
    fn set_attr_replaces_existing_value() {
        let mut el = Element::new("input").attr("value", "a");
        el.set_attr("value", "b");
        assert_eq!(el.attributes, vec![("value".to_string(), "b".to_string())]);
        el.remove_attr("value");
        assert!(!el.has_attr("value"));
    }

    #[test]
    fn flag_only_sets_when_on() {
        let on = Element::new("option").flag("selected", true);
        let off = Element::new("option").flag("selected", false);
        assert_eq!(on.get_attr("selected"), Some("selected"));
        assert!(!off.has_attr("selected"));
    }

    #[test]
    fn classes_are_deduplicated() {
        let el = Element::new("span").class("a").class("b").class("a").class("");
        assert_eq!(el.get_attr("class"), Some("a b"));
        assert!(el.has_class("b"));
        assert!(!el.has_class("c"));
    }

    #[test]
    fn text_content_concatenates_descendants() {
        assert_eq!(sample().text_content(), "onetwo tail");
    }

    #[test]
    fn finds_by_id_and_tag() {
        let root = sample();
        assert_eq!(root.find_by_id("root").map(|e| e.tag.as_str()), Some("div"));
        assert_eq!(root.find_by_id("list").map(|e| e.tag.as_str()), Some("ul"));
        assert!(root.find_by_id("missing").is_none());
        assert_eq!(root.find_all("li").len(), 2);
        assert_eq!(root.descendants().len(), 3);
    }

    #[test]
    fn find_by_id_mut_allows_in_place_edits() {
        let mut root = sample();
        root.find_by_id_mut("list").unwrap().children.clear();
        assert_eq!(root.text_content(), " tail");
    }
}
