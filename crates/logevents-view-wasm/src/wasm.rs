//! WASM-specific implementation using wasm-bindgen.
//!
//! This module provides the JavaScript-facing API and the [`Document`] backed by the
//! browser DOM.

use logevents_view_core::dom::{Element as TreeElement, Node as TreeNode};
use logevents_view_core::{Document, Error, Filter, Result, ViewConfig, codec};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{FormData, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement, console};

use crate::{ViewState, error_message, filter_from_form, filter_from_json, location_hash};

// ──────────────────────────────────────────────────────────────────────────────
// Initialization
// ──────────────────────────────────────────────────────────────────────────────

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn wasm_init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console-panic")]
    console_error_panic_hook::set_once();

    console::log_1(&"LogEvents view WASM initialized".into());
}

fn to_js(err: &Error) -> JsValue {
    JsValue::from_str(&error_message(err))
}

fn dom_error(err: &JsValue) -> Error {
    Error::Dom(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

// ──────────────────────────────────────────────────────────────────────────────
// Browser document
// ──────────────────────────────────────────────────────────────────────────────

/// [`Document`] over the live page.
pub struct BrowserDocument {
    document: web_sys::Document,
}

impl BrowserDocument {
    fn current() -> std::result::Result<Self, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;
        Ok(Self { document })
    }

    fn region(&self, id: &str) -> Result<web_sys::Element> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| Error::MissingRegion(id.to_string()))
    }

    fn build(&self, node: &TreeNode) -> Result<web_sys::Node> {
        match node {
            TreeNode::Text(text) => Ok(self.document.create_text_node(text).into()),
            TreeNode::Element(element) => self.build_element(element).map(Into::into),
        }
    }

    fn build_element(&self, element: &TreeElement) -> Result<web_sys::Element> {
        let el = self
            .document
            .create_element(&element.tag)
            .map_err(|e| dom_error(&e))?;
        for (name, value) in &element.attributes {
            el.set_attribute(name, value).map_err(|e| dom_error(&e))?;
        }
        for child in &element.children {
            el.append_child(&self.build(child)?)
                .map_err(|e| dom_error(&e))?;
        }
        Ok(el)
    }
}

impl Document for BrowserDocument {
    fn replace_children(&mut self, id: &str, nodes: Vec<TreeNode>) -> Result<()> {
        let region = self.region(id)?;
        while let Some(child) = region.first_child() {
            region.remove_child(&child).map_err(|e| dom_error(&e))?;
        }
        for node in &nodes {
            region
                .append_child(&self.build(node)?)
                .map_err(|e| dom_error(&e))?;
        }
        Ok(())
    }

    fn set_value(&mut self, id: &str, value: &str) -> Result<()> {
        let region = self.region(id)?;
        if let Some(input) = region.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(select) = region.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        } else {
            return Err(Error::NotAnInput(id.to_string()));
        }
        Ok(())
    }

    fn set_text(&mut self, id: &str, text: &str) -> Result<()> {
        self.region(id)?.set_text_content(Some(text));
        Ok(())
    }

    fn set_visible(&mut self, id: &str, visible: bool) -> Result<()> {
        let region = self.region(id)?;
        let element = region
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| Error::Dom(format!("#{id} is not an HTML element")))?;
        element.set_hidden(!visible);
        Ok(())
    }

    fn add_body_class(&mut self, class: &str) -> Result<()> {
        let body = self
            .document
            .body()
            .ok_or_else(|| Error::MissingRegion("body".to_string()))?;
        body.class_list().add_1(class).map_err(|e| dom_error(&e))
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// Main Application
// ──────────────────────────────────────────────────────────────────────────────

/// LogEvents dashboard view for the browser.
///
/// # Example
///
/// ```javascript
/// const view = LogEventsView.from_config('{"sourceLinkTarget": "_blank"}');
/// view.show_payload(await (await fetch(url)).text());
/// form.addEventListener('submit', (e) => { e.preventDefault(); view.apply_form('filter'); });
/// ```
#[wasm_bindgen]
pub struct LogEventsView {
    state: ViewState,
    document: BrowserDocument,
}

#[wasm_bindgen]
impl LogEventsView {
    /// Create a view with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> std::result::Result<LogEventsView, JsValue> {
        Ok(Self {
            state: ViewState::new(ViewConfig::default()),
            document: BrowserDocument::current()?,
        })
    }

    /// Create with full configuration.
    #[wasm_bindgen]
    pub fn from_config(config_json: &str) -> std::result::Result<LogEventsView, JsValue> {
        Ok(Self {
            state: ViewState::from_config_json(config_json).map_err(|e| to_js(&e))?,
            document: BrowserDocument::current()?,
        })
    }

    /// The filter described by the current location, as a plain object.
    #[wasm_bindgen]
    pub fn current_filter(&self) -> std::result::Result<JsValue, JsValue> {
        let filter = current_location_filter()?;
        serde_wasm_bindgen::to_value(&filter).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Render the facets JSON for the current location.
    #[wasm_bindgen]
    pub fn show_facets(&mut self, facets_json: &str) -> std::result::Result<(), JsValue> {
        let filter = current_location_filter()?;
        self.state
            .show_facets(&mut self.document, &filter, facets_json)
            .map_err(|e| to_js(&e))
    }

    /// Render the events JSON for the current location.
    #[wasm_bindgen]
    pub fn show_events(&mut self, events_json: &str) -> std::result::Result<(), JsValue> {
        let filter = current_location_filter()?;
        self.state
            .show_events(&mut self.document, &filter, events_json)
            .map_err(|e| to_js(&e))
    }

    /// Render a combined `{facets, events}` response.
    #[wasm_bindgen]
    pub fn show_payload(&mut self, payload_json: &str) -> std::result::Result<(), JsValue> {
        let filter = current_location_filter()?;
        self.state
            .show_payload(&mut self.document, &filter, payload_json)
            .map_err(|e| to_js(&e))?;
        console::log_1(&"Dashboard rendered".into());
        Ok(())
    }

    /// Read the filter form and write it to `location.hash`.
    ///
    /// Returns the new hash. File inputs are ignored.
    #[wasm_bindgen]
    pub fn apply_form(&self, form_id: &str) -> std::result::Result<String, JsValue> {
        let form: HtmlFormElement = self
            .document
            .region(form_id)
            .map_err(|e| to_js(&e))?
            .dyn_into()
            .map_err(|_| "Element is not a form")?;
        let data = FormData::new_with_form(&form)?;

        let mut pairs = Vec::new();
        let entries = js_sys::try_iter(&data)?.ok_or("FormData is not iterable")?;
        for entry in entries {
            let entry = js_sys::Array::from(&entry?);
            if let (Some(key), Some(value)) = (entry.get(0).as_string(), entry.get(1).as_string()) {
                pairs.push((key, value));
            }
        }

        let hash = location_hash(&filter_from_form(pairs));
        let window = web_sys::window().ok_or("No window")?;
        window.location().set_hash(&hash)?;
        console::log_1(&format!("Filter applied: {hash}").into());
        Ok(hash)
    }
}

fn current_location_filter() -> std::result::Result<Filter, JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let location = window.location();
    Ok(codec::parse_location(&location.search()?, &location.hash()?))
}

// ──────────────────────────────────────────────────────────────────────────────
// Free functions
// ──────────────────────────────────────────────────────────────────────────────

/// Parse a query string or fragment into a filter object.
#[wasm_bindgen]
pub fn parse_filter(query: &str) -> std::result::Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&codec::parse(query)).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Serialize a filter object, given as JSON, to its canonical query form.
#[wasm_bindgen]
pub fn serialize_filter(filter_json: &str) -> std::result::Result<String, JsValue> {
    let filter = filter_from_json(filter_json).map_err(|e| to_js(&e))?;
    Ok(codec::serialize(&filter))
}

/// Crate version, for the page footer.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
