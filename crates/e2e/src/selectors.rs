//! Mapping from the names used in scenarios to page selectors

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{E2eError, E2eResult};

/// How an element is located on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// Match the `id` attribute exactly
    #[serde(rename = "id")]
    Id(String),
    /// CSS selector
    #[serde(rename = "css")]
    Css(String),
    /// XPath expression
    #[serde(rename = "xpath")]
    XPath(String),
}

impl Selector {
    pub fn id(id: impl Into<String>) -> Self {
        Selector::Id(id.into())
    }

    /// CSS form of this selector, if one exists
    pub fn to_css(&self) -> Option<String> {
        match self {
            Selector::Id(id) => Some(format!("[id={}]", js_string(id))),
            Selector::Css(css) => Some(css.clone()),
            Selector::XPath(_) => None,
        }
    }

    /// JavaScript expression evaluating to the element or `null`
    pub fn to_js(&self) -> String {
        match self {
            Selector::Id(id) => format!("document.getElementById({})", js_string(id)),
            Selector::Css(css) => format!("document.querySelector({})", js_string(css)),
            Selector::XPath(xpath) => format!(
                "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
                js_string(xpath)
            ),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Id(id) => write!(f, "#{}", id),
            Selector::Css(css) => write!(f, "css={}", css),
            Selector::XPath(xpath) => write!(f, "xpath={}", xpath),
        }
    }
}

/// Quote a string as a JavaScript literal
pub fn js_string(s: &str) -> String {
    // serializing a &str cannot fail
    serde_json::to_string(s).unwrap_or_else(|_| String::from("\"\""))
}

/// Logical page, field and button names mapped to locations on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorMap {
    /// Page name to path relative to the base URL
    pub pages: BTreeMap<String, String>,

    /// Form fields and dropdowns
    pub fields: BTreeMap<String, Selector>,

    /// Buttons
    pub buttons: BTreeMap<String, Selector>,

    /// Element holding the status message
    pub message: Selector,

    /// Element listing search results
    pub results: Selector,
}

impl Default for SelectorMap {
    fn default() -> Self {
        let fields = [
            ("Id", "product_id"),
            ("Name", "product_name"),
            ("Description", "product_description"),
            ("Price", "product_price"),
            ("Available", "product_available"),
            ("Category", "product_category"),
        ];
        let buttons = [
            ("Create", "create-btn"),
            ("Retrieve", "retrieve-btn"),
            ("Update", "update-btn"),
            ("Delete", "delete-btn"),
            ("Search", "search-btn"),
            ("Clear", "clear-btn"),
        ];

        Self {
            pages: BTreeMap::from([("Home Page".to_string(), "/".to_string())]),
            fields: fields
                .into_iter()
                .map(|(name, id)| (name.to_string(), Selector::id(id)))
                .collect(),
            buttons: buttons
                .into_iter()
                .map(|(name, id)| (name.to_string(), Selector::id(id)))
                .collect(),
            message: Selector::id("flash_message"),
            results: Selector::id("search_results"),
        }
    }
}

impl SelectorMap {
    /// Path of a named page
    pub fn page(&self, name: &str) -> E2eResult<&str> {
        self.pages
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| unknown("page", name))
    }

    /// Selector of a named field or dropdown
    pub fn field(&self, name: &str) -> E2eResult<&Selector> {
        self.fields.get(name).ok_or_else(|| unknown("field", name))
    }

    /// Selector of a named button
    pub fn button(&self, name: &str) -> E2eResult<&Selector> {
        self.buttons.get(name).ok_or_else(|| unknown("button", name))
    }

    /// Overlay entries from `other` on top of this map
    pub fn merge(&mut self, other: SelectorMap) {
        self.pages.extend(other.pages);
        self.fields.extend(other.fields);
        self.buttons.extend(other.buttons);
        self.message = other.message;
        self.results = other.results;
    }
}

fn unknown(kind: &'static str, name: &str) -> E2eError {
    E2eError::UnknownElement {
        kind,
        name: name.to_string(),
    }
}
