//! In-memory stand-in for the product administration page

#![allow(dead_code)]

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use catalog_e2e::{E2eError, E2eResult, Selector, WebPage};

pub const TITLE: &str = "Product Catalog Administration";

const INPUTS: [&str; 4] = ["product_id", "product_name", "product_description", "product_price"];
const CATEGORIES: [&str; 6] = ["Unknown", "Cloths", "Food", "Housewares", "Automotive", "Tools"];

#[derive(Debug, Clone)]
struct Row {
    id: u32,
    name: String,
    description: String,
    price: String,
    available: usize,
    category: usize,
}

struct Pending {
    id: String,
    text: String,
    reads_left: usize,
}

#[derive(Default)]
struct State {
    url: String,
    inputs: BTreeMap<String, String>,
    selects: BTreeMap<String, (Vec<String>, usize)>,
    texts: BTreeMap<String, String>,
    rows: Vec<Row>,
    next_id: u32,
    clicks: Vec<String>,
    pending: Option<Pending>,
}

/// A product form backed by an in-memory catalog.
///
/// Only `Selector::Id` is understood; buttons behave like the real page's
/// Create, Retrieve, Update, Delete, Search and Clear.
pub struct FakePage {
    state: Mutex<State>,
}

impl FakePage {
    pub fn product_form() -> Self {
        let mut state = State::default();
        for id in INPUTS {
            state.inputs.insert(id.to_string(), String::new());
        }
        state.selects.insert(
            "product_available".to_string(),
            (vec!["True".to_string(), "False".to_string()], 0),
        );
        state.selects.insert(
            "product_category".to_string(),
            (CATEGORIES.iter().map(|c| c.to_string()).collect(), 0),
        );
        state.texts.insert("flash_message".to_string(), String::new());
        state.texts.insert("search_results".to_string(), String::new());
        Self {
            state: Mutex::new(state),
        }
    }

    /// Add a product to the catalog behind the page
    pub fn seed(&self, name: &str, category: &str, available: bool) {
        let mut state = self.state.lock();
        state.next_id += 1;
        let row = Row {
            id: state.next_id,
            name: name.to_string(),
            description: format!("A {}", name.to_lowercase()),
            price: "10.00".to_string(),
            available: if available { 0 } else { 1 },
            category: CATEGORIES.iter().position(|c| *c == category).unwrap_or(0),
        };
        state.rows.push(row);
    }

    /// Make `text` appear in element `id` after it has been read `reads` times
    pub fn show_text_after(&self, id: &str, text: &str, reads: usize) {
        self.state.lock().pending = Some(Pending {
            id: id.to_string(),
            text: text.to_string(),
            reads_left: reads,
        });
    }

    pub fn set_text(&self, id: &str, text: &str) {
        self.state.lock().texts.insert(id.to_string(), text.to_string());
    }

    pub fn input(&self, id: &str) -> String {
        self.state.lock().inputs.get(id).cloned().unwrap_or_default()
    }

    pub fn url(&self) -> String {
        self.state.lock().url.clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().clicks.clone()
    }
}

fn id_of(selector: &Selector) -> E2eResult<&str> {
    match selector {
        Selector::Id(id) => Ok(id.as_str()),
        other => Err(E2eError::ElementNotFound(other.to_string())),
    }
}

fn missing(selector: &Selector) -> E2eError {
    E2eError::ElementNotFound(selector.to_string())
}

impl State {
    fn message(&mut self, text: &str) {
        self.texts.insert("flash_message".to_string(), text.to_string());
    }

    fn selected(&self, id: &str) -> usize {
        self.selects.get(id).map(|(_, i)| *i).unwrap_or(0)
    }

    fn set_selected(&mut self, id: &str, index: usize) {
        if let Some((_, i)) = self.selects.get_mut(id) {
            *i = index;
        }
    }

    fn form_row(&self, id: u32) -> Row {
        Row {
            id,
            name: self.inputs["product_name"].clone(),
            description: self.inputs["product_description"].clone(),
            price: self.inputs["product_price"].clone(),
            available: self.selected("product_available"),
            category: self.selected("product_category"),
        }
    }

    fn fill_form(&mut self, row: &Row) {
        self.inputs.insert("product_id".into(), row.id.to_string());
        self.inputs.insert("product_name".into(), row.name.clone());
        self.inputs.insert("product_description".into(), row.description.clone());
        self.inputs.insert("product_price".into(), row.price.clone());
        self.set_selected("product_available", row.available);
        self.set_selected("product_category", row.category);
    }

    fn current_id(&self) -> Option<u32> {
        self.inputs["product_id"].trim().parse().ok()
    }

    fn press(&mut self, button: &str) -> bool {
        match button {
            "clear-btn" => {
                for value in self.inputs.values_mut() {
                    value.clear();
                }
                for (_, index) in self.selects.values_mut() {
                    *index = 0;
                }
                self.message("");
            }
            "create-btn" => {
                self.next_id += 1;
                let row = self.form_row(self.next_id);
                self.inputs.insert("product_id".into(), row.id.to_string());
                self.rows.push(row);
                self.message("Success");
            }
            "retrieve-btn" => {
                let found = self
                    .current_id()
                    .and_then(|id| self.rows.iter().find(|r| r.id == id).cloned());
                match found {
                    Some(row) => {
                        self.fill_form(&row);
                        self.message("Success");
                    }
                    None => self.message("404 Not Found"),
                }
            }
            "update-btn" => match self.current_id() {
                Some(id) if self.rows.iter().any(|r| r.id == id) => {
                    let updated = self.form_row(id);
                    for row in self.rows.iter_mut().filter(|r| r.id == id) {
                        *row = updated.clone();
                    }
                    self.message("Success");
                }
                _ => self.message("404 Not Found"),
            },
            "delete-btn" => {
                if let Some(id) = self.current_id() {
                    self.rows.retain(|r| r.id != id);
                }
                self.message("Product has been Deleted!");
            }
            "search-btn" => {
                let name = self.inputs["product_name"].clone();
                let names: Vec<String> = self
                    .rows
                    .iter()
                    .filter(|r| name.is_empty() || r.name == name)
                    .map(|r| r.name.clone())
                    .collect();
                self.texts.insert("search_results".into(), names.join("\n"));
                self.message("Success");
            }
            _ => return false,
        }
        true
    }
}

#[async_trait]
impl WebPage for FakePage {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        self.state.lock().url = url.to_string();
        Ok(())
    }

    async fn title(&self) -> E2eResult<String> {
        Ok(TITLE.to_string())
    }

    async fn source(&self) -> E2eResult<String> {
        let state = self.state.lock();
        Ok(format!("<html><title>{}</title><div>{}</div></html>", TITLE, state.texts["flash_message"]))
    }

    async fn is_present(&self, selector: &Selector) -> E2eResult<bool> {
        let Ok(id) = id_of(selector) else {
            return Ok(false);
        };
        let state = self.state.lock();
        Ok(state.inputs.contains_key(id) || state.selects.contains_key(id) || state.texts.contains_key(id))
    }

    async fn value(&self, selector: &Selector) -> E2eResult<String> {
        let id = id_of(selector)?;
        let state = self.state.lock();
        if let Some(value) = state.inputs.get(id) {
            return Ok(value.clone());
        }
        if let Some((options, index)) = state.selects.get(id) {
            return Ok(options[*index].clone());
        }
        Err(missing(selector))
    }

    async fn clear(&self, selector: &Selector) -> E2eResult<()> {
        let id = id_of(selector)?;
        let mut state = self.state.lock();
        match state.inputs.get_mut(id) {
            Some(value) => {
                value.clear();
                Ok(())
            }
            None => Err(missing(selector)),
        }
    }

    async fn type_text(&self, selector: &Selector, text: &str) -> E2eResult<()> {
        let id = id_of(selector)?;
        let mut state = self.state.lock();
        match state.inputs.get_mut(id) {
            Some(value) => {
                value.push_str(text);
                Ok(())
            }
            None => Err(missing(selector)),
        }
    }

    async fn click(&self, selector: &Selector) -> E2eResult<()> {
        let id = id_of(selector)?;
        let mut state = self.state.lock();
        state.clicks.push(id.to_string());
        if state.press(id) {
            Ok(())
        } else {
            Err(missing(selector))
        }
    }

    async fn text(&self, selector: &Selector) -> E2eResult<String> {
        let id = id_of(selector)?;
        let mut state = self.state.lock();

        let mut reveal = None;
        if let Some(pending) = state.pending.as_mut().filter(|p| p.id == id) {
            if pending.reads_left == 0 {
                reveal = Some(pending.text.clone());
            } else {
                pending.reads_left -= 1;
            }
        }
        if let Some(text) = reveal {
            state.pending = None;
            state.texts.insert(id.to_string(), text);
        }

        if let Some(text) = state.texts.get(id) {
            return Ok(text.clone());
        }
        if let Some((options, _)) = state.selects.get(id) {
            return Ok(options.join("\n"));
        }
        Err(missing(selector))
    }

    async fn select_by_text(&self, selector: &Selector, text: &str) -> E2eResult<()> {
        let id = id_of(selector)?;
        let mut state = self.state.lock();
        let (options, index) = state.selects.get_mut(id).ok_or_else(|| missing(selector))?;
        let position = options
            .iter()
            .position(|o| o == text)
            .ok_or_else(|| E2eError::OptionNotFound {
                selector: selector.to_string(),
                option: text.to_string(),
            })?;
        *index = position;
        Ok(())
    }

    async fn selected_text(&self, selector: &Selector) -> E2eResult<String> {
        let id = id_of(selector)?;
        let state = self.state.lock();
        let (options, index) = state.selects.get(id).ok_or_else(|| missing(selector))?;
        Ok(options[*index].clone())
    }

    async fn screenshot(&self) -> E2eResult<Vec<u8>> {
        // PNG signature is enough for callers that only persist the bytes
        Ok(vec![0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'])
    }
}
