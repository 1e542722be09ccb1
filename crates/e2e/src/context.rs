//! Per-scenario state and the actions behind each step phrase

use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use catalog_common::{LoadSummary, Product, ProductClient};

use crate::browser::WebPage;
use crate::clipboard::Clipboard;
use crate::config::E2eConfig;
use crate::error::{E2eError, E2eResult};
use crate::selectors::{Selector, SelectorMap};
use crate::wait::wait_until;

/// Which property of an element a text check reads
#[derive(Debug, Clone, Copy)]
enum Read {
    Value,
    Text,
}

/// Everything one scenario needs: the page, where the application lives,
/// how long to wait, how to find things, and the clipboard
pub struct ScenarioContext {
    page: Arc<dyn WebPage>,
    base_url: String,
    wait: Duration,
    selectors: SelectorMap,
    screenshot_dir: PathBuf,
    clipboard: Clipboard,
}

impl fmt::Debug for ScenarioContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioContext")
            .field("base_url", &self.base_url)
            .field("wait", &self.wait)
            .field("clipboard", &self.clipboard)
            .finish_non_exhaustive()
    }
}

impl ScenarioContext {
    pub fn new(page: Arc<dyn WebPage>, config: &E2eConfig) -> Self {
        Self {
            page,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            wait: config.wait_timeout(),
            selectors: config.selectors.clone(),
            screenshot_dir: config.screenshot_dir.clone(),
            clipboard: Clipboard::new(),
        }
    }

    /// Override the wait ceiling
    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    // Fixtures

    /// Replace the catalog contents with `products`
    pub async fn load_products(&self, products: &[Product]) -> E2eResult<LoadSummary> {
        let client = ProductClient::new(&self.base_url)?;
        Ok(client.load_fixtures(products).await?)
    }

    /// Replace the catalog contents with the rows of a scenario table
    pub async fn load_product_table(&self, rows: &[Vec<String>]) -> E2eResult<LoadSummary> {
        let products = Product::from_table(rows)?;
        self.load_products(&products).await
    }

    // Navigation

    pub async fn visit(&self, page_name: &str) -> E2eResult<()> {
        let path = self.selectors.page(page_name)?;
        let url = self.url(path);
        info!("Visiting {} ({})", page_name, url);
        self.page.goto(&url).await
    }

    pub async fn assert_title_contains(&self, text: &str) -> E2eResult<()> {
        let title = self.page.title().await?;
        if title.contains(text) {
            Ok(())
        } else {
            Err(E2eError::mismatch("title", text, &title))
        }
    }

    /// The page source must not contain `text`
    pub async fn assert_page_lacks(&self, text: &str) -> E2eResult<()> {
        let source = self.page.source().await?;
        if source.contains(text) {
            Err(E2eError::AssertionFailed(format!(
                "unexpected \"{}\" on the page",
                text
            )))
        } else {
            Ok(())
        }
    }

    // Form input

    /// Clear a field and type `value` into it
    pub async fn set_field(&self, field: &str, value: &str) -> E2eResult<()> {
        let selector = self.selectors.field(field)?;
        self.page.clear(selector).await?;
        if !value.is_empty() {
            self.page.type_text(selector, value).await?;
        }
        Ok(())
    }

    pub async fn select_option(&self, dropdown: &str, option: &str) -> E2eResult<()> {
        let selector = self.selectors.field(dropdown)?;
        self.page.select_by_text(selector, option).await
    }

    pub async fn press_button(&self, button: &str) -> E2eResult<()> {
        let selector = self.selectors.button(button)?;
        self.page.click(selector).await
    }

    /// Copy a field's value into the clipboard
    pub async fn copy_field(&mut self, field: &str) -> E2eResult<()> {
        let selector = self.selectors.field(field)?.clone();
        self.wait_for_presence(&selector).await?;
        let value = self.page.value(&selector).await?;
        self.clipboard.copy(value);
        Ok(())
    }

    /// Replace a field's value with the clipboard contents
    pub async fn paste_field(&self, field: &str) -> E2eResult<()> {
        let selector = self.selectors.field(field)?;
        let value = self.clipboard.paste()?;
        self.wait_for_presence(selector).await?;
        self.page.clear(selector).await?;
        if !value.is_empty() {
            self.page.type_text(selector, value).await?;
        }
        Ok(())
    }

    // Assertions

    pub async fn assert_message(&self, message: &str) -> E2eResult<()> {
        let selector = &self.selectors.message;
        self.wait_for_contains(selector, "message", message, Read::Text)
            .await
    }

    pub async fn assert_field_empty(&self, field: &str) -> E2eResult<()> {
        let selector = self.selectors.field(field)?;
        let value = self.page.value(selector).await?;
        if value.is_empty() {
            Ok(())
        } else {
            Err(E2eError::mismatch(&format!("{} field", field), "", &value))
        }
    }

    /// Wait for the field's value to contain `expected`
    pub async fn assert_field_value(&self, field: &str, expected: &str) -> E2eResult<()> {
        let selector = self.selectors.field(field)?;
        self.wait_for_contains(selector, &format!("{} field", field), expected, Read::Value)
            .await
    }

    /// The dropdown's selected option must read exactly `expected`
    pub async fn assert_dropdown(&self, dropdown: &str, expected: &str) -> E2eResult<()> {
        let selector = self.selectors.field(dropdown)?;
        let selected = self.page.selected_text(selector).await?;
        if selected == expected {
            Ok(())
        } else {
            Err(E2eError::mismatch(&format!("{} dropdown", dropdown), expected, &selected))
        }
    }

    pub async fn assert_in_results(&self, name: &str) -> E2eResult<()> {
        let selector = &self.selectors.results;
        self.wait_for_contains(selector, "results", name, Read::Text)
            .await
    }

    pub async fn assert_not_in_results(&self, name: &str) -> E2eResult<()> {
        let results = self.page.text(&self.selectors.results).await?;
        if results.contains(name) {
            Err(E2eError::AssertionFailed(format!(
                "\"{}\" should not be in the results",
                name
            )))
        } else {
            Ok(())
        }
    }

    /// Every name must appear in the results
    pub async fn assert_all_in_results<S: AsRef<str>>(&self, names: &[S]) -> E2eResult<()> {
        for name in names {
            self.assert_in_results(name.as_ref()).await?;
        }
        Ok(())
    }

    /// Every product named in a scenario table must appear in the results.
    ///
    /// Only the first row may be a `name` header; later rows are names.
    pub async fn assert_results_table(&self, rows: &[Vec<String>]) -> E2eResult<()> {
        let names = table_names(rows);
        self.assert_all_in_results(names.as_slice()).await
    }

    // Debugging

    /// Write a PNG of the page to the screenshot directory
    pub async fn save_screenshot(&self, name: &str) -> E2eResult<PathBuf> {
        let png = self.page.screenshot().await?;
        tokio::fs::create_dir_all(&self.screenshot_dir).await?;
        let path = self.screenshot_dir.join(format!("{}.png", file_stem(name)));
        tokio::fs::write(&path, png).await?;
        info!("Screenshot saved: {}", path.display());
        Ok(path)
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn wait_for_presence(&self, selector: &Selector) -> E2eResult<()> {
        let page = &self.page;
        wait_until(self.wait, &format!("presence of {}", selector), || async move {
            Ok(page.is_present(selector).await?.then_some(()))
        })
        .await
    }

    async fn read(&self, selector: &Selector, read: Read) -> E2eResult<String> {
        match read {
            Read::Value => self.page.value(selector).await,
            Read::Text => self.page.text(selector).await,
        }
    }

    /// Poll until the element's value or text contains `expected`.
    ///
    /// A timeout after the element was seen reports the last observed text;
    /// an element that never appeared reports a plain timeout.
    async fn wait_for_contains(
        &self,
        selector: &Selector,
        what: &str,
        expected: &str,
        read: Read,
    ) -> E2eResult<()> {
        let last_seen = RefCell::new(None::<String>);
        let last = &last_seen;

        let outcome = wait_until(
            self.wait,
            &format!("{} to contain \"{}\"", what, expected),
            || async move {
                match self.read(selector, read).await {
                    Ok(actual) if actual.contains(expected) => Ok(Some(())),
                    Ok(actual) => {
                        *last.borrow_mut() = Some(actual);
                        Ok(None)
                    }
                    Err(E2eError::ElementNotFound(_)) => Ok(None),
                    Err(e) => Err(e),
                }
            },
        )
        .await;

        match (outcome, last_seen.into_inner()) {
            (Err(E2eError::Timeout { seconds, .. }), Some(actual)) => {
                debug!("{} never contained \"{}\"", what, expected);
                Err(E2eError::AssertionFailed(format!(
                    "{} did not contain \"{}\" within {:.1}s, got \"{}\"",
                    what, expected, seconds, actual
                )))
            }
            (outcome, _) => outcome,
        }
    }
}

/// First cell of each row, without a leading `name` header
fn table_names(rows: &[Vec<String>]) -> Vec<&str> {
    let body = match rows.first() {
        Some(header) if header.first().is_some_and(|c| c.trim().eq_ignore_ascii_case("name")) => &rows[1..],
        _ => rows,
    };
    body.iter()
        .filter_map(|row| row.first())
        .map(|cell| cell.trim())
        .collect()
}

/// Keep screenshot names filesystem-safe
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
