//! Browser automation
//!
//! Steps talk to the page through the [`WebPage`] trait. [`ChromeSession`]
//! provides the real implementation over the Chrome DevTools Protocol.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpConfig};
use chromiumoxide::element::Element;
use chromiumoxide::js::EvaluationResult;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::BrowserConfig;
use crate::error::{E2eError, E2eResult};
use crate::selectors::Selector;

/// The browser operations the acceptance steps rely on
#[async_trait]
pub trait WebPage: Send + Sync {
    /// Navigate to an absolute URL
    async fn goto(&self, url: &str) -> E2eResult<()>;

    /// Document title
    async fn title(&self) -> E2eResult<String>;

    /// Serialized HTML of the current document
    async fn source(&self) -> E2eResult<String>;

    /// Whether the element currently exists
    async fn is_present(&self, selector: &Selector) -> E2eResult<bool>;

    /// The `value` property of an input, select or textarea
    async fn value(&self, selector: &Selector) -> E2eResult<String>;

    /// Empty an input
    async fn clear(&self, selector: &Selector) -> E2eResult<()>;

    /// Send keystrokes to an element
    async fn type_text(&self, selector: &Selector, text: &str) -> E2eResult<()>;

    async fn click(&self, selector: &Selector) -> E2eResult<()>;

    /// Rendered text of an element
    async fn text(&self, selector: &Selector) -> E2eResult<String>;

    /// Choose the option of a `<select>` whose visible text matches
    async fn select_by_text(&self, selector: &Selector, text: &str) -> E2eResult<()>;

    /// Visible text of the selected option
    async fn selected_text(&self, selector: &Selector) -> E2eResult<String>;

    /// PNG screenshot of the full page
    async fn screenshot(&self) -> E2eResult<Vec<u8>>;
}

/// A launched Chromium with one page
pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: Arc<ChromePage>,
}

impl ChromeSession {
    /// Launch Chromium and open a blank page
    pub async fn launch(config: &BrowserConfig) -> E2eResult<Self> {
        let mut builder = CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = config.executable {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder.build().map_err(E2eError::BrowserLaunch)?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| E2eError::BrowserLaunch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler stopped: {}", e);
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        info!(
            "Chromium launched ({}x{}, headless: {})",
            config.viewport_width, config.viewport_height, config.headless
        );

        Ok(Self {
            browser,
            handler,
            page: Arc::new(ChromePage { page }),
        })
    }

    /// The session's page
    pub fn page(&self) -> Arc<dyn WebPage> {
        self.page.clone()
    }

    /// Close the browser and stop the CDP handler
    pub async fn close(mut self) -> E2eResult<()> {
        if let Err(e) = self.browser.close().await {
            warn!("Browser did not close cleanly: {}", e);
        }
        let _ = self.browser.wait().await;
        self.handler.abort();
        Ok(())
    }
}

/// A Chromium page
pub struct ChromePage {
    page: Page,
}

impl ChromePage {
    async fn element(&self, selector: &Selector) -> E2eResult<Element> {
        let found = match selector {
            Selector::XPath(xpath) => self.page.find_xpath(xpath.as_str()).await,
            _ => {
                let css = selector.to_css().unwrap_or_default();
                self.page.find_element(css).await
            }
        };
        found.map_err(|_| E2eError::ElementNotFound(selector.to_string()))
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> E2eResult<T> {
        let result = self.page.evaluate(script).await?;
        Ok(result.into_value()?)
    }

    /// Evaluate `body` with `el` bound to the element (or `null`)
    async fn eval_on<T: DeserializeOwned>(&self, selector: &Selector, body: &str) -> E2eResult<T> {
        self.eval(element_script(selector, body)).await
    }

    /// Like [`Self::eval_on`], for scripts that return `null` when the
    /// element is missing
    async fn lookup<T: DeserializeOwned>(&self, selector: &Selector, body: &str) -> E2eResult<T> {
        let result = self.page.evaluate(element_script(selector, body)).await?;
        found_value(result, selector)
    }

    fn not_found(selector: &Selector) -> E2eError {
        E2eError::ElementNotFound(selector.to_string())
    }
}

fn element_script(selector: &Selector, body: &str) -> String {
    format!("(() => {{ const el = {}; {} }})()", selector.to_js(), body)
}

/// CDP reports a `null` result without a value; that means the element is gone
fn found_value<T: DeserializeOwned>(result: EvaluationResult, selector: &Selector) -> E2eResult<T> {
    let missing = matches!(result.value(), None | Some(serde_json::Value::Null));
    if missing {
        return Err(ChromePage::not_found(selector));
    }
    Ok(result.into_value()?)
}

/// Option text as steps compare it
fn option_label(text: &str) -> &str {
    text.trim()
}

fn option_index(options: &[String], wanted: &str) -> Option<usize> {
    let wanted = option_label(wanted);
    options.iter().position(|o| option_label(o) == wanted)
}

#[async_trait]
impl WebPage for ChromePage {
    async fn goto(&self, url: &str) -> E2eResult<()> {
        debug!("goto {}", url);
        self.page.goto(url).await?;
        Ok(())
    }

    async fn title(&self) -> E2eResult<String> {
        Ok(self.page.get_title().await?.unwrap_or_default())
    }

    async fn source(&self) -> E2eResult<String> {
        Ok(self.page.content().await?)
    }

    async fn is_present(&self, selector: &Selector) -> E2eResult<bool> {
        self.eval(format!("({}) !== null", selector.to_js())).await
    }

    async fn value(&self, selector: &Selector) -> E2eResult<String> {
        self.lookup(selector, "return el === null ? null : String(el.value ?? '');")
            .await
    }

    async fn clear(&self, selector: &Selector) -> E2eResult<()> {
        debug!("clear {}", selector);
        let found: bool = self
            .eval_on(
                selector,
                "if (el === null) return false; \
                 el.value = ''; \
                 el.dispatchEvent(new Event('input', { bubbles: true })); \
                 el.dispatchEvent(new Event('change', { bubbles: true })); \
                 return true;",
            )
            .await?;
        if found {
            Ok(())
        } else {
            Err(Self::not_found(selector))
        }
    }

    async fn type_text(&self, selector: &Selector, text: &str) -> E2eResult<()> {
        debug!("type into {}", selector);
        let element = self.element(selector).await?;
        element.focus().await?;
        element.type_str(text).await?;
        Ok(())
    }

    async fn click(&self, selector: &Selector) -> E2eResult<()> {
        debug!("click {}", selector);
        let element = self.element(selector).await?;
        element.click().await?;
        Ok(())
    }

    async fn text(&self, selector: &Selector) -> E2eResult<String> {
        self.lookup(selector, "return el === null ? null : (el.innerText ?? el.textContent ?? '');")
            .await
    }

    async fn select_by_text(&self, selector: &Selector, text: &str) -> E2eResult<()> {
        debug!("select '{}' in {}", text, selector);
        let options: Vec<String> = self
            .lookup(
                selector,
                "return el === null ? null : Array.from(el.options || []).map(o => o.text);",
            )
            .await?;
        let index = option_index(&options, text).ok_or_else(|| E2eError::OptionNotFound {
            selector: selector.to_string(),
            option: text.to_string(),
        })?;
        let body = format!(
            "if (el === null) return null; \
             el.selectedIndex = {}; \
             el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
             return true;",
            index
        );
        let _: bool = self.lookup(selector, &body).await?;
        Ok(())
    }

    async fn selected_text(&self, selector: &Selector) -> E2eResult<String> {
        let text: String = self
            .lookup(
                selector,
                "if (el === null) return null; \
                 const opt = el.options ? el.options[el.selectedIndex] : undefined; \
                 return opt ? opt.text : '';",
            )
            .await?;
        Ok(option_label(&text).to_string())
    }

    async fn screenshot(&self) -> E2eResult<Vec<u8>> {
        let params = ScreenshotParams::builder().full_page(true).build();
        Ok(self.page.screenshot(params).await?)
    }
}
