//! Suite configuration
//!
//! Resolved in layers: built-in defaults, an optional YAML file, environment
//! variables, then command-line overrides applied by the suite entry point.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{E2eError, E2eResult};
use crate::selectors::SelectorMap;

/// File picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "catalog-e2e.yaml";

/// Acceptance suite configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct E2eConfig {
    /// Base URL of the application under test
    pub base_url: String,

    /// Ceiling for bounded waits, in seconds
    pub wait_seconds: u64,

    /// Browser launch options
    pub browser: BrowserConfig,

    /// Where debug screenshots are written
    pub screenshot_dir: PathBuf,

    /// Capture a screenshot when a scenario fails
    pub screenshot_on_failure: bool,

    /// Page, field and button locations
    pub selectors: SelectorMap,
}

impl Default for E2eConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            wait_seconds: 60,
            browser: BrowserConfig::default(),
            screenshot_dir: PathBuf::from("test-results/screenshots"),
            screenshot_on_failure: false,
            selectors: SelectorMap::default(),
        }
    }
}

/// Configuration for the Chromium session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub sandbox: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Chromium binary; auto-detected when unset
    pub executable: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: false,
            viewport_width: 1280,
            viewport_height: 720,
            executable: None,
        }
    }
}

impl E2eConfig {
    /// Parse a configuration from YAML, keeping defaults for omitted keys
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let mut parsed: Self = serde_yaml::from_str(yaml)?;
        let mut selectors = SelectorMap::default();
        selectors.merge(parsed.selectors);
        parsed.selectors = selectors;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Parse a configuration from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists, then
    /// apply environment overrides
    pub fn load(path: Option<&Path>) -> E2eResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `BASE_URL`, `WAIT_SECONDS` and `CHROME_PATH` from `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> E2eResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BASE_URL") {
            debug!("BASE_URL override: {}", url);
            self.base_url = url;
        }
        if let Some(secs) = lookup("WAIT_SECONDS") {
            self.wait_seconds = secs
                .trim()
                .parse()
                .map_err(|_| E2eError::Config(format!("WAIT_SECONDS is not a number: {}", secs)))?;
        }
        if let Some(path) = lookup("CHROME_PATH") {
            self.browser.executable = Some(PathBuf::from(path));
        }
        self.validate()
    }

    /// Ceiling for bounded waits
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_seconds)
    }

    /// Reject settings no scenario could run with
    pub fn validate(&self) -> E2eResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(E2eError::Config(format!(
                "base_url must be an http(s) URL: {}",
                self.base_url
            )));
        }
        if self.wait_seconds == 0 {
            return Err(E2eError::Config("wait_seconds must be at least 1".to_string()));
        }
        Ok(())
    }
}
