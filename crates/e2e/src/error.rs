//! Error types for acceptance steps

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Fixture setup failed: {0}")]
    Fixture(#[from] catalog_common::Error),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Browser failed to launch: {0}")]
    BrowserLaunch(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("No {kind} named '{name}' in the selector map")]
    UnknownElement { kind: &'static str, name: String },

    #[error("Option '{option}' not found in {selector}")]
    OptionNotFound { selector: String, option: String },

    #[error("Timeout after {seconds:.1}s waiting for: {what}")]
    Timeout { what: String, seconds: f64 },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Nothing has been copied in this scenario")]
    EmptyClipboard,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<chromiumoxide::error::CdpError> for E2eError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        E2eError::Browser(e.to_string())
    }
}

impl E2eError {
    /// Build an assertion failure that reports both sides
    pub fn mismatch(what: &str, expected: &str, actual: &str) -> Self {
        E2eError::AssertionFailed(format!(
            "{}: expected \"{}\", got \"{}\"",
            what, expected, actual
        ))
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
