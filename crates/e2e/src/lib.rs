//! Catalog acceptance steps
//!
//! This crate holds the browser-facing half of the product catalog
//! acceptance suite:
//! - Resolves configuration (defaults, YAML, environment, CLI)
//! - Maps the names used in scenarios to page selectors
//! - Drives Chromium over the DevTools Protocol
//! - Keeps per-scenario state, including a one-slot clipboard
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │            cucumber World (tests/products.rs)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ScenarioContext                                             │
//! │    ├── load_product_table() -> ProductClient (REST)         │
//! │    ├── visit / set_field / press_button / copy / paste      │
//! │    ├── assert_message / assert_in_results / ...             │
//! │    └── clipboard: Clipboard                                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SelectorMap   "Name" -> #product_name, "Search" -> ...     │
//! │  WebPage       ChromePage (chromiumoxide) | test doubles    │
//! │  wait_until    bounded polling, fixed ceiling               │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod browser;
pub mod clipboard;
pub mod config;
pub mod context;
pub mod error;
pub mod selectors;
pub mod wait;

pub use browser::{ChromeSession, WebPage};
pub use clipboard::Clipboard;
pub use config::{BrowserConfig, E2eConfig};
pub use context::ScenarioContext;
pub use error::{E2eError, E2eResult};
pub use selectors::{Selector, SelectorMap};
