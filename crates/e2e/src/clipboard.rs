//! Single-slot clipboard scoped to one scenario

use tracing::info;

use crate::error::{E2eError, E2eResult};

/// Holds the last copied value; each copy replaces the previous one
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    slot: Option<String>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copy(&mut self, value: impl Into<String>) {
        let value = value.into();
        info!("Clipboard contains: {}", value);
        self.slot = Some(value);
    }

    /// The copied value; an empty string is a valid copy
    pub fn paste(&self) -> E2eResult<&str> {
        self.slot.as_deref().ok_or(E2eError::EmptyClipboard)
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}
