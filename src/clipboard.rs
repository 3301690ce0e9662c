//! System clipboard access
//!
//! The clipboard may be missing entirely (headless sessions, SSH); every
//! failure is reported to the caller, which logs it and carries on.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard not available")]
    NotAvailable,

    #[error("failed to set clipboard: {0}")]
    SetFailed(String),
}

pub struct Clipboard {
    inner: Option<arboard::Clipboard>,
}

impl Clipboard {
    /// Connect to the system clipboard, remembering if that fails
    pub fn new() -> Self {
        let inner = match arboard::Clipboard::new() {
            Ok(cb) => Some(cb),
            Err(e) => {
                tracing::debug!("Clipboard unavailable: {}", e);
                None
            }
        };
        Self { inner }
    }

    /// A clipboard that rejects every copy
    #[cfg(test)]
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    pub fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        match &mut self.inner {
            Some(cb) => cb
                .set_text(text.to_string())
                .map_err(|e| ClipboardError::SetFailed(e.to_string())),
            None => Err(ClipboardError::NotAvailable),
        }
    }
}
