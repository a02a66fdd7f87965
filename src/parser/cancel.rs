//! Cooperative cancellation for long parses.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{HmicError, Result};

/// A shared flag a caller can raise to stop a parse early.
///
/// Clones share the same flag. Parsers check it once per chunk (streaming)
/// or once per top-level scan step (whole-file) and return
/// [`HmicError::Cancelled`] when it is set.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Fail with `Cancelled` if a token is present and raised.
pub(crate) fn check(token: Option<&CancelToken>) -> Result<()> {
    match token {
        Some(token) if token.is_cancelled() => Err(HmicError::Cancelled),
        _ => Ok(()),
    }
}
