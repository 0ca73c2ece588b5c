//! Infrastructure error type
//!
//! Core timer and task operations never fail; these errors only come from
//! the plumbing around them (preference I/O, lock poisoning).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FocusError {
    #[error("preference file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference serialization failed: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("failed to lock {0}")]
    LockPoisoned(&'static str),
}
