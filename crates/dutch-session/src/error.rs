//! # Session Error Type
//!
//! Unified error type for session commands: what the presentation layer sees.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ValidationError ─┐                                                     │
//! │                   ├─► CoreError ──┐                                     │
//! │  engine NotFound ─┘               ├─► SessionError ──► frontend         │
//! │  ExtractError ────────────────────┤                                     │
//! │  duplicate scan request ──────────┘   (ScanInFlight)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Core and extract errors pass through transparently; the only failure the
//! session itself introduces is the single-in-flight scan rule.

use thiserror::Error;

use dutch_core::CoreError;
use dutch_extract::ExtractError;

/// Errors returned from session commands.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Engine-level failure (unknown id, validation).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Extraction collaborator failure (malformed payload, transport).
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// A scan was requested while another is still pending. The caller must
    /// wait for the prior extraction to resolve or fail before retrying.
    #[error("a receipt scan is already in flight")]
    ScanInFlight,
}

/// Convenience type alias for Results with SessionError.
pub type SessionResult<T> = Result<T, SessionError>;
