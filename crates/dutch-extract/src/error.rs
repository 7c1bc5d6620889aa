//! # Extraction Error Types
//!
//! ## Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  MalformedReceipt / DuplicateLineItem / Decode                          │
//! │      local validation: the service answered, the payload is unusable    │
//! │                                                                         │
//! │  ExtractionFailed / ServiceStatus                                       │
//! │      transport or service failure, opaque to the engine; surfaced to    │
//! │      the presentation layer for user-visible retry (no retry here)      │
//! │                                                                         │
//! │  Config                                                                 │
//! │      collaborator configuration missing; never reaches the engine       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Errors from the receipt extraction collaborator.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The payload decoded but a required field was absent or null.
    ///
    /// `field` names the offending path ("subtotal", "vendor.name",
    /// "line_items[2].total", ...) so the UI can say something useful.
    #[error("receipt payload missing required field: {field}")]
    MalformedReceipt { field: String },

    /// Two line items in one payload carried the same id. Ids key the
    /// assignment map, so this payload cannot be ingested safely.
    #[error("receipt payload has duplicate line item id: {0}")]
    DuplicateLineItem(i64),

    /// The response body was not the expected JSON shape at all.
    #[error("failed to decode receipt payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// Transport-level failure (DNS, TLS, timeout, connection reset).
    #[error("extraction request failed: {0}")]
    ExtractionFailed(#[from] reqwest::Error),

    /// The service answered with a non-success HTTP status.
    #[error("extraction service returned status {status}")]
    ServiceStatus { status: u16 },

    /// A required configuration value (endpoint, credentials) is missing.
    #[error("missing extraction configuration: {0}")]
    Config(String),
}

impl ExtractError {
    /// True for payload-validation failures (the "MalformedReceipt" class),
    /// false for transport/service failures worth a retry button.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ExtractError::MalformedReceipt { .. }
                | ExtractError::DuplicateLineItem(_)
                | ExtractError::Decode(_)
        )
    }
}

/// Convenience type alias for Results with ExtractError.
pub type ExtractResult<T> = Result<T, ExtractError>;
