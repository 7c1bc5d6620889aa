//! # dutch-extract: Receipt Extraction Client for Dutch
//!
//! This crate is the seam to the remote document-processing (OCR) service:
//! `extract(image bytes) → Receipt | ExtractError`, async, one request per
//! call.
//!
//! ## What Lives Here vs. Elsewhere
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HERE (dutch-extract)              NOT HERE                             │
//! │  ─────────────────────────────     ───────────────────────────────      │
//! │  • HTTP upload + auth headers      • Image capture / compression        │
//! │  • Wire payload decoding           • Retry / backoff policy (UI owns    │
//! │  • Required-field validation         the retry button)                  │
//! │  • Dollars → cents conversion      • The single-in-flight guard         │
//! │  • Credential loading from env       (dutch-session owns it)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`client`] - the async HTTP client
//! - [`payload`] - wire structs + conversion to [`dutch_core::Receipt`]
//! - [`config`] - endpoint and credentials (environment-based)
//! - [`error`] - the extraction error taxonomy

// =============================================================================
// Module Declarations
// =============================================================================

pub mod client;
pub mod config;
pub mod error;
pub mod payload;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use client::ExtractClient;
pub use config::ExtractConfig;
pub use error::{ExtractError, ExtractResult};
pub use payload::ReceiptPayload;
