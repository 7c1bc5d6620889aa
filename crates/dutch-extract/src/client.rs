//! # Extraction Client
//!
//! The HTTP client that uploads a receipt image to the document-processing
//! API and returns a validated [`dutch_core::Receipt`].
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ExtractClient::extract                             │
//! │                                                                         │
//! │  image bytes                                                            │
//! │       │ base64                                                          │
//! │       ▼                                                                 │
//! │  POST { "file_name": "receipt.jpg", "file_data": "..." }               │
//! │  headers: CLIENT-ID, AUTHORIZATION: apikey <key>                        │
//! │       │                                                                 │
//! │       ├── transport error ───────────► ExtractionFailed                 │
//! │       ├── non-2xx status ────────────► ServiceStatus { status }         │
//! │       ├── body not JSON ─────────────► Decode                           │
//! │       ├── required field missing ────► MalformedReceipt { field }       │
//! │       └── ok ────────────────────────► Receipt                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The client performs no retries and no deduplication: the session layer
//! guarantees a single in-flight scan per receipt, and retry is a user
//! decision surfaced by the presentation layer.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;
use tracing::{debug, warn};

use dutch_core::types::Receipt;

use crate::config::ExtractConfig;
use crate::error::{ExtractError, ExtractResult};
use crate::payload::ReceiptPayload;

/// JSON upload body expected by the document API.
#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    file_name: &'a str,
    file_data: String,
}

/// Async client for the receipt extraction service.
#[derive(Debug, Clone)]
pub struct ExtractClient {
    config: ExtractConfig,
    http: reqwest::Client,
}

impl ExtractClient {
    /// Builds a client from the given config.
    ///
    /// The request timeout is baked into the underlying HTTP client so every
    /// call observes it without per-call plumbing.
    pub fn new(config: ExtractConfig) -> ExtractResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(ExtractClient { config, http })
    }

    /// Builds a client configured from the environment.
    pub fn from_env() -> ExtractResult<Self> {
        ExtractClient::new(ExtractConfig::from_env()?)
    }

    /// Uploads a receipt image and returns the extracted, validated receipt.
    ///
    /// One HTTP request per call. Callers must not issue a second call for
    /// the same session while one is pending (the session layer's scan guard
    /// enforces this).
    pub async fn extract(&self, image: &[u8]) -> ExtractResult<Receipt> {
        debug!(bytes = image.len(), "uploading receipt image");

        let body = UploadRequest {
            file_name: "receipt.jpg",
            file_data: BASE64.encode(image),
        };

        let response = self
            .http
            .post(&self.config.endpoint)
            .header("CLIENT-ID", &self.config.client_id)
            .header("AUTHORIZATION", format!("apikey {}", self.config.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "extraction service rejected upload");
            return Err(ExtractError::ServiceStatus {
                status: status.as_u16(),
            });
        }

        // Decode via serde_json rather than response.json() so a bad body
        // classifies as Decode, not as a transport failure.
        let text = response.text().await?;
        let payload: ReceiptPayload = serde_json::from_str(&text)?;

        let receipt = payload.into_receipt()?;
        debug!(
            vendor = %receipt.vendor.name,
            items = receipt.line_items.len(),
            "receipt extracted"
        );
        Ok(receipt)
    }
}
