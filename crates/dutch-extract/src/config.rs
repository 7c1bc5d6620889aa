//! # Extraction Client Configuration
//!
//! Credentials and endpoint for the document-processing API.
//!
//! This is collaborator configuration: the allocation engine never sees any
//! of it. Values come from the environment the way the rest of the app's
//! deployment knobs do.
//!
//! ```text
//! DUTCH_EXTRACT_URL           endpoint for document uploads (required)
//! DUTCH_EXTRACT_CLIENT_ID     API client id header (required)
//! DUTCH_EXTRACT_API_KEY       API key for the Authorization header (required)
//! DUTCH_EXTRACT_TIMEOUT_SECS  request timeout, default 30
//! ```

use std::env;
use std::time::Duration;

use crate::error::{ExtractError, ExtractResult};

/// Default request timeout. OCR runs are slow; transport hangs are slower.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`ExtractClient`](crate::client::ExtractClient).
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Document upload endpoint URL.
    pub endpoint: String,

    /// Client id sent as the `CLIENT-ID` header.
    pub client_id: String,

    /// API key sent in the `AUTHORIZATION` header.
    pub api_key: String,

    /// Whole-request timeout. A timeout policy beyond this single-request
    /// bound (retries, backoff, cancellation) belongs to the caller.
    pub timeout: Duration,
}

impl ExtractConfig {
    /// Creates a config with the default timeout.
    pub fn new(
        endpoint: impl Into<String>,
        client_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        ExtractConfig {
            endpoint: endpoint.into(),
            client_id: client_id.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Loads the config from the environment.
    ///
    /// Each missing required variable is a typed [`ExtractError::Config`],
    /// named so the operator knows which one to set.
    pub fn from_env() -> ExtractResult<Self> {
        let endpoint = require_env("DUTCH_EXTRACT_URL")?;
        let client_id = require_env("DUTCH_EXTRACT_CLIENT_ID")?;
        let api_key = require_env("DUTCH_EXTRACT_API_KEY")?;

        let timeout = match env::var("DUTCH_EXTRACT_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    ExtractError::Config(format!(
                        "DUTCH_EXTRACT_TIMEOUT_SECS is not a number: {raw}"
                    ))
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => DEFAULT_TIMEOUT,
        };

        Ok(ExtractConfig {
            endpoint,
            client_id,
            api_key,
            timeout,
        })
    }
}

fn require_env(key: &str) -> ExtractResult<String> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ExtractError::Config(key.to_string()))
}
