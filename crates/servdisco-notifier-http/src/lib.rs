// # HTTP Diff Notifier
//
// Delivers reconciled diffs as a JSON POST to the configured endpoint:
//
// ```http
// POST <endpoint>
// Content-Type: application/json
// Authorization: Bearer <token>        (only when a token is configured)
//
// {"serverName": "...", "diff": {"added": [...], "removed": [...]}}
// ```
//
// Single-shot per cycle: no retry, no backoff, no queueing — the scheduler
// owns the failure-recovery strategy (the next poll, plus periodic full
// discovery). Any non-2xx response or transport failure is returned as a
// notifier error.

use async_trait::async_trait;
use std::time::Duration;

use servdisco_core::{DiffPayload, Error, Notifier, Result};

/// Request timeout for diff delivery
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP POST notifier with optional bearer-token auth
pub struct HttpNotifier {
    /// Target endpoint URL
    endpoint: String,

    /// Optional bearer token
    /// Never log this value
    token: Option<String>,

    /// HTTP client for deliveries
    client: reqwest::Client,
}

// The Debug implementation intentionally does not expose the token
impl std::fmt::Debug for HttpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpNotifier")
            .field("endpoint", &self.endpoint)
            .field("token", &self.token.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

impl HttpNotifier {
    /// Create a notifier for the given endpoint
    ///
    /// An empty token is treated as absent; the Authorization header is
    /// omitted entirely in that case.
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        if endpoint.is_empty() {
            return Err(Error::config("endpoint URL cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::notifier(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            endpoint,
            token: token.filter(|t| !t.is_empty()),
            client,
        })
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, payload: &DiffPayload) -> Result<()> {
        tracing::debug!(
            "sending diff to {} {} auth",
            self.endpoint,
            if self.token.is_some() { "with" } else { "without" }
        );

        let mut request = self.client.post(&self.endpoint).json(payload);

        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::notifier(format!("request to {} failed: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::notifier(format!(
                "endpoint responded with {status}"
            )));
        }

        tracing::debug!("endpoint responded with {status}");
        Ok(())
    }
}
