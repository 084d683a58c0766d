//! Hivecrew Client
//!
//! Entry point for the SDK. Holds the shared transport and hands out
//! resource handles.

use crate::error::Result;
use crate::tasks::TasksResource;
use crate::transport::{HttpTransport, Transport};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Hivecrew API.
///
/// # Example
///
/// ```no_run
/// use hivecrew_sdk::HivecrewClient;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = HivecrewClient::builder("https://api.hivecrew.dev/v1")
///     .api_key("hc_live_...")
///     .build()?;
/// let tasks = client.tasks();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HivecrewClient {
    transport: Arc<dyn Transport>,
}

impl HivecrewClient {
    /// Start building a client against the given API base URL.
    pub fn builder(base_url: impl Into<String>) -> HivecrewClientBuilder {
        HivecrewClientBuilder {
            base_url: base_url.into(),
            api_key: None,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Create a client with default settings and no authentication.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::builder(base_url).build()
    }

    /// Create a client over an externally supplied transport.
    ///
    /// Intended for tests and callers bringing their own HTTP stack.
    pub fn from_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Handle to the tasks resource.
    pub fn tasks(&self) -> TasksResource {
        TasksResource::new(Arc::clone(&self.transport))
    }
}

/// Builder for [`HivecrewClient`].
pub struct HivecrewClientBuilder {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HivecrewClientBuilder {
    /// API key sent as a bearer token on every request.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Per-request timeout (default 30 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<HivecrewClient> {
        let transport = HttpTransport::new(self.base_url, self.api_key, self.timeout)?;
        Ok(HivecrewClient {
            transport: Arc::new(transport),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_rejects_empty_base_url() {
        let result = HivecrewClient::new("");
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_with_options() {
        let client = HivecrewClient::builder("https://api.hivecrew.dev/v1")
            .api_key("key")
            .timeout(Duration::from_secs(5))
            .build();
        assert!(client.is_ok());
    }
}
