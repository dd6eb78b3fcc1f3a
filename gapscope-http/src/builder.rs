use std::time::Duration;

use gapscope_core::GapError;
use url::Url;

use crate::HttpConnector;

/// Base URL used when neither the builder nor the environment provides one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Environment variable read by [`HttpConnector::from_env`].
pub const BASE_URL_ENV: &str = "GAPSCOPE_API_URL";

/// Builder for [`HttpConnector`].
#[derive(Debug, Default)]
pub struct HttpConnectorBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

impl HttpConnectorBuilder {
    /// API root, e.g. `http://localhost:5000/api`. Endpoint paths are appended to it.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Per-request timeout applied by the HTTP client.
    ///
    /// Ignored when a custom client is supplied.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured `reqwest::Client`.
    #[must_use]
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the connector.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the base URL is not an absolute http(s) URL or the
    /// HTTP client cannot be constructed.
    pub fn build(self) -> Result<HttpConnector, GapError> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL).trim();
        let parsed = Url::parse(raw)
            .map_err(|e| GapError::InvalidArg(format!("invalid base url {raw:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(GapError::InvalidArg(format!(
                "base url must be http or https, got {:?}",
                parsed.scheme()
            )));
        }

        let client = match self.client {
            Some(c) => c,
            None => {
                let mut b = reqwest::Client::builder();
                if let Some(t) = self.timeout {
                    b = b.timeout(t);
                }
                b.build().map_err(|e| {
                    GapError::InvalidArg(format!("failed to build http client: {e}"))
                })?
            }
        };

        Ok(HttpConnector {
            client,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }
}

impl HttpConnector {
    /// Returns an unconfigured builder pointing at [`DEFAULT_BASE_URL`].
    #[must_use]
    pub fn builder() -> HttpConnectorBuilder {
        HttpConnectorBuilder::default()
    }

    /// Connector for the base URL in `GAPSCOPE_API_URL`, or the default when unset.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the configured URL is invalid.
    pub fn from_env() -> Result<Self, GapError> {
        let mut b = Self::builder();
        if let Ok(url) = std::env::var(BASE_URL_ENV)
            && !url.trim().is_empty()
        {
            b = b.base_url(url);
        }
        b.build()
    }
}
