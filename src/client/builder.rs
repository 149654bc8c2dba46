use crate::client::core::MonkeyLearnClient;
use crate::client::policy::ThrottleRetryPolicy;
use crate::client::endpoint::resolve_url;
use crate::config::{normalize_base_url, ApiVersion, Config};
use crate::transport::TransportSettings;
use crate::Result;
use std::time::Duration;

/// Builder for creating clients with custom configuration.
///
/// Every setting not given here comes from the `MONKEYLEARN_*` environment,
/// or from the built-in defaults when the variable is unset.
#[derive(Debug, Clone)]
pub struct MonkeyLearnClientBuilder {
    config: Config,
    transport: TransportSettings,
}

impl MonkeyLearnClientBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::from_env(),
            transport: TransportSettings::from_env(),
        }
    }

    /// Start from an explicit configuration instead of the environment.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.set_token(token);
        self
    }

    /// Override base URL (also used to point tests at a mock server).
    pub fn base_url(mut self, url: impl AsRef<str>) -> Self {
        self.config.set_base_url(url);
        self
    }

    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.config.set_api_version(version);
        self
    }

    pub fn retry_if_throttle(mut self, enable: bool) -> Self {
        self.config.set_retry_if_throttle(enable);
        self
    }

    pub fn auto_batch(mut self, enable: bool) -> Self {
        self.config.set_auto_batch(enable);
        self
    }

    pub fn throttle_retry(mut self, policy: ThrottleRetryPolicy) -> Self {
        self.config.set_throttle_retry(policy);
        self
    }

    /// Per-attempt HTTP timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport.timeout = Some(timeout);
        self
    }

    pub fn without_timeout(mut self) -> Self {
        self.transport.timeout = None;
        self
    }

    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.transport.proxy_url = Some(url.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.transport.user_agent = user_agent.into();
        self
    }

    /// Build the client. Only the base URL is checked here; the HTTP handle
    /// itself is created lazily on the first request.
    pub fn build(self) -> Result<MonkeyLearnClient> {
        let base_url = normalize_base_url(self.config.base_url());
        resolve_url(&base_url, "", &[])?;
        Ok(MonkeyLearnClient::from_parts(self.config, self.transport))
    }
}

impl Default for MonkeyLearnClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let client = MonkeyLearnClientBuilder::new()
            .config(Config::builtin())
            .token("abc")
            .base_url("http://localhost:9999/v3")
            .api_version(ApiVersion::V2)
            .retry_if_throttle(false)
            .auto_batch(false)
            .without_timeout()
            .build()
            .unwrap();
        let config = client.config();
        assert_eq!(config.token(), Some("abc"));
        assert_eq!(config.base_url(), "http://localhost:9999/v3/");
        assert_eq!(config.api_version(), ApiVersion::V2);
        assert!(!config.retry_if_throttle());
        assert!(!config.auto_batch());
        assert_eq!(client.transport().settings().timeout, None);
        assert!(!client.transport().is_initialized());
    }

    #[test]
    fn test_builder_rejects_invalid_base_url() {
        let result = MonkeyLearnClientBuilder::new()
            .config(Config::builtin())
            .base_url("::not-a-url::")
            .build();
        assert!(result.is_err());
    }
}
