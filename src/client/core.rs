use crate::client::builder::MonkeyLearnClientBuilder;
use crate::classifiers::Classifiers;
use crate::config::Config;
use crate::extractors::Extractors;
use crate::pipelines::Pipelines;
use crate::transport::{HttpTransport, TransportSettings};
use crate::workflows::Workflows;
use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;

/// Client for the MonkeyLearn API.
///
/// Cheap to clone; clones share configuration and the HTTP handle. Every
/// request reads one configuration snapshot, so [`configure`](Self::configure)
/// never affects a request that is already in flight.
#[derive(Clone)]
pub struct MonkeyLearnClient {
    pub(crate) config: Arc<ArcSwap<Config>>,
    pub(crate) transport: Arc<HttpTransport>,
}

impl MonkeyLearnClient {
    /// Client configured from the `MONKEYLEARN_*` environment variables.
    pub fn new() -> Self {
        Self::from_parts(Config::from_env(), TransportSettings::from_env())
    }

    /// Client with the given token and every other setting from the environment.
    pub fn with_token(token: impl Into<String>) -> Self {
        let mut config = Config::from_env();
        config.set_token(token);
        Self::from_parts(config, TransportSettings::from_env())
    }

    pub fn builder() -> MonkeyLearnClientBuilder {
        MonkeyLearnClientBuilder::new()
    }

    pub(crate) fn from_parts(config: Config, settings: TransportSettings) -> Self {
        Self {
            config: Arc::new(ArcSwap::from_pointee(config)),
            transport: Arc::new(HttpTransport::new(settings)),
        }
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> Arc<Config> {
        self.config.load_full()
    }

    /// Apply `f` to a copy of the configuration and publish it.
    ///
    /// Concurrent `configure` calls are last-writer-wins.
    pub fn configure<F>(&self, f: F)
    where
        F: FnOnce(&mut Config),
    {
        let mut next = Config::clone(&self.config.load());
        f(&mut next);
        self.config.store(Arc::new(next));
    }

    /// Restore every setting to its environment/built-in default.
    pub fn reset(&self) {
        self.configure(Config::reset);
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    pub fn classifiers(&self) -> Classifiers<'_> {
        Classifiers::new(self)
    }

    pub fn extractors(&self) -> Extractors<'_> {
        Extractors::new(self)
    }

    pub fn pipelines(&self) -> Pipelines<'_> {
        Pipelines::new(self)
    }

    pub fn workflows(&self) -> Workflows<'_> {
        Workflows::new(self)
    }
}

impl Default for MonkeyLearnClient {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MonkeyLearnClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonkeyLearnClient")
            .field("config", &self.config.load_full())
            .field("transport_initialized", &self.transport.is_initialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiVersion;

    fn client() -> MonkeyLearnClient {
        MonkeyLearnClient::from_parts(Config::builtin(), TransportSettings::default())
    }

    #[test]
    fn test_configure_publishes_new_snapshot() {
        let client = client();
        let before = client.config();
        client.configure(|c| {
            c.set_token("abc");
            c.set_api_version(ApiVersion::V2);
        });
        let after = client.config();
        assert_eq!(before.token(), None);
        assert_eq!(after.token(), Some("abc"));
        assert_eq!(after.api_version(), ApiVersion::V2);
    }

    #[test]
    fn test_clones_share_configuration() {
        let client = client();
        let clone = client.clone();
        clone.configure(|c| c.set_auto_batch(false));
        assert!(!client.config().auto_batch());
    }

    #[test]
    fn test_reset_discards_configured_values() {
        let client = client();
        client.configure(|c| {
            c.set_auto_batch(false);
            c.set_base_url("http://x/");
        });
        client.reset();
        assert!(*client.config() == Config::from_env());
    }

    #[test]
    fn test_debug_hides_token() {
        let client = client();
        client.configure(|c| c.set_token("very-secret"));
        let rendered = format!("{:?}", client);
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("transport_initialized: false"));
    }
}
