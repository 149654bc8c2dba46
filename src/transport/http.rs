use crate::{Error, ErrorContext, Result};
use once_cell::sync::OnceCell;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, Proxy};
use std::env;
use std::time::Duration;
use url::Url;

pub const ENV_HTTP_TIMEOUT_SECS: &str = "MONKEYLEARN_HTTP_TIMEOUT_SECS";
pub const ENV_PROXY_URL: &str = "MONKEYLEARN_PROXY_URL";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings used when the HTTP handle is first created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSettings {
    /// Per-attempt timeout. `None` disables it.
    pub timeout: Option<Duration>,
    pub proxy_url: Option<String>,
    pub user_agent: String,
}

impl TransportSettings {
    /// Minimal production-friendly defaults (env-overridable).
    pub fn from_env() -> Self {
        let timeout_secs = env::var(ENV_HTTP_TIMEOUT_SECS)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self {
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            proxy_url: env::var(ENV_PROXY_URL).ok().filter(|s| !s.trim().is_empty()),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            proxy_url: None,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("rust-sdk/{}", env!("CARGO_PKG_VERSION"))
}

/// Status, headers and body of one HTTP exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Owns the process-lifetime HTTP handle.
///
/// The `reqwest::Client` is built on first use; concurrent first calls race
/// on the `OnceCell` and exactly one handle is kept.
pub struct HttpTransport {
    client: OnceCell<reqwest::Client>,
    settings: TransportSettings,
}

impl HttpTransport {
    pub fn new(settings: TransportSettings) -> Self {
        Self {
            client: OnceCell::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &TransportSettings {
        &self.settings
    }

    /// True once the HTTP handle has been created, i.e. after the first send.
    pub fn is_initialized(&self) -> bool {
        self.client.get().is_some()
    }

    fn client(&self) -> Result<&reqwest::Client> {
        self.client.get_or_try_init(|| {
            let mut builder = reqwest::Client::builder().user_agent(self.settings.user_agent.as_str());
            if let Some(timeout) = self.settings.timeout {
                builder = builder.timeout(timeout);
            }
            if let Some(proxy_url) = &self.settings.proxy_url {
                let proxy = Proxy::all(proxy_url).map_err(|e| {
                    Error::configuration_with_context(
                        format!("Invalid proxy URL: {}", e),
                        ErrorContext::new()
                            .with_field_path(ENV_PROXY_URL)
                            .with_source("http_transport"),
                    )
                })?;
                builder = builder.proxy(proxy);
            }
            builder
                .build()
                .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))
        })
    }

    fn auth_headers(&self, token: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Token {}", token)).map_err(|_| {
            Error::configuration_with_context(
                "The API token contains characters not allowed in an HTTP header",
                ErrorContext::new()
                    .with_field_path("token")
                    .with_source("http_transport"),
            )
        })?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(ua) = HeaderValue::from_str(&self.settings.user_agent) {
            headers.insert(USER_AGENT, ua);
        }
        Ok(headers)
    }

    /// Perform a single HTTP exchange. No retry happens here.
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        token: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<RawResponse> {
        let headers = self.auth_headers(token)?;
        let mut request = self.client()?.request(method, url).headers(headers);
        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?
            .to_vec();

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_is_lazy() {
        let transport = HttpTransport::new(TransportSettings::default());
        assert!(!transport.is_initialized());
        transport.client().unwrap();
        assert!(transport.is_initialized());
    }

    #[test]
    fn test_auth_headers() {
        let transport = HttpTransport::new(TransportSettings::default());
        let headers = transport.auth_headers("abc").unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Token abc");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(headers
            .get(USER_AGENT)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("rust-sdk/"));
    }

    #[test]
    fn test_invalid_token_is_configuration_error() {
        let transport = HttpTransport::new(TransportSettings::default());
        let err = transport.auth_headers("bad\ntoken").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_invalid_proxy_is_configuration_error() {
        let transport = HttpTransport::new(TransportSettings {
            proxy_url: Some("::not a url::".to_string()),
            ..TransportSettings::default()
        });
        assert!(matches!(transport.client(), Err(Error::Configuration { .. })));
        assert!(!transport.is_initialized());
    }
}
