//! 客户端配置：令牌、服务地址、API 版本、限流重试与自动分批开关。
//!
//! Client configuration.
//!
//! Every field resolves its default in the same order: an environment variable
//! override first, then a built-in constant. A [`Config`] is owned by the
//! [`MonkeyLearnClient`](crate::MonkeyLearnClient) and read once per request, so
//! changes made through [`MonkeyLearnClient::configure`](crate::MonkeyLearnClient::configure)
//! apply to the next call.
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `MONKEYLEARN_TOKEN` | `token` | none |
//! | `MONKEYLEARN_API_BASE_URL` | `base_url` | `https://api.monkeylearn.com/v3/` |
//! | `MONKEYLEARN_API_VERSION` | `api_version` | `v3` |
//! | `MONKEYLEARN_RETRY_IF_THROTTLE` | `retry_if_throttle` | `true` |
//! | `MONKEYLEARN_AUTO_BATCH` | `auto_batch` | `true` |

use crate::client::ThrottleRetryPolicy;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_TOKEN: &str = "MONKEYLEARN_TOKEN";
pub const ENV_BASE_URL: &str = "MONKEYLEARN_API_BASE_URL";
pub const ENV_API_VERSION: &str = "MONKEYLEARN_API_VERSION";
pub const ENV_RETRY_IF_THROTTLE: &str = "MONKEYLEARN_RETRY_IF_THROTTLE";
pub const ENV_AUTO_BATCH: &str = "MONKEYLEARN_AUTO_BATCH";

pub const DEFAULT_BASE_URL: &str = "https://api.monkeylearn.com/v3/";
pub const DEFAULT_RETRY_IF_THROTTLE: bool = true;
pub const DEFAULT_AUTO_BATCH: bool = true;
pub const DEFAULT_BATCH_SIZE: usize = 200;
pub const MAX_BATCH_SIZE: usize = 200;
pub const MIN_BATCH_SIZE: usize = 1;

/// Values treated as "false" for boolean environment overrides (case-insensitive).
const FALSE_VALUES: &[&str] = &["", "0", "off", "false", "f", "nil"];

/// Service API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    V2,
    #[default]
    V3,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V2 => "v2",
            ApiVersion::V3 => "v3",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v2" | "2" => Ok(ApiVersion::V2),
            "v3" | "3" => Ok(ApiVersion::V3),
            other => Err(Error::validation_with_context(
                format!("The api_version `{}` is not supported, choose from v2, v3.", other),
                ErrorContext::new()
                    .with_field_path("api_version")
                    .with_source("version_validator"),
            )),
        }
    }
}

/// Interprets a boolean environment override.
pub fn parse_env_bool(raw: &str) -> bool {
    let v = raw.trim().to_ascii_lowercase();
    !FALSE_VALUES.contains(&v.as_str())
}

/// Ensures exactly one trailing `/`.
pub(crate) fn normalize_base_url(raw: &str) -> String {
    format!("{}/", raw.trim().trim_end_matches('/'))
}

/// Client configuration shared by every request of a client.
#[derive(Clone, PartialEq)]
pub struct Config {
    token: Option<String>,
    base_url: String,
    api_version: ApiVersion,
    retry_if_throttle: bool,
    auto_batch: bool,
    throttle_retry: ThrottleRetryPolicy,
}

impl Config {
    /// Built-in defaults with no token. Ignores the environment.
    pub fn builtin() -> Self {
        Self {
            token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: ApiVersion::default(),
            retry_if_throttle: DEFAULT_RETRY_IF_THROTTLE,
            auto_batch: DEFAULT_AUTO_BATCH,
            throttle_retry: ThrottleRetryPolicy::default(),
        }
    }

    /// Resolve every field from the process environment, falling back to constants.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve every field through `lookup`, falling back to constants.
    ///
    /// `from_env` is `from_lookup(|k| std::env::var(k).ok())`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::builtin();

        config.token = lookup(ENV_TOKEN);
        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = normalize_base_url(&url);
        }
        if let Some(raw) = lookup(ENV_API_VERSION) {
            match raw.parse::<ApiVersion>() {
                Ok(v) => config.api_version = v,
                Err(_) => tracing::warn!(
                    value = raw.as_str(),
                    "ignoring unsupported {}, using {}",
                    ENV_API_VERSION,
                    config.api_version
                ),
            }
        }
        if let Some(raw) = lookup(ENV_RETRY_IF_THROTTLE) {
            config.retry_if_throttle = parse_env_bool(&raw);
        }
        if let Some(raw) = lookup(ENV_AUTO_BATCH) {
            config.auto_batch = parse_env_bool(&raw);
        }
        config
    }

    /// Load a YAML (or JSON) document and overlay it on the environment defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        Self::from_env().overlay_yaml(&raw).map_err(|e| match e {
            Error::Configuration { message, context } => Error::Configuration {
                message,
                context: context.with_details(format!("file: {}", path.display())),
            },
            other => other,
        })
    }

    /// Overlay the fields present in a YAML (or JSON) document on `self`.
    ///
    /// Recognised keys: `token`, `base_url`, `api_version`, `retry_if_throttle`,
    /// `auto_batch`, `throttle_max_retries`, `throttle_max_total_wait_secs`.
    pub fn overlay_yaml(mut self, raw: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(raw).map_err(|e| {
            Error::configuration_with_context(
                format!("Invalid configuration document: {}", e),
                ErrorContext::new().with_source("config_file"),
            )
        })?;

        if let Some(token) = file.token {
            self.token = Some(token);
        }
        if let Some(url) = file.base_url {
            self.base_url = normalize_base_url(&url);
        }
        if let Some(v) = file.api_version {
            self.api_version = v;
        }
        if let Some(b) = file.retry_if_throttle {
            self.retry_if_throttle = b;
        }
        if let Some(b) = file.auto_batch {
            self.auto_batch = b;
        }
        if let Some(n) = file.throttle_max_retries {
            self.throttle_retry = self.throttle_retry.with_max_retries(n);
        }
        if let Some(secs) = file.throttle_max_total_wait_secs {
            self.throttle_retry = self
                .throttle_retry
                .with_max_total_wait(Duration::from_secs(secs));
        }
        Ok(self)
    }

    /// Restore every field to its environment/built-in default.
    pub fn reset(&mut self) {
        self.reset_with(|key| std::env::var(key).ok());
    }

    /// Like [`reset`](Self::reset), resolving overrides through `lookup`.
    pub fn reset_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        *self = Self::from_lookup(lookup);
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Base URL, always ending with exactly one `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, url: impl AsRef<str>) {
        self.base_url = normalize_base_url(url.as_ref());
    }

    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    pub fn set_api_version(&mut self, version: ApiVersion) {
        self.api_version = version;
    }

    pub fn retry_if_throttle(&self) -> bool {
        self.retry_if_throttle
    }

    pub fn set_retry_if_throttle(&mut self, enable: bool) {
        self.retry_if_throttle = enable;
    }

    pub fn auto_batch(&self) -> bool {
        self.auto_batch
    }

    pub fn set_auto_batch(&mut self, enable: bool) {
        self.auto_batch = enable;
    }

    pub fn throttle_retry(&self) -> &ThrottleRetryPolicy {
        &self.throttle_retry
    }

    pub fn set_throttle_retry(&mut self, policy: ThrottleRetryPolicy) {
        self.throttle_retry = policy;
    }

    /// Base URL for requests made with `version`.
    ///
    /// When the configured URL ends in a version segment (`.../v2/`, `.../v3/`)
    /// that segment is replaced; any other URL is used unchanged.
    pub fn base_url_for(&self, version: ApiVersion) -> String {
        let trimmed = self.base_url.trim_end_matches('/');
        match trimmed.rsplit_once('/') {
            Some((head, last)) if last == "v2" || last == "v3" => {
                format!("{}/{}/", head, version.as_str())
            }
            _ => self.base_url.clone(),
        }
    }
}

impl Default for Config {
    /// Same as [`Config::from_env`].
    fn default() -> Self {
        Self::from_env()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("retry_if_throttle", &self.retry_if_throttle)
            .field("auto_batch", &self.auto_batch)
            .field("throttle_retry", &self.throttle_retry)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    token: Option<String>,
    base_url: Option<String>,
    api_version: Option<ApiVersion>,
    retry_if_throttle: Option<bool>,
    auto_batch: Option<bool>,
    throttle_max_retries: Option<u32>,
    throttle_max_total_wait_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_builtin_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.token(), None);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.api_version(), ApiVersion::V3);
        assert!(config.retry_if_throttle());
        assert!(config.auto_batch());
        assert!(config.throttle_retry().is_unbounded());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_TOKEN, "abc123"),
            (ENV_BASE_URL, "http://localhost:8000/v2///"),
            (ENV_API_VERSION, "V2"),
            (ENV_RETRY_IF_THROTTLE, "Off"),
            (ENV_AUTO_BATCH, "yes"),
        ]));
        assert_eq!(config.token(), Some("abc123"));
        assert_eq!(config.base_url(), "http://localhost:8000/v2/");
        assert_eq!(config.api_version(), ApiVersion::V2);
        assert!(!config.retry_if_throttle());
        assert!(config.auto_batch());
    }

    #[test]
    fn test_invalid_api_version_env_falls_back() {
        let config = Config::from_lookup(lookup_from(&[(ENV_API_VERSION, "v9")]));
        assert_eq!(config.api_version(), ApiVersion::V3);
    }

    #[test]
    fn test_parse_env_bool() {
        for falsy in ["", "0", "off", "OFF", "false", "False", "f", "F", "nil", "NIL", " false "] {
            assert!(!parse_env_bool(falsy), "{:?} should be false", falsy);
        }
        for truthy in ["1", "on", "true", "t", "yes", "anything"] {
            assert!(parse_env_bool(truthy), "{:?} should be true", truthy);
        }
    }

    #[test]
    fn test_base_url_normalization() {
        let mut config = Config::builtin();
        config.set_base_url("https://example.com/api");
        assert_eq!(config.base_url(), "https://example.com/api/");
        config.set_base_url("https://example.com/api//");
        assert_eq!(config.base_url(), "https://example.com/api/");
    }

    #[test]
    fn test_base_url_for_version() {
        let config = Config::builtin();
        assert_eq!(
            config.base_url_for(ApiVersion::V2),
            "https://api.monkeylearn.com/v2/"
        );
        assert_eq!(config.base_url_for(ApiVersion::V3), DEFAULT_BASE_URL);

        let mut custom = Config::builtin();
        custom.set_base_url("http://127.0.0.1:1234");
        assert_eq!(custom.base_url_for(ApiVersion::V2), "http://127.0.0.1:1234/");
    }

    #[test]
    fn test_api_version_parse() {
        assert_eq!("v2".parse::<ApiVersion>().unwrap(), ApiVersion::V2);
        assert_eq!("3".parse::<ApiVersion>().unwrap(), ApiVersion::V3);
        let err = "v1".parse::<ApiVersion>().unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_overlay_yaml() {
        let config = Config::builtin()
            .overlay_yaml(
                "token: from-file\nbase_url: http://localhost:9000\napi_version: v2\nauto_batch: false\nthrottle_max_retries: 3\n",
            )
            .unwrap();
        assert_eq!(config.token(), Some("from-file"));
        assert_eq!(config.base_url(), "http://localhost:9000/");
        assert_eq!(config.api_version(), ApiVersion::V2);
        assert!(!config.auto_batch());
        assert!(config.retry_if_throttle());
        assert_eq!(config.throttle_retry().max_retries, Some(3));
    }

    #[test]
    fn test_reset_restores_builtin_defaults() {
        let mut config = Config::builtin();
        config.set_token("abc");
        config.set_base_url("http://x/");
        config.set_api_version(ApiVersion::V2);
        config.set_retry_if_throttle(false);
        config.set_auto_batch(false);
        config.set_throttle_retry(ThrottleRetryPolicy::unbounded().with_max_retries(1));

        config.reset_with(|_| None);

        assert!(config == Config::builtin());
        assert_eq!(config.token(), None);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.api_version(), ApiVersion::V3);
        assert!(config.retry_if_throttle());
        assert!(config.auto_batch());
        assert!(config.throttle_retry().is_unbounded());
    }

    #[test]
    fn test_reset_prefers_env_over_builtin() {
        let mut config = Config::builtin();
        config.set_token("abc");
        config.set_auto_batch(true);
        config.set_api_version(ApiVersion::V3);

        config.reset_with(lookup_from(&[
            (ENV_BASE_URL, "http://localhost:8000/v2"),
            (ENV_API_VERSION, "v2"),
            (ENV_AUTO_BATCH, "false"),
        ]));

        assert_eq!(config.token(), None);
        assert_eq!(config.base_url(), "http://localhost:8000/v2/");
        assert_eq!(config.api_version(), ApiVersion::V2);
        assert!(!config.auto_batch());
        assert!(config.retry_if_throttle());
    }

    #[test]
    fn test_overlay_rejects_unknown_keys() {
        let err = Config::builtin().overlay_yaml("tokn: typo\n").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_overlay_accepts_json() {
        let config = Config::builtin()
            .overlay_yaml(r#"{"retry_if_throttle": false}"#)
            .unwrap();
        assert!(!config.retry_if_throttle());
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = Config::builtin();
        config.set_token("super-secret");
        let dbg = format!("{:?}", config);
        assert!(!dbg.contains("super-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
