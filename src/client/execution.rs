//! Request executor: authentication, URL resolution and retry on throttle.

use crate::client::core::MonkeyLearnClient;
use crate::client::endpoint::resolve_url;
use crate::client::policy::{throttle_wait, Decision};
use crate::client::types::{CallStats, CancelHandle};
use crate::config::ApiVersion;
use crate::error::ResponseError;
use crate::response::Response;
use crate::{Error, ErrorContext, Result};
use reqwest::Method;
use serde_json::Value;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// One logical API call: method, relative path, optional JSON body and query.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
    /// Overrides the configured API version for this call only.
    pub api_version: Option<ApiVersion>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
            api_version: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn with_query_pairs<I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.query.extend(pairs);
        self
    }

    pub fn with_api_version(mut self, version: Option<ApiVersion>) -> Self {
        self.api_version = version;
        self
    }
}

fn cancelled_error() -> Error {
    Error::Cancelled {
        message: "cancelled by caller".to_string(),
    }
}

/// Run `fut` unless `cancel` fires first.
async fn cancellable<T, F>(cancel: Option<&CancelHandle>, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match cancel {
        None => fut.await,
        Some(handle) => {
            tokio::select! {
                biased;
                _ = handle.cancelled() => Err(cancelled_error()),
                res = fut => res,
            }
        }
    }
}

impl MonkeyLearnClient {
    /// Convenience wrapper around [`execute`](Self::execute).
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        query: Vec<(String, String)>,
    ) -> Result<Response> {
        let mut request = ApiRequest::new(method, path).with_query_pairs(query);
        request.body = body;
        self.execute(&request).await
    }

    /// Perform one logical request, transparently retrying throttled attempts.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Response> {
        self.execute_with_stats(request, None)
            .await
            .map(|(response, _)| response)
    }

    /// Like [`execute`](Self::execute), also returning per-call stats.
    ///
    /// - Without a token, fails with a configuration error before any I/O.
    /// - A 429 carrying a plan or concurrency rate-limit code is retried when
    ///   `retry_if_throttle` is on and the throttle policy allows it. The
    ///   resubmission is identical to the first attempt.
    /// - Any other non-2xx status is returned as [`Error::Response`].
    /// - `cancel` aborts both in-flight attempts and throttle waits.
    pub async fn execute_with_stats(
        &self,
        request: &ApiRequest,
        cancel: Option<&CancelHandle>,
    ) -> Result<(Response, CallStats)> {
        let config = self.config();
        let token = config.token().ok_or_else(|| {
            Error::configuration_with_context(
                "Please initialize the MonkeyLearn client with your API token",
                ErrorContext::new()
                    .with_field_path("token")
                    .with_details(format!("set {} or configure a token", crate::config::ENV_TOKEN))
                    .with_source("request_executor"),
            )
        })?;

        let version = request.api_version.unwrap_or_else(|| config.api_version());
        let url = resolve_url(&config.base_url_for(version), &request.path, &request.query)?;
        let policy = *config.throttle_retry();

        let client_request_id = Uuid::new_v4().to_string();
        let start = Instant::now();
        let mut retry_count: u32 = 0;
        let mut waited = Duration::ZERO;

        loop {
            if cancel.map_or(false, CancelHandle::is_cancelled) {
                return Err(cancelled_error());
            }

            debug!(
                method = %request.method,
                endpoint = request.path.as_str(),
                attempt = retry_count + 1,
                client_request_id = client_request_id.as_str(),
                "sending request"
            );
            let raw = cancellable(
                cancel,
                self.transport.send(
                    request.method.clone(),
                    url.clone(),
                    token,
                    request.body.as_ref(),
                ),
            )
            .await?;

            if (200..300).contains(&raw.status) {
                let response = Response::from_raw(&raw)?;
                let duration_ms = start.elapsed().as_millis();
                debug!(
                    http_status = raw.status,
                    client_request_id = client_request_id.as_str(),
                    endpoint = request.path.as_str(),
                    retry_count,
                    duration_ms,
                    "monkeylearn request succeeded"
                );
                let stats = CallStats {
                    method: request.method.to_string(),
                    endpoint: request.path.clone(),
                    http_status: raw.status,
                    retry_count,
                    throttle_wait: waited,
                    duration_ms,
                    client_request_id,
                };
                return Ok((response, stats));
            }

            let error = ResponseError::from_body(raw.status, &raw.body);

            if config.retry_if_throttle() {
                if let Some(delay) = throttle_wait(&error) {
                    match policy.decide(retry_count, waited, delay) {
                        Decision::Retry { delay } => {
                            warn!(
                                error_kind = error.kind.name(),
                                delay_ms = delay.as_millis() as u64,
                                attempt = retry_count + 1,
                                client_request_id = client_request_id.as_str(),
                                endpoint = request.path.as_str(),
                                "throttled, waiting before resubmitting"
                            );
                            cancellable(cancel, async {
                                tokio::time::sleep(delay).await;
                                Ok(())
                            })
                            .await?;
                            retry_count += 1;
                            waited = waited.saturating_add(delay);
                            continue;
                        }
                        Decision::Fail => {
                            warn!(
                                error_kind = error.kind.name(),
                                retry_count,
                                waited_ms = waited.as_millis() as u64,
                                client_request_id = client_request_id.as_str(),
                                "throttle retry budget exhausted"
                            );
                        }
                    }
                }
            }

            info!(
                http_status = raw.status,
                error_kind = error.kind.name(),
                error_code = error.error_code.as_deref().unwrap_or(""),
                client_request_id = client_request_id.as_str(),
                endpoint = request.path.as_str(),
                retry_count,
                duration_ms = start.elapsed().as_millis(),
                "monkeylearn request failed"
            );
            return Err(error.into());
        }
    }
}
