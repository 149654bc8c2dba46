//! Mock HTTP server setup for integration tests

#![allow(dead_code)]

use mockito::{Matcher, Mock, Server, ServerGuard};
use monkeylearn_rust::{Config, MonkeyLearnClient, MonkeyLearnClientBuilder};
use serde_json::Value;

pub const TOKEN: &str = "test-token";

/// Test fixture that owns a mock server and builds clients pointed at it.
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = format!("{}/v3/", server.url());
        Self { server, base_url }
    }

    /// Builder with built-in defaults (the environment is ignored), the test
    /// token and no transport timeout so tests may pause the clock.
    pub fn builder(&self) -> MonkeyLearnClientBuilder {
        MonkeyLearnClient::builder()
            .config(Config::builtin())
            .token(TOKEN)
            .base_url(&self.base_url)
            .without_timeout()
    }

    pub fn client(&self) -> MonkeyLearnClient {
        self.builder().build().expect("client")
    }

    /// A JSON response mock with the quota headers set.
    pub async fn mock_json(
        &mut self,
        method: &str,
        path: &str,
        status: usize,
        body: &Value,
        remaining: u64,
        used: u64,
    ) -> Mock {
        self.server
            .mock(method, path)
            .match_header("authorization", format!("Token {}", TOKEN).as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_header("x-query-limit-limit", "10000")
            .with_header("x-query-limit-remaining", &remaining.to_string())
            .with_header("x-query-limit-request-queries", &used.to_string())
            .with_body(body.to_string())
            .create_async()
            .await
    }

    /// An error response mock, served exactly `hits` times.
    pub async fn mock_error(
        &mut self,
        method: &str,
        path: &str,
        status: usize,
        error_code: Option<&str>,
        detail: &str,
        hits: usize,
    ) -> Mock {
        let mut body = serde_json::json!({ "detail": detail });
        if let Some(code) = error_code {
            body["error_code"] = Value::String(code.to_string());
        }
        self.server
            .mock(method, path)
            .match_query(Matcher::Any)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(hits)
            .create_async()
            .await
    }
}
