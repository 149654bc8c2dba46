//! Response envelopes.
//!
//! [`Response`] is the decoded form of one HTTP response; [`MultiResponse`]
//! folds the envelopes of a batched call into one logical result.

use crate::transport::RawResponse;
use crate::{Error, ErrorContext, Result};
use reqwest::header::HeaderMap;
use serde_json::Value;

pub const HEADER_QUERY_LIMIT: &str = "x-query-limit-limit";
pub const HEADER_QUERY_REMAINING: &str = "x-query-limit-remaining";
pub const HEADER_REQUEST_QUERIES: &str = "x-query-limit-request-queries";

/// Missing or non-numeric quota headers read as 0.
fn header_u64(headers: &HeaderMap, name: &str) -> u64 {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(0)
}

/// One successful HTTP response: status, decoded JSON body and quota counters.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: u16,
    body: Option<Value>,
    plan_queries_allowed: u64,
    plan_queries_remaining: u64,
    request_queries_used: u64,
}

impl Response {
    /// Decode a raw exchange. An empty body (e.g. `204 No Content`) becomes `None`.
    pub fn from_parts(status: u16, headers: &HeaderMap, body: &[u8]) -> Result<Self> {
        let body = if body.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            Some(serde_json::from_slice(body).map_err(|e| {
                Error::runtime_with_context(
                    format!("Failed to parse response JSON: {}", e),
                    ErrorContext::new()
                        .with_details(format!("status: {}", status))
                        .with_source("json_parse"),
                )
            })?)
        };

        Ok(Self {
            status,
            body,
            plan_queries_allowed: header_u64(headers, HEADER_QUERY_LIMIT),
            plan_queries_remaining: header_u64(headers, HEADER_QUERY_REMAINING),
            request_queries_used: header_u64(headers, HEADER_REQUEST_QUERIES),
        })
    }

    pub fn from_raw(raw: &RawResponse) -> Result<Self> {
        Self::from_parts(raw.status, &raw.headers, &raw.body)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn into_body(self) -> Option<Value> {
        self.body
    }

    /// `X-Query-Limit-Limit`
    pub fn plan_queries_allowed(&self) -> u64 {
        self.plan_queries_allowed
    }

    /// `X-Query-Limit-Remaining`
    pub fn plan_queries_remaining(&self) -> u64 {
        self.plan_queries_remaining
    }

    /// `X-Query-Limit-Request-Queries`
    pub fn request_queries_used(&self) -> u64 {
        self.request_queries_used
    }
}

/// Elements a body contributes to an aggregated result.
///
/// v3 bodies are JSON arrays; v2 bodies wrap the array as `{"result": [...]}`.
fn sequence_items(body: &Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items.clone(),
        Value::Object(map) => match map.get("result") {
            Some(Value::Array(items)) => items.clone(),
            _ => vec![body.clone()],
        },
        other => vec![other.clone()],
    }
}

/// The envelopes of one logical (possibly batched) call, folded together.
///
/// - `body` concatenates every envelope's items in order.
/// - `plan_queries_allowed` / `plan_queries_remaining` come from the last envelope.
/// - `request_queries_used` is the sum over all envelopes.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiResponse {
    responses: Vec<Response>,
    body: Value,
    plan_queries_allowed: u64,
    plan_queries_remaining: u64,
    request_queries_used: u64,
}

impl MultiResponse {
    /// Fold `responses`. Fails if the sequence is empty.
    pub fn new(responses: Vec<Response>) -> Result<Self> {
        let last = responses.last().ok_or_else(|| {
            Error::runtime_with_context(
                "Cannot aggregate an empty response sequence",
                ErrorContext::new().with_source("multi_response"),
            )
        })?;
        let plan_queries_allowed = last.plan_queries_allowed;
        let plan_queries_remaining = last.plan_queries_remaining;

        let request_queries_used = responses.iter().map(|r| r.request_queries_used).sum();
        let body = Value::Array(
            responses
                .iter()
                .filter_map(|r| r.body.as_ref())
                .flat_map(sequence_items)
                .collect(),
        );

        Ok(Self {
            responses,
            body,
            plan_queries_allowed,
            plan_queries_remaining,
            request_queries_used,
        })
    }

    /// The individual envelopes, in request order.
    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    /// Aggregated body; always a JSON array.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Aggregated result items.
    pub fn items(&self) -> &[Value] {
        self.body.as_array().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn into_body(self) -> Value {
        self.body
    }

    pub fn plan_queries_allowed(&self) -> u64 {
        self.plan_queries_allowed
    }

    pub fn plan_queries_remaining(&self) -> u64 {
        self.plan_queries_remaining
    }

    pub fn request_queries_used(&self) -> u64 {
        self.request_queries_used
    }
}

impl From<Response> for MultiResponse {
    fn from(response: Response) -> Self {
        let body = response
            .body
            .as_ref()
            .map(sequence_items)
            .unwrap_or_default();
        Self {
            body: Value::Array(body),
            plan_queries_allowed: response.plan_queries_allowed,
            plan_queries_remaining: response.plan_queries_remaining,
            request_queries_used: response.request_queries_used,
            responses: vec![response],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};
    use serde_json::json;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut h = HeaderMap::new();
        for (k, v) in pairs {
            h.insert(
                HeaderName::from_bytes(k.as_bytes()).unwrap(),
                HeaderValue::from_str(v).unwrap(),
            );
        }
        h
    }

    fn envelope(body: Value, limit: &str, remaining: &str, used: &str) -> Response {
        Response::from_parts(
            200,
            &headers(&[
                ("X-Query-Limit-Limit", limit),
                ("X-Query-Limit-Remaining", remaining),
                ("X-Query-Limit-Request-Queries", used),
            ]),
            body.to_string().as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn test_envelope_round_trip() {
        let resp = Response::from_parts(
            200,
            &headers(&[("X-Query-Limit-Remaining", "7")]),
            br#"{"result": [1, 2]}"#,
        )
        .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.body(), Some(&json!({"result": [1, 2]})));
        assert_eq!(resp.plan_queries_remaining(), 7);
        assert_eq!(resp.plan_queries_allowed(), 0);
        assert_eq!(resp.request_queries_used(), 0);
    }

    #[test]
    fn test_non_numeric_headers_are_zero() {
        let resp = Response::from_parts(
            200,
            &headers(&[
                ("X-Query-Limit-Limit", "lots"),
                ("X-Query-Limit-Remaining", "-3"),
                ("X-Query-Limit-Request-Queries", " 4 "),
            ]),
            b"[]",
        )
        .unwrap();
        assert_eq!(resp.plan_queries_allowed(), 0);
        assert_eq!(resp.plan_queries_remaining(), 0);
        assert_eq!(resp.request_queries_used(), 4);
    }

    #[test]
    fn test_empty_body_is_none() {
        let resp = Response::from_parts(204, &HeaderMap::new(), b"").unwrap();
        assert_eq!(resp.body(), None);
    }

    #[test]
    fn test_malformed_body_is_error() {
        let err = Response::from_parts(200, &HeaderMap::new(), b"{not json").unwrap_err();
        assert!(matches!(err, Error::Runtime { .. }));
    }

    #[test]
    fn test_multi_response_aggregation() {
        let multi = MultiResponse::new(vec![
            envelope(json!([{"text": "a"}, {"text": "b"}]), "1000", "98", "2"),
            envelope(json!([{"text": "c"}]), "1000", "97", "1"),
            envelope(json!([{"text": "d"}]), "1000", "96", "1"),
        ])
        .unwrap();
        assert_eq!(multi.responses().len(), 3);
        assert_eq!(multi.items().len(), 4);
        assert_eq!(multi.body()[2], json!({"text": "c"}));
        assert_eq!(multi.request_queries_used(), 4);
        assert_eq!(multi.plan_queries_remaining(), 96);
        assert_eq!(multi.plan_queries_allowed(), 1000);
    }

    #[test]
    fn test_multi_response_unwraps_v2_result() {
        let multi = MultiResponse::new(vec![
            envelope(json!({"result": [[1], [2]]}), "10", "9", "2"),
            envelope(json!({"result": [[3]]}), "10", "8", "1"),
        ])
        .unwrap();
        assert_eq!(multi.body(), &json!([[1], [2], [3]]));
    }

    #[test]
    fn test_multi_response_rejects_empty() {
        assert!(MultiResponse::new(Vec::new()).is_err());
    }

    #[test]
    fn test_single_response_into_multi() {
        let multi: MultiResponse = envelope(json!([1, 2]), "5", "3", "2").into();
        assert_eq!(multi.items(), &[json!(1), json!(2)]);
        assert_eq!(multi.request_queries_used(), 2);
        assert_eq!(multi.plan_queries_remaining(), 3);
    }
}
