//! Pipelines: run a chain of models over one JSON document.

use crate::client::{build_endpoint, ApiRequest, MonkeyLearnClient};
use crate::response::Response;
use crate::{Error, ErrorContext, Result};
use serde_json::Value;

/// Pipeline endpoints, borrowed from a [`MonkeyLearnClient`].
#[derive(Debug, Clone, Copy)]
pub struct Pipelines<'a> {
    client: &'a MonkeyLearnClient,
}

impl<'a> Pipelines<'a> {
    pub(crate) fn new(client: &'a MonkeyLearnClient) -> Self {
        Self { client }
    }

    /// POST `data` to `pipelines/<model_id>/run/`. `data` must be a JSON object.
    pub async fn run(&self, model_id: &str, data: &Value, sandbox: bool) -> Result<Response> {
        if !data.is_object() {
            return Err(Error::validation_with_context(
                "The data param must be a JSON object",
                ErrorContext::new()
                    .with_field_path("data")
                    .with_details(format!("got {}", json_type(data)))
                    .with_source("pipelines"),
            ));
        }
        let mut request =
            ApiRequest::post(build_endpoint(&["pipelines", model_id, "run"])).with_body(data.clone());
        if sandbox {
            request = request.with_query("sandbox", true);
        }
        self.client.execute(&request).await
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;

    #[tokio::test]
    async fn test_run_rejects_non_object_before_io() {
        let client = crate::MonkeyLearnClient::builder()
            .config(Config::builtin())
            .token("t")
            .build()
            .unwrap();
        let err = client
            .pipelines()
            .run("pi_1", &json!(["a", "b"]), false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert!(err.to_string().contains("got array"));
        assert!(!client.transport().is_initialized());
    }
}
