//! Workflow, step, data and metadata endpoints.

use super::types::{DataListOptions, StepParams, WorkflowParams};
use crate::client::{build_endpoint, ApiRequest, MonkeyLearnClient};
use crate::response::Response;
use crate::{Error, ErrorContext, Result};
use serde::Serialize;
use serde_json::{json, Map, Value};

fn endpoint(segments: &[&str]) -> String {
    let mut all = Vec::with_capacity(segments.len() + 1);
    all.push("workflows");
    all.extend_from_slice(segments);
    build_endpoint(&all)
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Workflow endpoints, borrowed from a [`MonkeyLearnClient`].
#[derive(Debug, Clone, Copy)]
pub struct Workflows<'a> {
    client: &'a MonkeyLearnClient,
}

impl<'a> Workflows<'a> {
    pub(crate) fn new(client: &'a MonkeyLearnClient) -> Self {
        Self { client }
    }

    pub fn steps(&self) -> WorkflowSteps<'a> {
        WorkflowSteps {
            client: self.client,
        }
    }

    pub fn data(&self) -> WorkflowData<'a> {
        WorkflowData {
            client: self.client,
        }
    }

    pub fn metadata(&self) -> WorkflowMetadata<'a> {
        WorkflowMetadata {
            client: self.client,
        }
    }

    pub async fn create(&self, name: &str, params: &WorkflowParams) -> Result<Response> {
        let mut body = object(serde_json::to_value(params)?);
        body.insert("name".to_string(), json!(name));
        self.client
            .execute(&ApiRequest::post(endpoint(&[])).with_body(Value::Object(body)))
            .await
    }

    pub async fn detail(&self, workflow_id: &str) -> Result<Response> {
        self.client
            .execute(&ApiRequest::get(endpoint(&[workflow_id])))
            .await
    }

    pub async fn delete(&self, workflow_id: &str) -> Result<Response> {
        self.client
            .execute(&ApiRequest::delete(endpoint(&[workflow_id])))
            .await
    }
}

/// `workflows/<workflow_id>/steps/`
#[derive(Debug, Clone, Copy)]
pub struct WorkflowSteps<'a> {
    client: &'a MonkeyLearnClient,
}

impl<'a> WorkflowSteps<'a> {
    pub async fn create(&self, workflow_id: &str, step: &StepParams) -> Result<Response> {
        let body = serde_json::to_value(step)?;
        self.client
            .execute(&ApiRequest::post(endpoint(&[workflow_id, "steps"])).with_body(body))
            .await
    }

    pub async fn detail(&self, workflow_id: &str, step_id: i64) -> Result<Response> {
        let step_id = step_id.to_string();
        self.client
            .execute(&ApiRequest::get(endpoint(&[
                workflow_id,
                "steps",
                step_id.as_str(),
            ])))
            .await
    }

    pub async fn delete(&self, workflow_id: &str, step_id: i64) -> Result<Response> {
        let step_id = step_id.to_string();
        self.client
            .execute(&ApiRequest::delete(endpoint(&[
                workflow_id,
                "steps",
                step_id.as_str(),
            ])))
            .await
    }
}

/// `workflows/<workflow_id>/data/`
#[derive(Debug, Clone, Copy)]
pub struct WorkflowData<'a> {
    client: &'a MonkeyLearnClient,
}

impl<'a> WorkflowData<'a> {
    /// Upload items to be processed by the workflow.
    pub async fn create<T: Serialize>(&self, workflow_id: &str, data: &[T]) -> Result<Response> {
        if data.is_empty() {
            return Err(Error::validation_with_context(
                "The data param must contain at least one item",
                ErrorContext::new()
                    .with_field_path("data")
                    .with_source("workflows"),
            ));
        }
        let body = json!({ "data": serde_json::to_value(data)? });
        self.client
            .execute(&ApiRequest::post(endpoint(&[workflow_id, "data"])).with_body(body))
            .await
    }

    pub async fn list(&self, workflow_id: &str, options: &DataListOptions) -> Result<Response> {
        let request =
            ApiRequest::get(endpoint(&[workflow_id, "data"])).with_query_pairs(options.to_query());
        self.client.execute(&request).await
    }
}

/// `workflows/<workflow_id>/metadata/`
#[derive(Debug, Clone, Copy)]
pub struct WorkflowMetadata<'a> {
    client: &'a MonkeyLearnClient,
}

impl<'a> WorkflowMetadata<'a> {
    /// Declare a custom metadata field, e.g. `("rating", "integer")`.
    pub async fn create(&self, workflow_id: &str, name: &str, data_type: &str) -> Result<Response> {
        let body = json!({ "name": name, "type": data_type });
        self.client
            .execute(&ApiRequest::post(endpoint(&[workflow_id, "metadata"])).with_body(body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_endpoints() {
        assert_eq!(endpoint(&[]), "workflows/");
        assert_eq!(endpoint(&["wf_1", "steps", "3"]), "workflows/wf_1/steps/3/");
        assert_eq!(endpoint(&["wf_1", "metadata"]), "workflows/wf_1/metadata/");
    }
}
