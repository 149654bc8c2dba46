//! Workflow request types.

use serde::Serialize;
use serde_json::Value;

/// Optional settings for [`Workflows::create`](super::Workflows::create).
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkflowParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Value>,
}

/// A workflow step. `step_model_id` is sent as `model_id`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StepParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "model_id", skip_serializing_if = "Option::is_none")]
    pub step_model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Value>,
}

impl StepParams {
    pub fn new(name: impl Into<String>, step_model_id: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            step_model_id: Some(step_model_id.into()),
            ..Self::default()
        }
    }

    pub fn input_step(mut self, step: impl Into<String>) -> Self {
        self.input_step = Some(step.into());
        self
    }

    pub fn conditions(mut self, conditions: Value) -> Self {
        self.conditions = Some(conditions);
        self
    }
}

/// Filters for [`WorkflowData::list`](super::WorkflowData::list).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataListOptions {
    pub batch_id: Option<i64>,
    pub is_processed: Option<bool>,
    pub sent_to_process_date_from: Option<String>,
    pub sent_to_process_date_to: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl DataListOptions {
    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                query.push((key.to_string(), value));
            }
        };
        push("batch_id", self.batch_id.map(|v| v.to_string()));
        push("is_processed", self.is_processed.map(|v| v.to_string()));
        push(
            "sent_to_process_date_from",
            self.sent_to_process_date_from.clone(),
        );
        push("sent_to_process_date_to", self.sent_to_process_date_to.clone());
        push("page", self.page.map(|v| v.to_string()));
        push("per_page", self.per_page.map(|v| v.to_string()));
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_step_params_rename_model_id() {
        let step = StepParams::new("sentiment", "cl_pi7KdMQk").input_step("input");
        assert_eq!(
            serde_json::to_value(&step).unwrap(),
            json!({"name": "sentiment", "model_id": "cl_pi7KdMQk", "input_step": "input"})
        );
    }

    #[test]
    fn test_data_list_query_skips_unset() {
        let options = DataListOptions {
            batch_id: Some(3),
            is_processed: Some(false),
            per_page: Some(20),
            ..DataListOptions::default()
        };
        assert_eq!(
            options.to_query(),
            vec![
                ("batch_id".to_string(), "3".to_string()),
                ("is_processed".to_string(), "false".to_string()),
                ("per_page".to_string(), "20".to_string()),
            ]
        );
    }
}
