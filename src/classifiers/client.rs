//! Classifier and tag endpoints.

use super::types::{ClassifierParams, ClassifyOptions, DataItem};
use crate::client::{build_endpoint, ApiRequest, CancelHandle, ListOptions, MonkeyLearnClient};
use crate::config::ApiVersion;
use crate::response::{MultiResponse, Response};
use crate::{Error, ErrorContext, Result};
use serde::Serialize;
use serde_json::{json, Map, Value};

const RESOURCE: &str = "classifiers";

fn endpoint(segments: &[&str]) -> String {
    let mut all = Vec::with_capacity(segments.len() + 1);
    all.push(RESOURCE);
    all.extend_from_slice(segments);
    build_endpoint(&all)
}

/// `params` as a JSON object with `name` set when given.
fn params_body(name: Option<&str>, params: &ClassifierParams) -> Result<Value> {
    let mut body = match serde_json::to_value(params)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    if let Some(name) = name {
        body.insert("name".to_string(), Value::String(name.to_string()));
    }
    Ok(Value::Object(body))
}

/// Classifier endpoints, borrowed from a [`MonkeyLearnClient`].
#[derive(Debug, Clone, Copy)]
pub struct Classifiers<'a> {
    client: &'a MonkeyLearnClient,
}

impl<'a> Classifiers<'a> {
    pub(crate) fn new(client: &'a MonkeyLearnClient) -> Self {
        Self { client }
    }

    /// Tag endpoints of classifier models.
    pub fn tags(&self) -> Tags<'a> {
        Tags {
            client: self.client,
        }
    }

    /// Classify `data` with model `model_id`, batching per the options.
    ///
    /// Items are plain strings or objects such as `{"text": .., "external_id": ..}`.
    pub async fn classify<T: Serialize>(
        &self,
        model_id: &str,
        data: &[T],
        options: &ClassifyOptions,
    ) -> Result<MultiResponse> {
        self.classify_with_cancel(model_id, data, options, None).await
    }

    pub async fn classify_with_cancel<T: Serialize>(
        &self,
        model_id: &str,
        data: &[T],
        options: &ClassifyOptions,
        cancel: Option<&CancelHandle>,
    ) -> Result<MultiResponse> {
        let version = options
            .api_version
            .unwrap_or_else(|| self.client.config().api_version());
        let mut base = ApiRequest::post(endpoint(&[model_id, "classify"]))
            .with_api_version(Some(version));
        if version == ApiVersion::V2 && options.sandbox {
            base = base.with_query("sandbox", true);
        }
        let production_model = options.production_model;

        self.client
            .execute_batched(&base, data, options.batch(), cancel, |chunk| {
                let items = serde_json::to_value(chunk)?;
                Ok(match version {
                    ApiVersion::V2 => json!({ "text_list": items }),
                    ApiVersion::V3 => {
                        let mut body = json!({ "data": items });
                        if let Some(pm) = production_model {
                            body["production_model"] = Value::Bool(pm);
                        }
                        body
                    }
                })
            })
            .await
    }

    pub async fn list(&self, options: &ListOptions) -> Result<Response> {
        let request = ApiRequest::get(endpoint(&[])).with_query_pairs(options.to_query()?);
        self.client.execute(&request).await
    }

    pub async fn detail(&self, model_id: &str) -> Result<Response> {
        self.client
            .execute(&ApiRequest::get(endpoint(&[model_id])))
            .await
    }

    pub async fn create(&self, name: &str, params: &ClassifierParams) -> Result<Response> {
        if name.trim().is_empty() {
            return Err(Error::validation_with_context(
                "A classifier name is required",
                ErrorContext::new()
                    .with_field_path("name")
                    .with_source("classifiers"),
            ));
        }
        let body = params_body(Some(name), params)?;
        self.client
            .execute(&ApiRequest::post(endpoint(&[])).with_body(body))
            .await
    }

    /// PATCH the given settings; `name` renames the model.
    pub async fn edit(
        &self,
        model_id: &str,
        name: Option<&str>,
        params: &ClassifierParams,
    ) -> Result<Response> {
        let body = params_body(name, params)?;
        self.client
            .execute(&ApiRequest::patch(endpoint(&[model_id])).with_body(body))
            .await
    }

    pub async fn delete(&self, model_id: &str) -> Result<Response> {
        self.client
            .execute(&ApiRequest::delete(endpoint(&[model_id])))
            .await
    }

    pub async fn deploy(&self, model_id: &str) -> Result<Response> {
        self.client
            .execute(&ApiRequest::post(endpoint(&[model_id, "deploy"])))
            .await
    }

    pub async fn train(&self, model_id: &str) -> Result<Response> {
        self.client
            .execute(&ApiRequest::post(endpoint(&[model_id, "train"])))
            .await
    }

    /// Upload training samples using the configured API version.
    ///
    /// v3 posts `{"data": [...]}` to `data/`; v2 posts
    /// `{"samples": [{"text", "category_id"}]}` to `samples/`.
    pub async fn upload_data(&self, model_id: &str, data: &[DataItem]) -> Result<Response> {
        let version = self.client.config().api_version();
        self.upload_data_with_version(model_id, data, version).await
    }

    /// [`upload_data`](Self::upload_data) against an explicit API version.
    pub async fn upload_data_with_version(
        &self,
        model_id: &str,
        data: &[DataItem],
        version: ApiVersion,
    ) -> Result<Response> {
        if data.is_empty() {
            return Err(Error::validation_with_context(
                "The data param must contain at least one item",
                ErrorContext::new()
                    .with_field_path("data")
                    .with_source("classifiers"),
            ));
        }
        let request = match version {
            ApiVersion::V3 => ApiRequest::post(endpoint(&[model_id, "data"]))
                .with_body(json!({ "data": data })),
            ApiVersion::V2 => {
                let samples: Vec<Value> = data.iter().map(DataItem::to_v2_sample).collect();
                ApiRequest::post(endpoint(&[model_id, "samples"]))
                    .with_body(json!({ "samples": samples }))
            }
        };
        self.client
            .execute(&request.with_api_version(Some(version)))
            .await
    }
}

/// Tag endpoints: `classifiers/<model_id>/tags/<tag_id>/`.
#[derive(Debug, Clone, Copy)]
pub struct Tags<'a> {
    client: &'a MonkeyLearnClient,
}

impl<'a> Tags<'a> {
    fn endpoint(model_id: &str, tag_id: Option<i64>) -> String {
        match tag_id {
            Some(id) => {
                let id = id.to_string();
                endpoint(&[model_id, "tags", id.as_str()])
            }
            None => endpoint(&[model_id, "tags"]),
        }
    }

    pub async fn detail(&self, model_id: &str, tag_id: i64) -> Result<Response> {
        self.client
            .execute(&ApiRequest::get(Self::endpoint(model_id, Some(tag_id))))
            .await
    }

    pub async fn create(
        &self,
        model_id: &str,
        name: &str,
        parent_id: Option<i64>,
    ) -> Result<Response> {
        let mut body = json!({ "name": name });
        if let Some(parent_id) = parent_id {
            body["parent_id"] = json!(parent_id);
        }
        self.client
            .execute(&ApiRequest::post(Self::endpoint(model_id, None)).with_body(body))
            .await
    }

    /// PATCH only the fields given.
    pub async fn edit(
        &self,
        model_id: &str,
        tag_id: i64,
        name: Option<&str>,
        parent_id: Option<i64>,
    ) -> Result<Response> {
        let mut body = Map::new();
        if let Some(name) = name {
            body.insert("name".to_string(), json!(name));
        }
        if let Some(parent_id) = parent_id {
            body.insert("parent_id".to_string(), json!(parent_id));
        }
        self.client
            .execute(
                &ApiRequest::patch(Self::endpoint(model_id, Some(tag_id)))
                    .with_body(Value::Object(body)),
            )
            .await
    }

    /// Delete a tag, optionally moving its samples to `move_data_to`.
    pub async fn delete(
        &self,
        model_id: &str,
        tag_id: i64,
        move_data_to: Option<i64>,
    ) -> Result<Response> {
        let mut request = ApiRequest::delete(Self::endpoint(model_id, Some(tag_id)));
        if let Some(target) = move_data_to {
            request = request.with_body(json!({ "move-data-to": target }));
        }
        self.client.execute(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(endpoint(&[]), "classifiers/");
        assert_eq!(endpoint(&["cl_1", "classify"]), "classifiers/cl_1/classify/");
        assert_eq!(Tags::endpoint("cl_1", Some(7)), "classifiers/cl_1/tags/7/");
        assert_eq!(Tags::endpoint("cl_1", None), "classifiers/cl_1/tags/");
    }

    #[test]
    fn test_params_body_sets_name() {
        let body = params_body(Some("Sentiment"), &ClassifierParams::new().language("en")).unwrap();
        assert_eq!(body, json!({"name": "Sentiment", "language": "en"}));
    }
}
