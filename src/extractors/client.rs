use crate::client::{
    build_endpoint, ApiRequest, BatchOptions, CancelHandle, ListOptions, MonkeyLearnClient,
};
use crate::config::ApiVersion;
use crate::response::{MultiResponse, Response};
use crate::Result;
use serde::Serialize;
use serde_json::{json, Value};

const RESOURCE: &str = "extractors";

/// Options for [`Extractors::extract`].
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub batch_size: Option<usize>,
    pub auto_batch: Option<bool>,
    /// v3 only.
    pub production_model: Option<bool>,
    pub api_version: Option<ApiVersion>,
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }

    pub fn auto_batch(mut self, enable: bool) -> Self {
        self.auto_batch = Some(enable);
        self
    }

    pub fn production_model(mut self, enable: bool) -> Self {
        self.production_model = Some(enable);
        self
    }

    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }
}

/// Extractor endpoints, borrowed from a [`MonkeyLearnClient`].
#[derive(Debug, Clone, Copy)]
pub struct Extractors<'a> {
    client: &'a MonkeyLearnClient,
}

impl<'a> Extractors<'a> {
    pub(crate) fn new(client: &'a MonkeyLearnClient) -> Self {
        Self { client }
    }

    pub async fn extract<T: Serialize>(
        &self,
        model_id: &str,
        data: &[T],
        options: &ExtractOptions,
    ) -> Result<MultiResponse> {
        self.extract_with_cancel(model_id, data, options, None).await
    }

    pub async fn extract_with_cancel<T: Serialize>(
        &self,
        model_id: &str,
        data: &[T],
        options: &ExtractOptions,
        cancel: Option<&CancelHandle>,
    ) -> Result<MultiResponse> {
        let version = options
            .api_version
            .unwrap_or_else(|| self.client.config().api_version());
        let base = ApiRequest::post(build_endpoint(&[RESOURCE, model_id, "extract"]))
            .with_api_version(Some(version));
        let batch = BatchOptions {
            batch_size: options.batch_size,
            auto_batch: options.auto_batch,
        };
        let production_model = options.production_model;

        self.client
            .execute_batched(&base, data, batch, cancel, |chunk| {
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
        let request =
            ApiRequest::get(build_endpoint(&[RESOURCE])).with_query_pairs(options.to_query()?);
        self.client.execute(&request).await
    }

    pub async fn detail(&self, model_id: &str) -> Result<Response> {
        self.client
            .execute(&ApiRequest::get(build_endpoint(&[RESOURCE, model_id])))
            .await
    }
}
