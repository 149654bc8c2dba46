//! Classifier request types.

use crate::client::BatchOptions;
use crate::config::ApiVersion;
use serde::Serialize;
use serde_json::{Map, Value};

/// Options for [`Classifiers::classify`](super::Classifiers::classify).
#[derive(Debug, Clone, Default)]
pub struct ClassifyOptions {
    pub batch_size: Option<usize>,
    pub auto_batch: Option<bool>,
    /// v3 only: classify with the production model instead of the draft.
    pub production_model: Option<bool>,
    /// v2 only: sent as the `sandbox=true` query parameter.
    pub sandbox: bool,
    pub api_version: Option<ApiVersion>,
}

impl ClassifyOptions {
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

    pub fn sandbox(mut self, enable: bool) -> Self {
        self.sandbox = enable;
        self
    }

    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }

    pub(crate) fn batch(&self) -> BatchOptions {
        BatchOptions {
            batch_size: self.batch_size,
            auto_batch: self.auto_batch,
        }
    }
}

/// Model settings for create/edit. Unset fields are omitted from the payload;
/// `extra` carries any field not modelled here.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassifierParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_features: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ngram_range: Option<(u8, u8)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_stemming: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preprocess_numbers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preprocess_social_media: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalize_weights: Option<bool>,
    /// `true`/`false` or an explicit word list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopwords: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitelist: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClassifierParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn max_features(mut self, n: u32) -> Self {
        self.max_features = Some(n);
        self
    }

    pub fn ngram_range(mut self, min: u8, max: u8) -> Self {
        self.ngram_range = Some((min, max));
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// A tag reference in training data: numeric id or tag name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TagRef {
    Id(i64),
    Name(String),
}

impl From<i64> for TagRef {
    fn from(id: i64) -> Self {
        TagRef::Id(id)
    }
}

impl From<&str> for TagRef {
    fn from(name: &str) -> Self {
        TagRef::Name(name.to_string())
    }
}

impl From<String> for TagRef {
    fn from(name: String) -> Self {
        TagRef::Name(name)
    }
}

/// One training sample for [`Classifiers::upload_data`](super::Classifiers::upload_data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataItem {
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<String>,
}

impl DataItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tags: Vec::new(),
            markers: Vec::new(),
        }
    }

    pub fn tag(mut self, tag: impl Into<TagRef>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.push(marker.into());
        self
    }

    /// v2 `samples` shape: `{"text": .., "category_id": [..]}`.
    pub(crate) fn to_v2_sample(&self) -> Value {
        serde_json::json!({
            "text": self.text,
            "category_id": self.tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classifier_params_omit_unset_fields() {
        let params = ClassifierParams::new()
            .language("en")
            .ngram_range(1, 2)
            .extra("model_type", json!("svm"));
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"language": "en", "ngram_range": [1, 2], "model_type": "svm"})
        );
    }

    #[test]
    fn test_data_item_serialization() {
        let item = DataItem::new("great product").tag(12).tag("Positive");
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"text": "great product", "tags": [12, "Positive"]})
        );
        assert_eq!(
            item.to_v2_sample(),
            json!({"text": "great product", "category_id": [12, "Positive"]})
        );
    }
}
