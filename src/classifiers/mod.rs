//! Classifiers（文本分类）模块：分类、模型管理、标签与训练数据上传。
//!
//! Classifier models: classify text, manage models and tags, upload training data.

mod client;
mod types;

pub use client::{Classifiers, Tags};
pub use types::{ClassifierParams, ClassifyOptions, DataItem, TagRef};
