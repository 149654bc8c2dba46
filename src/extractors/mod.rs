//! Extractors（信息抽取）模块：批量抽取、模型列表与详情。
//!
//! Extractor models: batched extraction, listing and detail.

mod client;

pub use client::{ExtractOptions, Extractors};
