//! # monkeylearn-rust
//!
//! MonkeyLearn 文本分析服务的异步 Rust 客户端：分类、抽取、流水线与工作流。
//!
//! Async client for the MonkeyLearn text-analysis API: classifiers, extractors,
//! pipelines and workflows.
//!
//! ## Overview
//!
//! Every call goes through one request executor that authenticates with the
//! configured token, resolves the endpoint against the versioned base URL, and
//! transparently waits and resubmits when the service throttles the account.
//! Classification and extraction inputs are split into batches of at most 200
//! items, sent one after another, and folded back into a single
//! [`MultiResponse`].
//!
//! ## Key Features
//!
//! - **Configuration**: token, base URL, API version and flags from the
//!   `MONKEYLEARN_*` environment, a YAML file, or the builder
//! - **Retry on throttle**: waits 2 s on concurrency throttles and the
//!   service-advertised interval on plan throttles, with optional bounds
//! - **Typed errors**: every non-2xx response maps to an [`ErrorKind`]
//! - **Quota tracking**: `X-Query-Limit-*` headers are exposed on every envelope
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use monkeylearn_rust::{ClassifyOptions, MonkeyLearnClient};
//!
//! #[tokio::main]
//! async fn main() -> monkeylearn_rust::Result<()> {
//!     let client = MonkeyLearnClient::builder().token("<your token>").build()?;
//!
//!     let texts = ["This is a great tool!", "The service was slow."];
//!     let result = client
//!         .classifiers()
//!         .classify("cl_pi3C7JiL", &texts, &ClassifyOptions::new())
//!         .await?;
//!
//!     println!("{}", result.body());
//!     println!("queries remaining: {}", result.plan_queries_remaining());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Configuration state and environment resolution |
//! | [`client`] | Client, builder, request executor and batching |
//! | [`response`] | Response envelopes and batch aggregation |
//! | [`error_code`] | Error taxonomy and status/code mapping |
//! | [`classifiers`] | Classifier and tag endpoints |
//! | [`extractors`] | Extractor endpoints |
//! | [`pipelines`] | Pipeline endpoints |
//! | [`workflows`] | Workflow, step, data and metadata endpoints |
//! | [`transport`] | Lazily created HTTP handle |

pub mod classifiers;
pub mod client;
pub mod config;
pub mod error_code;
pub mod extractors;
pub mod pipelines;
pub mod response;
pub mod transport;
pub mod workflows;

pub use classifiers::{ClassifierParams, ClassifyOptions, DataItem, TagRef};
pub use client::{
    ApiRequest, BatchOptions, CallStats, CancelHandle, ListOptions, MonkeyLearnClient,
    MonkeyLearnClientBuilder, OrderBy, ThrottleRetryPolicy,
};
pub use config::{ApiVersion, Config};
pub use error_code::{map_error, ErrorKind};
pub use extractors::ExtractOptions;
pub use response::{MultiResponse, Response};
pub use workflows::{DataListOptions, StepParams, WorkflowParams};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

pub mod error;
pub use error::{Error, ErrorContext, ResponseError};
