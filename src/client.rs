//! Client interface for the MonkeyLearn API.
//!
//! Keep the public surface small and predictable: one [`MonkeyLearnClient`],
//! a builder, and the request executor. Implementation details are split into
//! submodules under `src/client/`.

pub mod batching;
pub mod builder;
pub mod core;
pub mod endpoint;
pub mod execution;
mod policy;
pub mod types;
pub(crate) mod validation;

pub use batching::{plan_batches, BatchOptions};
pub use builder::MonkeyLearnClientBuilder;
pub use core::MonkeyLearnClient;
pub use endpoint::build_endpoint;
pub use execution::ApiRequest;
pub use policy::{throttle_wait, ThrottleRetryPolicy, CONCURRENCY_WAIT, DEFAULT_PLAN_WAIT};
pub use types::{CallStats, CancelHandle, ListOptions, OrderBy};
pub use validation::{validate_batch_size, validate_order_by};
