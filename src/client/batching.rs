//! 批量调度：把输入序列切分为若干批次，逐批顺序提交并合并结果。
//!
//! Batch dispatch. Input is split into contiguous chunks, submitted one after
//! another, and the envelopes are folded into a [`MultiResponse`].

use crate::client::core::MonkeyLearnClient;
use crate::client::execution::ApiRequest;
use crate::client::types::CancelHandle;
use crate::client::validation::validate_batch_size;
use crate::response::MultiResponse;
use crate::{Error, ErrorContext, Result};
use serde_json::Value;
use std::ops::Range;
use tracing::debug;

/// Per-call batching overrides. `None` falls back to the client configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    pub batch_size: Option<usize>,
    pub auto_batch: Option<bool>,
}

impl BatchOptions {
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
}

/// Contiguous chunk ranges covering `0..len`, each at most `batch_size` long.
///
/// Yields `ceil(len / batch_size)` ranges; only the last may be short.
pub fn plan_batches(len: usize, batch_size: usize) -> Vec<Range<usize>> {
    let size = batch_size.max(1);
    (0..len)
        .step_by(size)
        .map(|start| start..(start + size).min(len))
        .collect()
}

impl MonkeyLearnClient {
    /// Submit `items` in chunks, building each chunk's body with `make_body`.
    ///
    /// `base` supplies method, path, query and API version; its body is
    /// replaced per chunk. Validation happens before any network call: a batch
    /// size above 200 (or zero) and an empty input are rejected. With
    /// auto-batching off the whole input goes out as a single request. Chunks
    /// are sent sequentially and the first failure aborts the remainder.
    pub async fn execute_batched<T, F>(
        &self,
        base: &ApiRequest,
        items: &[T],
        options: BatchOptions,
        cancel: Option<&CancelHandle>,
        make_body: F,
    ) -> Result<MultiResponse>
    where
        F: Fn(&[T]) -> Result<Value>,
    {
        let batch_size = validate_batch_size(options.batch_size)?;
        if items.is_empty() {
            return Err(Error::validation_with_context(
                "The data param must contain at least one item",
                ErrorContext::new()
                    .with_field_path("data")
                    .with_source("batch_validator"),
            ));
        }

        let auto_batch = options
            .auto_batch
            .unwrap_or_else(|| self.config().auto_batch());
        let ranges = if auto_batch {
            plan_batches(items.len(), batch_size)
        } else {
            vec![0..items.len()]
        };

        let total = ranges.len();
        let mut responses = Vec::with_capacity(total);
        for (index, range) in ranges.into_iter().enumerate() {
            debug!(
                endpoint = base.path.as_str(),
                chunk = index + 1,
                chunks = total,
                chunk_size = range.len(),
                "dispatching batch"
            );
            let request = base.clone().with_body(make_body(&items[range])?);
            let (response, _) = self.execute_with_stats(&request, cancel).await?;
            responses.push(response);
        }
        MultiResponse::new(responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_batches_counts() {
        for (len, size, expected) in [(5, 2, 3), (4, 2, 2), (1, 200, 1), (401, 200, 3), (0, 5, 0)] {
            assert_eq!(plan_batches(len, size).len(), expected, "len={} size={}", len, size);
        }
    }

    #[test]
    fn test_plan_batches_are_contiguous_and_bounded() {
        let ranges = plan_batches(7, 3);
        assert_eq!(ranges, vec![0..3, 3..6, 6..7]);
        assert!(ranges.iter().all(|r| r.len() <= 3));
    }

    #[test]
    fn test_batch_options_builder() {
        let options = BatchOptions::new().batch_size(10).auto_batch(false);
        assert_eq!(options.batch_size, Some(10));
        assert_eq!(options.auto_batch, Some(false));
    }
}
