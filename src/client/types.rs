use crate::client::validation::validate_order_by;
use crate::Result;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Facts about one logical request, returned next to its envelope.
#[derive(Debug, Clone)]
pub struct CallStats {
    pub method: String,
    pub endpoint: String,
    /// Status of the final attempt.
    pub http_status: u16,
    /// Number of resubmissions after throttling.
    pub retry_count: u32,
    /// Total time spent sleeping on throttles.
    pub throttle_wait: Duration,
    pub duration_ms: u128,
    /// Correlation id used in log events for this request.
    pub client_request_id: String,
}

/// Cooperative cancellation for in-flight requests and throttle waits.
///
/// Clones share state: cancelling any clone cancels all of them.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub(crate) async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

/// `order_by` list parameter: one field or several, `-` prefix for descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderBy {
    Field(String),
    Fields(Vec<String>),
}

impl From<&str> for OrderBy {
    fn from(s: &str) -> Self {
        OrderBy::Field(s.to_string())
    }
}

impl From<String> for OrderBy {
    fn from(s: String) -> Self {
        OrderBy::Field(s)
    }
}

impl From<Vec<&str>> for OrderBy {
    fn from(v: Vec<&str>) -> Self {
        OrderBy::Fields(v.into_iter().map(String::from).collect())
    }
}

impl From<Vec<String>> for OrderBy {
    fn from(v: Vec<String>) -> Self {
        OrderBy::Fields(v)
    }
}

/// Pagination and ordering for list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub order_by: Option<OrderBy>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn order_by(mut self, order_by: impl Into<OrderBy>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    /// Query pairs in a stable order. Validates `order_by`.
    pub fn to_query(&self) -> Result<Vec<(String, String)>> {
        let mut query = Vec::new();
        if let Some(page) = self.page {
            query.push(("page".to_string(), page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            query.push(("per_page".to_string(), per_page.to_string()));
        }
        if let Some(order_by) = &self.order_by {
            query.push(("order_by".to_string(), validate_order_by(order_by)?));
        }
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_options_query() {
        let query = ListOptions::new()
            .page(2)
            .per_page(50)
            .order_by(vec!["-created", "name"])
            .to_query()
            .unwrap();
        assert_eq!(
            query,
            vec![
                ("page".to_string(), "2".to_string()),
                ("per_page".to_string(), "50".to_string()),
                ("order_by".to_string(), "-created,name".to_string()),
            ]
        );
        assert!(ListOptions::default().to_query().unwrap().is_empty());
    }

    #[test]
    fn test_list_options_rejects_bad_order_by() {
        assert!(ListOptions::new().order_by("name,created").to_query().is_err());
    }

    #[test]
    fn test_cancel_handle_is_shared_between_clones() {
        let handle = CancelHandle::new();
        let clone = handle.clone();
        assert!(!clone.is_cancelled());
        handle.cancel();
        assert!(clone.is_cancelled());
    }
}
