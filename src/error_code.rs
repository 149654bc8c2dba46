//! 服务端错误分类：根据 HTTP 状态码与服务错误码映射到固定的错误类型。
//!
//! MonkeyLearn response error taxonomy.
//!
//! Every non-success response from the service is classified into exactly one
//! [`ErrorKind`] by the pure function [`map_error`]. The mapping only looks at
//! the HTTP status and the `error_code` field of the JSON error body.
//!
//! | Status | `error_code`             | Kind                        |
//! |--------|--------------------------|-----------------------------|
//! | 422    | any                      | `RequestParamsError`        |
//! | 401    | any                      | `AuthenticationError`       |
//! | 403    | `MODEL_LIMIT`            | `ModelLimitError`           |
//! | 403    | other                    | `ForbiddenError`            |
//! | 404    | `MODEL_NOT_FOUND`        | `ModelNotFound`             |
//! | 404    | `TAG_NOT_FOUND`          | `TagNotFound`               |
//! | 404    | other                    | `ResourceNotFound`          |
//! | 429    | `PLAN_RATE_LIMIT`        | `PlanRateLimitError`        |
//! | 429    | `CONCURRENCY_RATE_LIMIT` | `ConcurrencyRateLimitError` |
//! | 429    | `PLAN_QUERY_LIMIT`       | `PlanQueryLimitError`       |
//! | 429    | other                    | `RateLimitError`            |
//! | 423    | any                      | `ModuleStateError`          |
//! | other  | any                      | `GenericResponseError`      |
//!
//! ## Example
//!
//! ```rust
//! use monkeylearn_rust::error_code::{map_error, ErrorKind};
//!
//! let kind = map_error(404, Some("MODEL_NOT_FOUND"));
//! assert_eq!(kind, ErrorKind::ModelNotFound);
//! assert_eq!(kind.parent(), Some(ErrorKind::ResourceNotFound));
//! ```

use std::fmt;

/// Service error code: the plan's per-minute request budget is exhausted.
pub const PLAN_RATE_LIMIT: &str = "PLAN_RATE_LIMIT";
/// Service error code: too many concurrent requests for the account.
pub const CONCURRENCY_RATE_LIMIT: &str = "CONCURRENCY_RATE_LIMIT";
/// Service error code: the plan's monthly query quota is exhausted.
pub const PLAN_QUERY_LIMIT: &str = "PLAN_QUERY_LIMIT";
/// Service error code: the account reached its model limit.
pub const MODEL_LIMIT: &str = "MODEL_LIMIT";
/// Service error code: unknown model id.
pub const MODEL_NOT_FOUND: &str = "MODEL_NOT_FOUND";
/// Service error code: unknown tag id.
pub const TAG_NOT_FOUND: &str = "TAG_NOT_FOUND";

/// Closed set of response error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 422: invalid request parameters
    RequestParamsError,
    /// 401: missing or invalid token
    AuthenticationError,
    /// 403 with `MODEL_LIMIT`
    ModelLimitError,
    /// 403
    ForbiddenError,
    /// 404 with `MODEL_NOT_FOUND`
    ModelNotFound,
    /// 404 with `TAG_NOT_FOUND`
    TagNotFound,
    /// 404
    ResourceNotFound,
    /// 429 with `PLAN_RATE_LIMIT`
    PlanRateLimitError,
    /// 429 with `CONCURRENCY_RATE_LIMIT`
    ConcurrencyRateLimitError,
    /// 429 with `PLAN_QUERY_LIMIT`
    PlanQueryLimitError,
    /// 429
    RateLimitError,
    /// 423: the model is in a state that does not allow the operation
    ModuleStateError,
    /// Any other non-success status
    GenericResponseError,
}

impl ErrorKind {
    /// Returns the kind name as exposed by the other MonkeyLearn SDKs.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::RequestParamsError => "RequestParamsError",
            Self::AuthenticationError => "AuthenticationError",
            Self::ModelLimitError => "ModelLimitError",
            Self::ForbiddenError => "ForbiddenError",
            Self::ModelNotFound => "ModelNotFound",
            Self::TagNotFound => "TagNotFound",
            Self::ResourceNotFound => "ResourceNotFound",
            Self::PlanRateLimitError => "PlanRateLimitError",
            Self::ConcurrencyRateLimitError => "ConcurrencyRateLimitError",
            Self::PlanQueryLimitError => "PlanQueryLimitError",
            Self::RateLimitError => "RateLimitError",
            Self::ModuleStateError => "ModuleStateError",
            Self::GenericResponseError => "GenericResponseError",
        }
    }

    /// Returns the family a specialised kind belongs to, if any.
    ///
    /// Lets callers handle e.g. every "not found" flavour with one check.
    pub fn parent(&self) -> Option<ErrorKind> {
        match self {
            Self::ModelLimitError => Some(Self::ForbiddenError),
            Self::ModelNotFound | Self::TagNotFound => Some(Self::ResourceNotFound),
            Self::PlanRateLimitError | Self::ConcurrencyRateLimitError => {
                Some(Self::RateLimitError)
            }
            _ => None,
        }
    }

    /// True if `self` is `family` or a specialisation of it.
    pub fn is_a(&self, family: ErrorKind) -> bool {
        *self == family || self.parent() == Some(family)
    }

    /// True for every kind produced by a 429 response.
    #[inline]
    pub fn is_rate_limit(&self) -> bool {
        matches!(
            self,
            Self::PlanRateLimitError
                | Self::ConcurrencyRateLimitError
                | Self::PlanQueryLimitError
                | Self::RateLimitError
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps an HTTP status and optional service error code to an [`ErrorKind`].
///
/// Never fails: unknown statuses map to [`ErrorKind::GenericResponseError`].
pub fn map_error(status: u16, error_code: Option<&str>) -> ErrorKind {
    match (status, error_code) {
        (422, _) => ErrorKind::RequestParamsError,
        (401, _) => ErrorKind::AuthenticationError,
        (403, Some(MODEL_LIMIT)) => ErrorKind::ModelLimitError,
        (403, _) => ErrorKind::ForbiddenError,
        (404, Some(MODEL_NOT_FOUND)) => ErrorKind::ModelNotFound,
        (404, Some(TAG_NOT_FOUND)) => ErrorKind::TagNotFound,
        (404, _) => ErrorKind::ResourceNotFound,
        (429, Some(PLAN_RATE_LIMIT)) => ErrorKind::PlanRateLimitError,
        (429, Some(CONCURRENCY_RATE_LIMIT)) => ErrorKind::ConcurrencyRateLimitError,
        (429, Some(PLAN_QUERY_LIMIT)) => ErrorKind::PlanQueryLimitError,
        (429, _) => ErrorKind::RateLimitError,
        (423, _) => ErrorKind::ModuleStateError,
        _ => ErrorKind::GenericResponseError,
    }
}
