use crate::error::ResponseError;
use crate::error_code::ErrorKind;
use std::time::Duration;

/// Fixed wait after a `CONCURRENCY_RATE_LIMIT` throttle.
pub const CONCURRENCY_WAIT: Duration = Duration::from_secs(2);
/// Wait after a `PLAN_RATE_LIMIT` throttle whose message carries no usable number.
pub const DEFAULT_PLAN_WAIT: Duration = Duration::from_secs(60);

/// Internal decision for how to proceed after a throttled attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    Retry { delay: Duration },
    Fail,
}

/// Bounds on the retry-on-throttle loop.
///
/// The default is unbounded: a throttled request is resubmitted until the
/// service accepts it, which matches the other MonkeyLearn SDKs. Callers that
/// cannot block indefinitely should set `max_retries` and/or `max_total_wait`;
/// once a bound would be exceeded the rate-limit error is returned instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThrottleRetryPolicy {
    /// Maximum number of resubmissions for one logical request.
    pub max_retries: Option<u32>,
    /// Maximum accumulated sleep for one logical request.
    pub max_total_wait: Option<Duration>,
}

impl ThrottleRetryPolicy {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, n: u32) -> Self {
        self.max_retries = Some(n);
        self
    }

    pub fn with_max_total_wait(mut self, wait: Duration) -> Self {
        self.max_total_wait = Some(wait);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_retries.is_none() && self.max_total_wait.is_none()
    }

    /// Decide whether a throttled attempt may be resubmitted.
    ///
    /// - `retries` is the number of resubmissions already made.
    /// - `waited` is the sleep already spent on this logical request.
    pub(crate) fn decide(&self, retries: u32, waited: Duration, delay: Duration) -> Decision {
        if let Some(max) = self.max_retries {
            if retries >= max {
                return Decision::Fail;
            }
        }
        if let Some(max) = self.max_total_wait {
            if waited.saturating_add(delay) > max {
                return Decision::Fail;
            }
        }
        Decision::Retry { delay }
    }
}

/// How long to wait before resubmitting a throttled request.
///
/// Returns `None` for non-429 responses and for 429s that are not retryable
/// (plan query limit, unrecognised codes).
pub fn throttle_wait(error: &ResponseError) -> Option<Duration> {
    if error.status != 429 {
        return None;
    }
    match error.kind {
        ErrorKind::ConcurrencyRateLimitError => Some(CONCURRENCY_WAIT),
        ErrorKind::PlanRateLimitError => Some(
            error
                .seconds_to_wait
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_PLAN_WAIT),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn throttled(body: &str) -> ResponseError {
        ResponseError::from_body(429, body.as_bytes())
    }

    #[test]
    fn test_concurrency_wait_is_fixed() {
        let err = throttled(
            r#"{"detail": "Too many requests, available in 30 seconds", "error_code": "CONCURRENCY_RATE_LIMIT"}"#,
        );
        assert_eq!(throttle_wait(&err), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_plan_wait_parsed_from_detail() {
        let err = throttled(
            r#"{"detail": "Request was throttled. Expected available in 45 seconds.", "error_code": "PLAN_RATE_LIMIT"}"#,
        );
        assert_eq!(throttle_wait(&err), Some(Duration::from_secs(45)));
    }

    #[test]
    fn test_plan_wait_defaults_to_sixty() {
        let err = throttled(r#"{"detail": "Request was throttled.", "error_code": "PLAN_RATE_LIMIT"}"#);
        assert_eq!(throttle_wait(&err), Some(DEFAULT_PLAN_WAIT));
    }

    #[test]
    fn test_other_throttles_are_terminal() {
        let err = throttled(r#"{"detail": "Quota exceeded", "error_code": "PLAN_QUERY_LIMIT"}"#);
        assert_eq!(throttle_wait(&err), None);
        let err = throttled(r#"{"detail": "available in 5 seconds"}"#);
        assert_eq!(throttle_wait(&err), None);
        let err = ResponseError::from_body(404, br#"{"error_code": "PLAN_RATE_LIMIT"}"#);
        assert_eq!(throttle_wait(&err), None);
    }

    #[test]
    fn test_unbounded_policy_always_retries() {
        let policy = ThrottleRetryPolicy::unbounded();
        let delay = Duration::from_secs(60);
        assert_eq!(
            policy.decide(10_000, Duration::from_secs(1_000_000), delay),
            Decision::Retry { delay }
        );
    }

    #[test]
    fn test_max_retries_bound() {
        let policy = ThrottleRetryPolicy::unbounded().with_max_retries(2);
        let delay = Duration::from_secs(2);
        assert_eq!(policy.decide(0, Duration::ZERO, delay), Decision::Retry { delay });
        assert_eq!(policy.decide(1, delay, delay), Decision::Retry { delay });
        assert_eq!(policy.decide(2, delay * 2, delay), Decision::Fail);
    }

    #[test]
    fn test_max_total_wait_bound() {
        let policy = ThrottleRetryPolicy::unbounded().with_max_total_wait(Duration::from_secs(5));
        let delay = Duration::from_secs(2);
        assert_eq!(policy.decide(0, Duration::ZERO, delay), Decision::Retry { delay });
        assert_eq!(
            policy.decide(1, Duration::from_secs(2), delay),
            Decision::Retry { delay }
        );
        assert_eq!(policy.decide(2, Duration::from_secs(4), delay), Decision::Fail);
        assert!(!policy.is_unbounded());
    }
}
