//! Endpoint paths and URL resolution

use crate::{Error, ErrorContext, Result};
use url::Url;

/// Join path segments into a relative endpoint with a trailing slash.
///
/// Slashes around each segment are trimmed and empty segments are skipped,
/// so `["classifiers", "cl_1", "classify"]` becomes `classifiers/cl_1/classify/`.
pub fn build_endpoint<S: AsRef<str>>(segments: &[S]) -> String {
    let mut path = String::new();
    for segment in segments {
        let segment = segment.as_ref().trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        path.push_str(segment);
        path.push('/');
    }
    path
}

/// Resolve `path` against `base_url` and append the query pairs, form-encoded.
pub(crate) fn resolve_url(base_url: &str, path: &str, query: &[(String, String)]) -> Result<Url> {
    let base = Url::parse(base_url).map_err(|e| {
        Error::configuration_with_context(
            format!("Invalid base URL '{}': {}", base_url, e),
            ErrorContext::new()
                .with_field_path("base_url")
                .with_source("endpoint_resolver"),
        )
    })?;
    let mut url = base.join(path.trim_start_matches('/')).map_err(|e| {
        Error::validation_with_context(
            format!("Invalid endpoint path '{}': {}", path, e),
            ErrorContext::new()
                .with_field_path("path")
                .with_source("endpoint_resolver"),
        )
    })?;
    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    Ok(url)
}
