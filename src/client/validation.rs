//! 请求参数校验：批大小与排序字段，在发起任何网络请求前失败。
//!
//! Parameter validation. Everything here fails before any network call.

use crate::client::types::OrderBy;
use crate::config::{DEFAULT_BATCH_SIZE, MAX_BATCH_SIZE, MIN_BATCH_SIZE};
use crate::{Error, ErrorContext, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static ORDER_BY_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[a-z_]+$").expect("static order_by pattern"));

fn order_by_error(msg: impl Into<String>) -> Error {
    Error::validation_with_context(
        msg,
        ErrorContext::new()
            .with_field_path("order_by")
            .with_source("order_by_validator"),
    )
}

/// Resolve and check a batch size. `None` means the default (200).
pub fn validate_batch_size(size: Option<usize>) -> Result<usize> {
    let size = size.unwrap_or(DEFAULT_BATCH_SIZE);
    if size > MAX_BATCH_SIZE {
        return Err(Error::validation_with_context(
            format!(
                "The param batch_size is too big, max value is {}.",
                MAX_BATCH_SIZE
            ),
            ErrorContext::new()
                .with_field_path("batch_size")
                .with_details(format!("got {}", size))
                .with_source("batch_validator"),
        ));
    }
    if size < MIN_BATCH_SIZE {
        return Err(Error::validation_with_context(
            format!(
                "The param batch_size is too small, min value is {}.",
                MIN_BATCH_SIZE
            ),
            ErrorContext::new()
                .with_field_path("batch_size")
                .with_details(format!("got {}", size))
                .with_source("batch_validator"),
        ));
    }
    Ok(size)
}

fn validate_order_by_field(field: &str) -> Result<&str> {
    if field.contains(',') {
        return Err(order_by_error(format!(
            "Invalid ',' (comma) character found in 'order_by' fieldname '{}', try sending a list of strings if you need to specify multiple fields",
            field
        )));
    }
    if !ORDER_BY_FIELD.is_match(field) {
        return Err(order_by_error(format!(
            "Invalid characters found in 'order_by' fieldname '{}'",
            field
        )));
    }
    Ok(field)
}

/// Validate an `order_by` value and render it as the comma-joined query value.
pub fn validate_order_by(order_by: &OrderBy) -> Result<String> {
    match order_by {
        OrderBy::Field(field) => Ok(validate_order_by_field(field)?.to_string()),
        OrderBy::Fields(fields) => {
            if fields.is_empty() {
                return Err(order_by_error(
                    "'order_by' parameter must be a non empty list of strings, an empty list was found",
                ));
            }
            let mut seen = HashSet::new();
            let mut out = Vec::with_capacity(fields.len());
            for field in fields {
                let name = field.strip_prefix('-').unwrap_or(field);
                if !seen.insert(name) {
                    return Err(order_by_error(format!(
                        "'order_by' parameter must be a list of unique field names, duplicated fields were found: '{}'.",
                        name
                    )));
                }
                out.push(validate_order_by_field(field)?);
            }
            Ok(out.join(","))
        }
    }
}
