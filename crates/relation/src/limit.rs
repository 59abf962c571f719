// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Limit sanitization
//!
//! The compiler never attaches a limit as given; it first asks a
//! [`LimitSanitizer`] for a dialect-safe value. [`DefaultLimitSanitizer`]
//! accepts non-negative integers, integer text, and the `"offset, count"`
//! form, and rejects everything else.

use clausal_ir::Value;

use crate::error::{RelationError, RelationResult};

/// Turns a raw limit into a value that is safe to render
pub trait LimitSanitizer: Send + Sync {
    /// # Errors
    ///
    /// Returns `RelationError::InvalidLimit` when the value cannot be used.
    fn sanitize_limit(&self, limit: &Value) -> RelationResult<Value>;
}

/// Integer-only limit sanitizer with an optional ceiling
#[derive(Debug, Clone, Default)]
pub struct DefaultLimitSanitizer {
    max_limit: Option<u64>,
}

impl DefaultLimitSanitizer {
    pub fn new(max_limit: Option<u64>) -> Self {
        Self { max_limit }
    }

    fn check(&self, count: i64) -> RelationResult<i64> {
        if count < 0 {
            return Err(RelationError::InvalidLimit(format!(
                "limit must not be negative, got {count}"
            )));
        }
        if let Some(max) = self.max_limit {
            if count.unsigned_abs() > max {
                return Err(RelationError::InvalidLimit(format!(
                    "limit {count} exceeds maximum of {max}"
                )));
            }
        }
        Ok(count)
    }
}

fn parse_integer(text: &str) -> RelationResult<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| RelationError::InvalidLimit(format!("'{}' is not an integer", text.trim())))
}

impl LimitSanitizer for DefaultLimitSanitizer {
    fn sanitize_limit(&self, limit: &Value) -> RelationResult<Value> {
        match limit {
            Value::Integer(count) => self.check(*count).map(Value::Integer),
            Value::String(text) if text.contains(',') => {
                let parts = text
                    .split(',')
                    .map(parse_integer)
                    .collect::<RelationResult<Vec<_>>>()?;
                // The count is the last part in the `offset, count` form
                if let Some(count) = parts.last() {
                    self.check(*count)?;
                }
                let joined = parts
                    .iter()
                    .map(i64::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                Ok(Value::String(joined))
            }
            Value::String(text) => self.check(parse_integer(text)?).map(Value::Integer),
            other => Err(RelationError::InvalidLimit(format!(
                "unsupported limit value {other:?}"
            ))),
        }
    }
}
