// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Error types for relation building and compilation
//!
//! Every error is raised synchronously at the chain or compile call that
//! caused it. Nothing is retried and no partial statement is returned.

use serde::Serialize;
use thiserror::Error;

/// Result type alias for relation operations
pub type RelationResult<T> = Result<T, RelationError>;

/// Errors that can occur while chaining clauses or compiling a statement
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum RelationError {
    /// A fragment's `?` placeholders do not match its bound values
    #[error("Malformed condition '{sql}': {expected} placeholder(s) but {supplied} value(s)")]
    MalformedCondition {
        sql: String,
        expected: usize,
        supplied: usize,
    },

    /// A join input matches none of the recognized shapes
    #[error("Unsupported join specification: {0}")]
    UnsupportedJoinSpec(String),

    /// The model rejected an attribute in an attribute/value condition
    #[error("Unknown attribute '{attribute}' for '{model}'")]
    ConditionExpansion { model: String, attribute: String },

    /// The limit sanitizer rejected a limit value
    #[error("Invalid limit: {0}")]
    InvalidLimit(String),

    /// The join graph has no association with this name
    #[error("Association '{association}' not found on '{model}'")]
    AssociationNotFound { model: String, association: String },

    /// Neither an extension nor the base relation handles this operation
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// An operation was invoked with arguments it cannot use
    #[error("Invalid arguments for '{operation}': {reason}")]
    InvalidArguments { operation: String, reason: String },
}
