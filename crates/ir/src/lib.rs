// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # clausal - Statement AST
//!
//! This crate provides the abstract syntax tree that the clausal query builder
//! compiles into. The tree is what a dialect renderer consumes:
//! - Relation sources, joins and projections
//! - Predicate expressions (equality, grouping, conjunction, bound fragments)
//! - Orderings that know how to reverse themselves
//! - Limit, offset and lock clauses
//!
//! Nothing in this crate renders SQL text or escapes values.

pub mod expr;
pub mod metadata;
pub mod query;
pub mod value;

// Re-export commonly used types
pub use expr::{placeholder_count, BinaryOp, ColumnRef, Expr};
pub use metadata::{AggregateMetadata, ColumnMetadata, DataType, TableMetadata};
pub use query::{
    Join, JoinCondition, JoinType, LockClause, OrderTerm, Ordering, SelectItem, SelectStatement,
    SortDirection, Source, TableRef,
};
pub use value::Value;
