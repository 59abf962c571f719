// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # clausal - Relations
//!
//! This crate provides the declarative query layer: a [`Relation`] collects
//! clauses through chained calls and compiles them into a
//! [`clausal_ir::SelectStatement`].
//!
//! ## Architecture
//!
//! ```text
//! Relation ──chain──> Relation ──compile──> CompiledQuery
//!    │                                         │
//!    ├─ predicate: conditions -> predicate nodes
//!    ├─ join: join specs -> join nodes (JoinGraphResolver)
//!    ├─ order: reverse_order rewriting
//!    └─ compiler: fixed-order statement assembly
//! ```
//!
//! Models, join graphs and limit sanitizing are collaborators supplied
//! through the [`Model`], [`JoinGraphResolver`] and [`LimitSanitizer`]
//! traits. Rendering the statement to SQL text is left to the caller.

pub mod compiler;
pub mod condition;
pub mod config;
pub mod error;
pub mod extension;
pub mod join;
pub mod limit;
pub mod model;
pub mod order;
pub mod predicate;
pub mod relation;

mod seq;

pub use compiler::CompiledQuery;
pub use condition::Condition;
pub use config::{ConfigError, RelationConfig};
pub use error::{RelationError, RelationResult};
pub use extension::Extension;
pub use join::{
    resolve_joins, Association, AssociationJoin, GraftedJoins, JoinGraph, JoinGraphResolver,
    JoinResolution, JoinSpec, NoAssociations,
};
pub use limit::{DefaultLimitSanitizer, LimitSanitizer};
pub use model::Model;
pub use order::{reverse_order, reverse_sql_order};
pub use predicate::{equality_values, translate, verify_binds};
pub use relation::{ClauseKind, Clauses, Lock, Relation};
