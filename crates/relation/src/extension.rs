// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Relation extensions
//!
//! An [`Extension`] adds named operations to one relation (and the
//! relations chained from it) without touching any other relation.
//! Operations are invoked through [`Relation::call`]: extensions are
//! consulted most-recently-attached first and win over base operations of
//! the same name.
//!
//! ```rust,ignore
//! #[derive(Debug)]
//! struct Published;
//!
//! impl Extension for Published {
//!     fn name(&self) -> &str { "published" }
//!     fn operations(&self) -> &[&str] { &["published"] }
//!     fn call(&self, relation: &Relation, _op: &str, _args: &[Value]) -> RelationResult<Relation> {
//!         relation.where_("published_at IS NOT NULL")
//!     }
//! }
//!
//! let scoped = relation.extending(Arc::new(Published));
//! let published = scoped.call("published", &[])?;
//! ```

use std::fmt;

use clausal_ir::Value;

use crate::error::RelationResult;
use crate::relation::Relation;

/// A bundle of named operations attached to a relation
pub trait Extension: Send + Sync + fmt::Debug {
    /// Identifies the extension; attaching the same name twice is a no-op
    fn name(&self) -> &str;

    /// Operation names this extension handles
    fn operations(&self) -> &[&str];

    /// Run `operation` against `relation`
    fn call(&self, relation: &Relation, operation: &str, args: &[Value])
    -> RelationResult<Relation>;

    fn handles(&self, operation: &str) -> bool {
        self.operations().contains(&operation)
    }
}
