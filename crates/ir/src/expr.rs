// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Expressions
//!
//! This module represents predicate and projection expressions in the AST.
//!
//! ## Design
//!
//! Expressions are the building blocks of a compiled statement and can represent:
//!
//! - **Column references**: `table.column` or unqualified `column`
//! - **Bound values**: see [`Value`]
//! - **Raw SQL**: text passed through untouched (`Sql`)
//! - **Fragments**: raw condition text plus positional binds (`Fragment`)
//! - **Equalities**: `column = value`, or set membership when the value is a list
//! - **Groupings**: parenthesized sub-expressions
//! - **Conjunctions**: `a AND b AND c`
//! - **Binary operators**: pre-built join conditions handed in by callers
//!
//! ## Predicate Nodes
//!
//! The query builder only ever produces two predicate shapes itself:
//!
//! ```text
//! Equality { column: users.name, value: 'bob' }
//! Fragment { sql: "age > ? AND age < ?", binds: [18, 65] }
//! ```
//!
//! Equalities are kept distinct so the compiler can merge them into a single
//! [`Expr::And`]. Fragments keep their `?` placeholders; substitution is left
//! to the renderer, which can call [`Expr::bind_mismatch`] to detect a
//! placeholder/bind count mismatch before it does so.
//!
//! ## Examples
//!
//! ### Where-section after compilation
//! ```text
//! And([
//!   Equality { users.name = 'bob' },
//!   Equality { users.active = true },
//! ])
//! Grouping(Fragment { "age > ? OR admin", [18] })
//! ```
//!
//! Represents: `WHERE users.name = 'bob' AND users.active = true AND (age > 18 OR admin)`

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// An AST expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Expr {
    /// Column reference (e.g., `table.column` or just `column`)
    Column(ColumnRef),

    /// Bound value
    Value(Value),

    /// Raw SQL text, passed through verbatim
    Sql(String),

    /// Raw condition text with positional `?` binds
    Fragment { sql: String, binds: Vec<Value> },

    /// `column = value` (or `column IN (...)` for list values)
    Equality { column: ColumnRef, value: Value },

    /// Binary operation (e.g., `a + b`, `x > 5`)
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// Parenthesized expression
    Grouping(Box<Expr>),

    /// Conjunction of its children
    And(Vec<Expr>),
}

impl Expr {
    pub fn sql(sql: impl Into<String>) -> Self {
        Expr::Sql(sql.into())
    }

    pub fn fragment(sql: impl Into<String>, binds: Vec<Value>) -> Self {
        Expr::Fragment {
            sql: sql.into(),
            binds,
        }
    }

    pub fn equality(column: ColumnRef, value: impl Into<Value>) -> Self {
        Expr::Equality {
            column,
            value: value.into(),
        }
    }

    pub fn grouping(expr: Expr) -> Self {
        Expr::Grouping(Box::new(expr))
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, Expr::Equality { .. })
    }

    /// True when the expression would render as nothing
    pub fn is_blank(&self) -> bool {
        match self {
            Expr::Sql(sql) | Expr::Fragment { sql, .. } => sql.trim().is_empty(),
            Expr::And(children) => children.iter().all(Expr::is_blank),
            Expr::Grouping(inner) => inner.is_blank(),
            _ => false,
        }
    }

    /// For a fragment, `Some((placeholders, binds))` when the number of `?`
    /// placeholders does not match the number of bound values.
    ///
    /// A fragment without any binds is raw SQL and never mismatches.
    pub fn bind_mismatch(&self) -> Option<(usize, usize)> {
        match self {
            Expr::Fragment { sql, binds } if !binds.is_empty() => {
                let expected = placeholder_count(sql);
                (expected != binds.len()).then_some((expected, binds.len()))
            }
            Expr::Grouping(inner) => inner.bind_mismatch(),
            Expr::And(children) => children.iter().find_map(Expr::bind_mismatch),
            _ => None,
        }
    }
}

impl From<&str> for Expr {
    fn from(sql: &str) -> Self {
        Expr::Sql(sql.to_string())
    }
}

impl From<String> for Expr {
    fn from(sql: String) -> Self {
        Expr::Sql(sql)
    }
}

impl From<ColumnRef> for Expr {
    fn from(column: ColumnRef) -> Self {
        Expr::Column(column)
    }
}

/// Count `?` placeholders outside single-quoted string literals
pub fn placeholder_count(sql: &str) -> usize {
    let mut quoted = false;
    let mut count = 0;
    for ch in sql.chars() {
        match ch {
            '\'' => quoted = !quoted,
            '?' if !quoted => count += 1,
            _ => {}
        }
    }
    count
}

/// Column reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Optional table/alias name
    pub table: Option<String>,
    /// Column name
    pub column: String,
}

impl ColumnRef {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            table: None,
            column: column.into(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Split `table.column` into a qualified reference; anything without a
    /// dot is qualified with `default_table`
    pub fn parse(name: &str, default_table: &str) -> Self {
        match name.rsplit_once('.') {
            Some((table, column)) => ColumnRef::new(column).with_table(table),
            None => ColumnRef::new(name).with_table(default_table),
        }
    }

    pub fn qualified(&self) -> String {
        match &self.table {
            Some(table) => format!("{}.{}", table, self.column),
            None => self.column.clone(),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BinaryOp {
    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // Other
    Like,
    In,
    Is,
}
