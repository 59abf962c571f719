// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Statement Representation
//!
//! This module represents a single compiled SELECT statement.
//!
//! ## Statement Structure
//!
//! A [`SelectStatement`] consists of:
//!
//! - **Source**: The relation the statement reads from (table or raw SQL)
//! - **Joins**: Join nodes, in attachment order
//! - **Wheres**: Top-level predicate nodes, implicitly AND-ed
//! - **Groups**: GROUP BY expressions
//! - **Havings**: HAVING predicates, implicitly AND-ed
//! - **Projections**: SELECT list
//! - **Orders**: ORDER BY terms
//! - **Limit / Offset**: Bound values
//! - **Lock**: Row lock clause
//!
//! ## Joins
//!
//! [`Join`] is either literal join text or a structured table join:
//!
//! ```sql
//! -- Literal
//! INNER JOIN posts ON posts.author_id = users.id
//!
//! -- Structured: Join::Table { Inner, posts, On(posts.author_id = users.id) }
//! ```
//!
//! ## Orderings
//!
//! [`OrderTerm`] is either literal text (`"name DESC"`) or a structured
//! [`Ordering`]. Structured orderings reverse themselves through
//! [`Ordering::reverse`]; literal text is rewritten by the query builder.
//!
//! ## Example
//!
//! ```rust,ignore
//! use clausal_ir::{SelectStatement, Source, Value};
//!
//! let stmt = SelectStatement::new(Source::table("users"))
//!     .with_limit(Value::Integer(10))
//!     .with_offset(Value::Integer(5));
//! ```

use serde::{Deserialize, Serialize};

use crate::expr::{ColumnRef, Expr};
use crate::value::Value;

/// A compiled SELECT statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStatement {
    /// FROM source
    pub source: Source,

    /// Join nodes
    pub joins: Vec<Join>,

    /// WHERE predicates
    pub wheres: Vec<Expr>,

    /// GROUP BY clause
    pub groups: Vec<Expr>,

    /// HAVING predicates
    pub havings: Vec<Expr>,

    /// Projection list (columns to select)
    pub projections: Vec<SelectItem>,

    /// ORDER BY clause
    pub orders: Vec<OrderTerm>,

    /// Optional LIMIT clause
    pub limit: Option<Value>,

    /// Optional OFFSET clause
    pub offset: Option<Value>,

    /// Optional row lock
    pub lock: Option<LockClause>,
}

impl SelectStatement {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            joins: Vec::new(),
            wheres: Vec::new(),
            groups: Vec::new(),
            havings: Vec::new(),
            projections: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
            lock: None,
        }
    }

    pub fn with_limit(mut self, limit: Value) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: Value) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_lock(mut self, lock: LockClause) -> Self {
        self.lock = Some(lock);
        self
    }

    /// Append a join node
    pub fn join(&mut self, join: Join) {
        self.joins.push(join);
    }
}

/// The relation a statement reads from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Source {
    /// A named table
    Table(TableRef),

    /// Raw SQL source (subquery or table expression)
    Sql(String),
}

impl Source {
    pub fn table(name: impl Into<String>) -> Self {
        Source::Table(TableRef::new(name))
    }
}

impl From<&str> for Source {
    fn from(sql: &str) -> Self {
        Source::Sql(sql.to_string())
    }
}

impl From<String> for Source {
    fn from(sql: String) -> Self {
        Source::Sql(sql)
    }
}

impl From<TableRef> for Source {
    fn from(table: TableRef) -> Self {
        Source::Table(table)
    }
}

/// Table reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    /// Table name (may include schema/database)
    pub name: String,

    /// Alias
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Name other clauses refer to this table by
    pub fn reference_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// JOIN node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Join {
    /// Literal join text, attached verbatim
    Sql(String),

    /// Structured table join
    Table {
        join_type: JoinType,
        table: TableRef,
        condition: JoinCondition,
    },
}

impl Join {
    /// Inner join on `table` with an ON condition
    pub fn inner(table: TableRef, on: Expr) -> Self {
        Join::Table {
            join_type: JoinType::Inner,
            table,
            condition: JoinCondition::On(on),
        }
    }

    /// Outer (left) join on `table` with an ON condition
    pub fn left(table: TableRef, on: Expr) -> Self {
        Join::Table {
            join_type: JoinType::Left,
            table,
            condition: JoinCondition::On(on),
        }
    }
}

/// Join type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
}

/// Join condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JoinCondition {
    On(Expr),
}

/// Item in a SELECT projection list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectItem {
    /// Unnamed expression (e.g., `column` or `a + b`)
    UnnamedExpr(Expr),

    /// Expression with alias (e.g., `col AS name`)
    AliasedExpr { expr: Expr, alias: String },

    /// Qualified wildcard (e.g., `table.*`)
    QualifiedWildcard(String),

    /// Unqualified wildcard (`*`)
    Wildcard,
}

impl SelectItem {
    pub fn is_blank(&self) -> bool {
        match self {
            SelectItem::UnnamedExpr(expr) | SelectItem::AliasedExpr { expr, .. } => expr.is_blank(),
            SelectItem::QualifiedWildcard(table) => table.trim().is_empty(),
            SelectItem::Wildcard => false,
        }
    }
}

impl From<&str> for SelectItem {
    fn from(sql: &str) -> Self {
        SelectItem::UnnamedExpr(Expr::sql(sql))
    }
}

impl From<String> for SelectItem {
    fn from(sql: String) -> Self {
        SelectItem::UnnamedExpr(Expr::Sql(sql))
    }
}

impl From<ColumnRef> for SelectItem {
    fn from(column: ColumnRef) -> Self {
        SelectItem::UnnamedExpr(Expr::Column(column))
    }
}

/// ORDER BY term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderTerm {
    /// Literal ordering text, e.g. `"name DESC, id"`
    Sql(String),

    /// Structured ordering
    Ordering(Ordering),
}

impl OrderTerm {
    pub fn is_blank(&self) -> bool {
        match self {
            OrderTerm::Sql(sql) => sql.trim().is_empty(),
            OrderTerm::Ordering(ordering) => ordering.expr.is_blank(),
        }
    }
}

impl From<&str> for OrderTerm {
    fn from(sql: &str) -> Self {
        OrderTerm::Sql(sql.to_string())
    }
}

impl From<String> for OrderTerm {
    fn from(sql: String) -> Self {
        OrderTerm::Sql(sql)
    }
}

impl From<Ordering> for OrderTerm {
    fn from(ordering: Ordering) -> Self {
        OrderTerm::Ordering(ordering)
    }
}

/// Structured ORDER BY item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ordering {
    pub expr: Expr,
    /// `None` renders without a direction keyword (ascending)
    pub direction: Option<SortDirection>,
}

impl Ordering {
    pub fn asc(expr: Expr) -> Self {
        Self {
            expr,
            direction: Some(SortDirection::Asc),
        }
    }

    pub fn desc(expr: Expr) -> Self {
        Self {
            expr,
            direction: Some(SortDirection::Desc),
        }
    }

    /// Same expression, opposite direction; an implicit direction counts as
    /// ascending and becomes an explicit descending
    pub fn reverse(&self) -> Self {
        let direction = match self.direction {
            Some(direction) => direction.reverse(),
            None => SortDirection::Desc,
        };
        Self {
            expr: self.expr.clone(),
            direction: Some(direction),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reverse(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Row lock clause
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockClause {
    /// The dialect's default lock (`FOR UPDATE` on most engines)
    Default,

    /// Dialect-specific lock text, e.g. `LOCK IN SHARE MODE`
    Sql(String),
}
