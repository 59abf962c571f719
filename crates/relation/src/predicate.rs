// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Predicate translation
//!
//! Normalizes a [`Condition`] into canonical predicate nodes:
//!
//! - condition text (alone or leading a sequence) becomes one
//!   [`Expr::Fragment`] carrying every bind, including the extra arguments
//! - attribute/value pairs are expanded by the [`Model`] and become one
//!   [`Expr::Equality`] each; list values stay equalities (set membership)
//! - any other node passes through untouched
//!
//! Blank conditions translate to no nodes, which lets the chaining layer
//! return the receiver unchanged.
//!
//! Binds are never substituted here. [`verify_binds`] is the check a
//! renderer runs before substitution.

use clausal_ir::{ColumnRef, Expr, Value};
use tracing::trace;

use crate::condition::Condition;
use crate::error::{RelationError, RelationResult};
use crate::model::Model;
use crate::seq::overlay;

/// Translate a condition plus extra positional binds into predicate nodes
pub fn translate(
    model: &dyn Model,
    condition: Condition,
    extra: Vec<Value>,
) -> RelationResult<Vec<Expr>> {
    if condition.is_blank() {
        return Ok(Vec::new());
    }

    match condition {
        Condition::Blank => Ok(Vec::new()),
        Condition::Sql { text, mut binds } => {
            binds.extend(extra);
            Ok(vec![Expr::Fragment { sql: text, binds }])
        }
        Condition::Sequence(values) => {
            let mut values = values.into_iter();
            match values.next() {
                Some(Value::String(text)) => {
                    let mut binds: Vec<Value> = values.collect();
                    binds.extend(extra);
                    Ok(vec![Expr::Fragment { sql: text, binds }])
                }
                first => Err(RelationError::InvalidArguments {
                    operation: "where".to_string(),
                    reason: format!("condition list must start with SQL text, got {first:?}"),
                }),
            }
        }
        Condition::Attributes(pairs) => {
            if !extra.is_empty() {
                trace!(count = extra.len(), "ignoring binds passed with attribute conditions");
            }
            let table = model.table_name();
            let expanded = model.expand_conditions(pairs)?;
            let mut predicates = Vec::with_capacity(expanded.len());
            for (attribute, value) in expanded {
                match value {
                    // Nested `{ table: { column: value } }` condition
                    Value::Record(fields) if !attribute.contains('.') => {
                        for (column, value) in fields {
                            predicates.push(Expr::equality(
                                ColumnRef::new(column).with_table(attribute.as_str()),
                                value,
                            ));
                        }
                    }
                    value => {
                        predicates.push(Expr::equality(ColumnRef::parse(&attribute, table), value));
                    }
                }
            }
            Ok(predicates)
        }
        Condition::Node(expr) => Ok(vec![expr]),
    }
}

/// Check that every fragment inside `expr` binds as many values as it has
/// placeholders.
///
/// # Errors
///
/// Returns `RelationError::MalformedCondition` for the first mismatching
/// fragment.
pub fn verify_binds(expr: &Expr) -> RelationResult<()> {
    match expr {
        Expr::Fragment { sql, .. } => match expr.bind_mismatch() {
            Some((expected, supplied)) => Err(RelationError::MalformedCondition {
                sql: sql.clone(),
                expected,
                supplied,
            }),
            None => Ok(()),
        },
        Expr::Grouping(inner) => verify_binds(inner),
        Expr::And(children) => children.iter().try_for_each(verify_binds),
        _ => Ok(()),
    }
}

/// Equality predicates on `table`, as column/value pairs in first-seen
/// column order. A column constrained more than once keeps its last value.
pub fn equality_values(predicates: &[Expr], table: &str) -> Vec<(String, Value)> {
    let pairs: Vec<(String, Value)> = predicates
        .iter()
        .filter_map(|predicate| match predicate {
            Expr::Equality { column, value } if column.table.as_deref() == Some(table) => {
                Some((column.column.clone(), value.clone()))
            }
            _ => None,
        })
        .collect();

    let mut values = Vec::with_capacity(pairs.len());
    overlay(&mut values, &pairs);
    values
}
