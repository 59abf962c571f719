// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Condition expressions
//!
//! [`Condition`] is the argument of `where` and `having`. Each variant is one
//! of the shapes callers hand in:
//!
//! ```rust,ignore
//! relation.where_("archived_at IS NULL")?;                      // Sql
//! relation.where_(Condition::sql("age > ?", [18]))?;            // Sql with binds
//! relation.where_(Condition::Sequence(vec!["a = ?".into(), 1.into()]))?;
//! relation.where_([("name", "bob"), ("role", "admin")])?;       // Attributes
//! relation.where_(Expr::sql("EXISTS (...)"))?;                 // Node
//! relation.where_(None::<&str>)?;                               // Blank
//! ```

use clausal_ir::{Expr, Value};

/// A raw condition, before translation into predicate nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Contributes nothing
    Blank,

    /// Condition text with positional binds
    Sql { text: String, binds: Vec<Value> },

    /// Condition text followed by its binds, as one list
    Sequence(Vec<Value>),

    /// Attribute/value pairs, each becoming an equality
    Attributes(Vec<(String, Value)>),

    /// Pre-built AST node passed through verbatim
    Node(Expr),
}

impl Condition {
    pub fn sql<V: Into<Value>>(text: impl Into<String>, binds: impl IntoIterator<Item = V>) -> Self {
        Condition::Sql {
            text: text.into(),
            binds: binds.into_iter().map(Into::into).collect(),
        }
    }

    pub fn attributes<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Condition::Attributes(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// True when translation would produce no predicate nodes
    pub fn is_blank(&self) -> bool {
        match self {
            Condition::Blank => true,
            Condition::Sql { text, .. } => text.trim().is_empty(),
            Condition::Sequence(values) => values.first().is_none_or(Value::is_blank),
            Condition::Attributes(pairs) => pairs.is_empty(),
            Condition::Node(expr) => expr.is_blank(),
        }
    }
}

impl From<&str> for Condition {
    fn from(text: &str) -> Self {
        Condition::Sql {
            text: text.to_string(),
            binds: Vec::new(),
        }
    }
}

impl From<String> for Condition {
    fn from(text: String) -> Self {
        Condition::Sql {
            text,
            binds: Vec::new(),
        }
    }
}

impl From<Expr> for Condition {
    fn from(expr: Expr) -> Self {
        Condition::Node(expr)
    }
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for Condition {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Condition::attributes(pairs)
    }
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Condition {
    fn from(pairs: [(K, V); N]) -> Self {
        Condition::attributes(pairs)
    }
}

impl<C: Into<Condition>> From<Option<C>> for Condition {
    fn from(condition: Option<C>) -> Self {
        condition.map_or(Condition::Blank, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_shapes() {
        assert!(Condition::Blank.is_blank());
        assert!(Condition::from("  ").is_blank());
        assert!(Condition::from(None::<&str>).is_blank());
        assert!(Condition::Attributes(Vec::new()).is_blank());
        assert!(Condition::Sequence(Vec::new()).is_blank());
        assert!(Condition::from(Expr::sql("")).is_blank());
        assert!(!Condition::from("a = 1").is_blank());
    }

    #[test]
    fn test_attribute_conversion_keeps_order() {
        let condition = Condition::from([("b", 2), ("a", 1)]);
        assert_eq!(
            condition,
            Condition::Attributes(vec![
                ("b".to_string(), Value::Integer(2)),
                ("a".to_string(), Value::Integer(1)),
            ])
        );
    }
}
