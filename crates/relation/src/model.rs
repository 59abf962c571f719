// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Model trait
//!
//! The object-relational layer a relation is rooted at. The relation only
//! needs three things from it: the primary table name, the primary key and
//! the expansion of attribute/value conditions into plain column conditions.
//!
//! [`TableMetadata`] implements the trait directly, which is enough for
//! models described by static schema data.

use std::fmt;

use clausal_ir::{TableMetadata, Value};

use crate::error::{RelationError, RelationResult};

/// The entity type a relation queries
pub trait Model: Send + Sync + fmt::Debug {
    /// Primary table name
    fn table_name(&self) -> &str;

    /// Primary key column
    fn primary_key(&self) -> &str;

    /// Expand composite attributes into primitive attribute/value pairs.
    ///
    /// # Errors
    ///
    /// Returns `RelationError::ConditionExpansion` for an attribute the
    /// model does not know.
    fn expand_conditions(
        &self,
        conditions: Vec<(String, Value)>,
    ) -> RelationResult<Vec<(String, Value)>> {
        Ok(conditions)
    }
}

impl Model for TableMetadata {
    fn table_name(&self) -> &str {
        &self.name
    }

    fn primary_key(&self) -> &str {
        TableMetadata::primary_key(self)
    }

    fn expand_conditions(
        &self,
        conditions: Vec<(String, Value)>,
    ) -> RelationResult<Vec<(String, Value)>> {
        let mut expanded = Vec::with_capacity(conditions.len());

        for (attribute, value) in conditions {
            // Qualified keys belong to another table
            if attribute.contains('.') {
                expanded.push((attribute, value));
                continue;
            }

            if let Some(aggregate) = self.get_aggregate(&attribute) {
                match value {
                    Value::Record(fields) => {
                        for (field, column) in &aggregate.mapping {
                            let part = fields
                                .iter()
                                .find(|(name, _)| name == field)
                                .map_or(Value::Null, |(_, v)| v.clone());
                            expanded.push((column.clone(), part));
                        }
                    }
                    Value::Null => {
                        for (_, column) in &aggregate.mapping {
                            expanded.push((column.clone(), Value::Null));
                        }
                    }
                    other => {
                        return Err(RelationError::InvalidArguments {
                            operation: "where".to_string(),
                            reason: format!(
                                "aggregate '{}' expects a record, got {:?}",
                                aggregate.name, other
                            ),
                        });
                    }
                }
                continue;
            }

            // A record on a non-column key is a nested per-table condition
            if self.get_column(&attribute).is_some() || matches!(value, Value::Record(_)) {
                expanded.push((attribute, value));
                continue;
            }

            return Err(RelationError::ConditionExpansion {
                model: self.name.clone(),
                attribute,
            });
        }

        Ok(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clausal_ir::{AggregateMetadata, ColumnMetadata, DataType};

    fn users() -> TableMetadata {
        TableMetadata::new("users")
            .with_columns(vec![
                ColumnMetadata::new("id", DataType::BigInt).with_primary_key(),
                ColumnMetadata::new("name", DataType::Text),
                ColumnMetadata::new("address_city", DataType::Text),
                ColumnMetadata::new("address_zip", DataType::Text),
            ])
            .with_aggregate(AggregateMetadata::new(
                "address",
                [("city", "address_city"), ("zip", "address_zip")],
            ))
    }

    #[test]
    fn test_plain_columns_pass_through() {
        let expanded = users()
            .expand_conditions(vec![("name".to_string(), Value::from("bob"))])
            .unwrap();
        assert_eq!(expanded, vec![("name".to_string(), Value::from("bob"))]);
    }

    #[test]
    fn test_aggregate_expands_into_columns() {
        let address = Value::record([("city", "Oslo"), ("zip", "0150")]);
        let expanded = users()
            .expand_conditions(vec![("address".to_string(), address)])
            .unwrap();
        assert_eq!(
            expanded,
            vec![
                ("address_city".to_string(), Value::from("Oslo")),
                ("address_zip".to_string(), Value::from("0150")),
            ]
        );
    }

    #[test]
    fn test_unknown_attribute_is_rejected() {
        let err = users()
            .expand_conditions(vec![("nickname".to_string(), Value::from("b"))])
            .unwrap_err();
        assert_eq!(
            err,
            RelationError::ConditionExpansion {
                model: "users".to_string(),
                attribute: "nickname".to_string(),
            }
        );
    }

    #[test]
    fn test_qualified_and_nested_keys_pass_through() {
        let conditions = vec![
            ("posts.title".to_string(), Value::from("hi")),
            ("posts".to_string(), Value::record([("draft", false)])),
        ];
        let expanded = users().expand_conditions(conditions.clone()).unwrap();
        assert_eq!(expanded, conditions);
    }
}
