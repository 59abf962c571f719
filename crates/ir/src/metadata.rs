// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Table metadata
//!
//! Describes the table a query builder is rooted at: its columns, primary
//! key and aggregate (composed) attributes. Aggregates map the fields of a
//! composite value onto real columns, e.g. an `address` record whose `city`
//! field lives in the `address_city` column.

use serde::{Deserialize, Serialize};

/// SQL data types (unified across dialects)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DataType {
    Integer,
    BigInt,
    Decimal,
    Float,
    Varchar(Option<usize>),
    Text,
    Boolean,
    Date,
    Timestamp,
    Json,
    Uuid,
    // Unknown/Other (with original type name)
    Other(String),
}

/// Metadata for a database column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Column name
    pub name: String,
    /// Data type
    pub data_type: DataType,
    /// Whether the column is nullable
    #[serde(default)]
    pub nullable: bool,
    /// Whether this is a primary key column
    #[serde(default)]
    pub is_primary_key: bool,
}

impl ColumnMetadata {
    /// Create a new column metadata with builder pattern
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: false,
            is_primary_key: false,
        }
    }

    /// Builder method: set nullable
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Builder method: mark as primary key
    pub fn with_primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }
}

/// Composite attribute spread over several columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateMetadata {
    /// Attribute name used in conditions
    pub name: String,
    /// `(record field, column)` pairs
    pub mapping: Vec<(String, String)>,
}

impl AggregateMetadata {
    pub fn new<F, C>(name: impl Into<String>, mapping: impl IntoIterator<Item = (F, C)>) -> Self
    where
        F: Into<String>,
        C: Into<String>,
    {
        Self {
            name: name.into(),
            mapping: mapping
                .into_iter()
                .map(|(field, column)| (field.into(), column.into()))
                .collect(),
        }
    }
}

/// Metadata for a database table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Table name
    pub name: String,
    /// Column definitions
    #[serde(default)]
    pub columns: Vec<ColumnMetadata>,
    /// Aggregate attributes
    #[serde(default)]
    pub aggregates: Vec<AggregateMetadata>,
    /// Table comment/description
    #[serde(default)]
    pub comment: Option<String>,
}

impl TableMetadata {
    /// Create new table metadata with builder pattern
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            aggregates: Vec::new(),
            comment: None,
        }
    }

    /// Builder method: add columns
    pub fn with_columns(mut self, columns: Vec<ColumnMetadata>) -> Self {
        self.columns = columns;
        self
    }

    /// Builder method: add an aggregate attribute
    pub fn with_aggregate(mut self, aggregate: AggregateMetadata) -> Self {
        self.aggregates.push(aggregate);
        self
    }

    /// Builder method: set comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Get column by name
    pub fn get_column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get aggregate attribute by name
    pub fn get_aggregate(&self, name: &str) -> Option<&AggregateMetadata> {
        self.aggregates.iter().find(|a| a.name == name)
    }

    /// Name of the primary key column, `id` when none is flagged
    pub fn primary_key(&self) -> &str {
        self.columns
            .iter()
            .find(|c| c.is_primary_key)
            .map_or("id", |c| c.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_key_lookup() {
        let table = TableMetadata::new("users").with_columns(vec![
            ColumnMetadata::new("uid", DataType::BigInt).with_primary_key(),
            ColumnMetadata::new("name", DataType::Text),
        ]);
        assert_eq!(table.primary_key(), "uid");
        assert_eq!(TableMetadata::new("posts").primary_key(), "id");
    }

    #[test]
    fn test_aggregate_lookup() {
        let table = TableMetadata::new("users")
            .with_aggregate(AggregateMetadata::new("address", [("city", "address_city")]));
        assert!(table.get_aggregate("address").is_some());
        assert!(table.get_aggregate("city").is_none());
    }
}
