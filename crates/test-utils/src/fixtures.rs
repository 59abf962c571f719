// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Test fixtures and sample schemas
//!
//! Schemas are written as YAML lists of tables and deserialized straight
//! into [`TableMetadata`].

use std::sync::Arc;

use clausal_ir::TableMetadata;
use thiserror::Error;

/// Errors raised while loading a fixture
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Invalid schema YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Table not found in fixture: {0}")]
    TableNotFound(String),
}

/// Standard schema: users with posts and comments
const STANDARD_SCHEMA: &str = r#"
- name: users
  comment: User accounts
  columns:
    - { name: id, data_type: BigInt, is_primary_key: true }
    - { name: name, data_type: Text, nullable: true }
    - { name: email, data_type: Text }
    - { name: active, data_type: Boolean }
    - { name: role, data_type: Text }
    - { name: age, data_type: Integer, nullable: true }
    - { name: address_street, data_type: Text, nullable: true }
    - { name: address_city, data_type: Text, nullable: true }
    - { name: created_at, data_type: Timestamp, nullable: true }
  aggregates:
    - name: address
      mapping:
        - [street, address_street]
        - [city, address_city]

- name: posts
  columns:
    - { name: id, data_type: BigInt, is_primary_key: true }
    - { name: user_id, data_type: BigInt }
    - { name: title, data_type: Text }
    - { name: published_at, data_type: Timestamp, nullable: true }

- name: comments
  columns:
    - { name: uuid, data_type: Uuid, is_primary_key: true }
    - { name: post_id, data_type: BigInt }
    - { name: user_id, data_type: BigInt }
    - { name: body, data_type: Text }
"#;

/// Parse a YAML list of tables
pub fn load_schema(yaml: &str) -> Result<Vec<TableMetadata>, FixtureError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Sample schemas for testing
pub struct SchemaFixtures;

impl SchemaFixtures {
    /// Every table of the standard schema
    pub fn standard() -> Result<Vec<TableMetadata>, FixtureError> {
        load_schema(STANDARD_SCHEMA)
    }

    /// One table of the standard schema
    pub fn table(name: &str) -> Result<TableMetadata, FixtureError> {
        Self::standard()?
            .into_iter()
            .find(|table| table.name == name)
            .ok_or_else(|| FixtureError::TableNotFound(name.to_string()))
    }

    /// `users`, ready to root a relation
    pub fn users() -> Arc<TableMetadata> {
        Arc::new(Self::table("users").expect("standard schema defines users"))
    }

    /// `posts`, ready to root a relation
    pub fn posts() -> Arc<TableMetadata> {
        Arc::new(Self::table("posts").expect("standard schema defines posts"))
    }

    /// `comments`, ready to root a relation; its primary key is `uuid`
    pub fn comments() -> Arc<TableMetadata> {
        Arc::new(Self::table("comments").expect("standard schema defines comments"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clausal_ir::DataType;

    #[test]
    fn test_standard_schema_loads() {
        let tables = SchemaFixtures::standard().unwrap();
        let names: Vec<_> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["users", "posts", "comments"]);
    }

    #[test]
    fn test_users_fixture() {
        let users = SchemaFixtures::users();
        assert_eq!(users.primary_key(), "id");
        assert_eq!(
            users.get_column("name").map(|c| c.data_type.clone()),
            Some(DataType::Text)
        );
        let address = users.get_aggregate("address").unwrap();
        assert_eq!(address.mapping.len(), 2);
    }

    #[test]
    fn test_comments_primary_key() {
        assert_eq!(SchemaFixtures::comments().primary_key(), "uuid");
    }

    #[test]
    fn test_missing_table() {
        assert!(matches!(
            SchemaFixtures::table("likes"),
            Err(FixtureError::TableNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(load_schema("- name: ["), Err(FixtureError::Yaml(_))));
    }
}
