// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Mock join graph implementation for testing
//!
//! Provides an in-memory association registry with builder pattern for easy
//! test setup

use std::collections::HashMap;

use clausal_ir::{BinaryOp, ColumnRef, Expr, Join, TableRef};
use clausal_relation::{
    Association, AssociationJoin, JoinGraph, JoinGraphResolver, Model, RelationError,
    RelationResult,
};

/// Where an association's foreign key lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ForeignKey {
    /// On the associated table (`has_many`)
    OnTarget,
    /// On the owning table (`belongs_to`)
    OnOwner,
}

#[derive(Debug, Clone)]
struct AssociationTarget {
    table: String,
    foreign_key: String,
    side: ForeignKey,
}

/// In-memory join graph resolver for testing
#[derive(Debug, Clone, Default)]
pub struct MockJoinGraphResolver {
    /// Keyed by (owner table, association name)
    associations: HashMap<(String, String), AssociationTarget>,
}

impl MockJoinGraphResolver {
    /// Create a resolver that knows no associations
    pub fn new() -> Self {
        Self::default()
    }

    /// `owner` has many rows in `table`, linked by `table.foreign_key`
    pub fn has_many(
        mut self,
        owner: &str,
        name: &str,
        table: &str,
        foreign_key: &str,
    ) -> Self {
        self.insert(owner, name, table, foreign_key, ForeignKey::OnTarget);
        self
    }

    /// `owner` belongs to a row in `table`, linked by `owner.foreign_key`
    pub fn belongs_to(
        mut self,
        owner: &str,
        name: &str,
        table: &str,
        foreign_key: &str,
    ) -> Self {
        self.insert(owner, name, table, foreign_key, ForeignKey::OnOwner);
        self
    }

    fn insert(&mut self, owner: &str, name: &str, table: &str, foreign_key: &str, side: ForeignKey) {
        self.associations.insert(
            (owner.to_string(), name.to_string()),
            AssociationTarget {
                table: table.to_string(),
                foreign_key: foreign_key.to_string(),
                side,
            },
        );
    }

    fn resolve_one(
        &self,
        owner: &str,
        association: &Association,
        parent_path: &[String],
        taken: &mut Vec<String>,
        out: &mut Vec<AssociationJoin>,
    ) -> RelationResult<()> {
        let name = association.root();
        let target = self
            .associations
            .get(&(owner.to_string(), name.to_string()))
            .ok_or_else(|| RelationError::AssociationNotFound {
                model: owner.to_string(),
                association: name.to_string(),
            })?;

        let mut path = parent_path.to_vec();
        path.push(name.to_string());

        // Second reference to the same table gets an owner-qualified alias
        let mut table_ref = TableRef::new(&target.table);
        if taken.iter().any(|t| t == &target.table) {
            table_ref = table_ref.with_alias(format!("{}_{}", target.table, owner));
        }
        let reference = table_ref.reference_name().to_string();
        taken.push(reference.clone());

        let on = match target.side {
            ForeignKey::OnTarget => column_eq(&reference, &target.foreign_key, owner, "id"),
            ForeignKey::OnOwner => column_eq(&reference, "id", owner, &target.foreign_key),
        };
        let join = AssociationJoin::new(path.clone(), Join::inner(table_ref, on));
        if !out.contains(&join) {
            out.push(join);
        }

        if let Association::Nested(_, children) = association {
            for child in children {
                self.resolve_one(&reference, child, &path, taken, out)?;
            }
        }
        Ok(())
    }
}

impl JoinGraphResolver for MockJoinGraphResolver {
    fn resolve(
        &self,
        model: &dyn Model,
        associations: &[Association],
        joins: &[Join],
    ) -> RelationResult<Box<dyn JoinGraph>> {
        let mut taken: Vec<String> = std::iter::once(model.table_name().to_string())
            .chain(joins.iter().filter_map(|join| match join {
                Join::Table { table, .. } => Some(table.reference_name().to_string()),
                Join::Sql(_) => None,
            }))
            .collect();

        let mut resolved = Vec::new();
        for association in associations {
            self.resolve_one(model.table_name(), association, &[], &mut taken, &mut resolved)?;
        }
        Ok(Box::new(MockJoinGraph { joins: resolved }))
    }
}

/// Join graph produced by [`MockJoinGraphResolver`]
#[derive(Debug, Clone, Default)]
pub struct MockJoinGraph {
    joins: Vec<AssociationJoin>,
}

impl JoinGraph for MockJoinGraph {
    fn graft(&mut self, joins: &[AssociationJoin]) -> RelationResult<()> {
        for join in joins {
            if !self.joins.contains(join) {
                self.joins.push(join.clone());
            }
        }
        Ok(())
    }

    fn join_associations(&self) -> Vec<AssociationJoin> {
        self.joins.clone()
    }
}

fn column_eq(left_table: &str, left: &str, right_table: &str, right: &str) -> Expr {
    Expr::BinaryOp {
        left: Box::new(Expr::Column(ColumnRef::new(left).with_table(left_table))),
        op: BinaryOp::Eq,
        right: Box::new(Expr::Column(ColumnRef::new(right).with_table(right_table))),
    }
}

/// Builder for creating mock join graph resolvers with a fluent API
pub struct MockJoinGraphResolverBuilder {
    resolver: MockJoinGraphResolver,
}

impl Default for MockJoinGraphResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockJoinGraphResolverBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            resolver: MockJoinGraphResolver::new(),
        }
    }

    /// Add the associations of the standard test schema:
    /// users have many posts and comments, posts have many comments and
    /// belong to an author (users)
    pub fn with_standard_associations(mut self) -> Self {
        self.resolver = self
            .resolver
            .has_many("users", "posts", "posts", "user_id")
            .has_many("users", "comments", "comments", "user_id")
            .has_many("posts", "comments", "comments", "post_id")
            .belongs_to("posts", "author", "users", "user_id")
            .belongs_to("comments", "post", "posts", "post_id");
        self
    }

    /// Build the resolver
    pub fn build(self) -> MockJoinGraphResolver {
        self.resolver
    }
}
