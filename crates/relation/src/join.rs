// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Join resolution
//!
//! Joins arrive in four shapes:
//!
//! | shape | variants | becomes |
//! |---|---|---|
//! | textual | `Sql`, `Lines`, list of text | literal [`Join::Sql`] node |
//! | structural | `Association`, list of associations | resolved by the join graph |
//! | pre-resolved | `Resolved` | grafted onto the join graph |
//! | AST node | `Node` | attached as given |
//!
//! Resolution partitions the specs by shape (keeping input order inside each
//! bucket), hands associations and pre-resolved joins to a
//! [`JoinGraphResolver`], and attaches in the order
//! AST nodes, textual joins, association joins. Explicit joins always
//! precede derived ones.
//!
//! Any association or pre-resolved join raises the implicit read-only
//! signal: association joins may pull in columns that cannot be written back.

use std::fmt;

use clausal_ir::{Join, SelectStatement};
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{RelationError, RelationResult};
use crate::model::Model;
use crate::seq::unique;

/// Association descriptor: a name, optionally with nested associations
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Association {
    /// `posts`
    Name(String),

    /// `{ posts: [comments, tags] }`
    Nested(String, Vec<Association>),
}

impl Association {
    pub fn name(name: impl Into<String>) -> Self {
        Association::Name(name.into())
    }

    pub fn nested(name: impl Into<String>, children: Vec<Association>) -> Self {
        Association::Nested(name.into(), children)
    }

    /// Parse a dotted path, `posts.comments.author` nesting left to right
    pub fn path(path: &str) -> Self {
        let mut names = path.rsplit('.');
        let leaf = Association::name(names.next().unwrap_or_default());
        names.fold(leaf, |child, parent| Association::nested(parent, vec![child]))
    }

    /// Association directly on the owning model
    pub fn root(&self) -> &str {
        match self {
            Association::Name(name) | Association::Nested(name, _) => name,
        }
    }

    fn is_well_formed(&self) -> bool {
        match self {
            Association::Name(name) => !name.trim().is_empty(),
            Association::Nested(name, children) => {
                !name.trim().is_empty() && children.iter().all(Association::is_well_formed)
            }
        }
    }
}

impl From<&str> for Association {
    fn from(path: &str) -> Self {
        Association::path(path)
    }
}

/// A join the join graph produced for one association.
///
/// Feeding it back through [`JoinSpec::Resolved`] grafts it onto another
/// resolution instead of resolving the association again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationJoin {
    /// Association names from the owning model down to the joined one
    pub path: Vec<String>,
    /// Join node attached for this association
    pub join: Join,
}

impl AssociationJoin {
    pub fn new(path: Vec<String>, join: Join) -> Self {
        Self { path, join }
    }

    /// Attach this join onto a statement
    pub fn join_to(&self, statement: &mut SelectStatement) {
        statement.join(self.join.clone());
    }
}

/// A raw join input
#[derive(Debug, Clone, PartialEq)]
pub enum JoinSpec {
    /// Literal join text
    Sql(String),

    /// Literal join text split over several lines
    Lines(Vec<String>),

    /// Association descriptor
    Association(Association),

    /// Several specs given together
    List(Vec<JoinSpec>),

    /// Association join resolved earlier
    Resolved(AssociationJoin),

    /// Already-built join node
    Node(Join),
}

impl JoinSpec {
    pub fn lines<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        JoinSpec::Lines(lines.into_iter().map(Into::into).collect())
    }

    pub fn is_blank(&self) -> bool {
        match self {
            JoinSpec::Sql(sql) => sql.trim().is_empty(),
            JoinSpec::Lines(lines) => lines.iter().all(|l| l.trim().is_empty()),
            JoinSpec::List(specs) => specs.iter().all(JoinSpec::is_blank),
            JoinSpec::Association(_) | JoinSpec::Resolved(_) | JoinSpec::Node(_) => false,
        }
    }

    fn is_textual(&self) -> bool {
        matches!(self, JoinSpec::Sql(_) | JoinSpec::Lines(_))
    }

    fn is_structural(&self) -> bool {
        match self {
            JoinSpec::Association(_) => true,
            JoinSpec::List(specs) => !specs.is_empty() && specs.iter().all(JoinSpec::is_structural),
            _ => false,
        }
    }
}

impl From<&str> for JoinSpec {
    fn from(sql: &str) -> Self {
        JoinSpec::Sql(sql.to_string())
    }
}

impl From<String> for JoinSpec {
    fn from(sql: String) -> Self {
        JoinSpec::Sql(sql)
    }
}

impl From<Association> for JoinSpec {
    fn from(association: Association) -> Self {
        JoinSpec::Association(association)
    }
}

impl From<AssociationJoin> for JoinSpec {
    fn from(join: AssociationJoin) -> Self {
        JoinSpec::Resolved(join)
    }
}

impl From<Join> for JoinSpec {
    fn from(join: Join) -> Self {
        JoinSpec::Node(join)
    }
}

/// Builds the join graph for a model's associations
pub trait JoinGraphResolver: Send + Sync {
    /// Resolve `associations` against `model`. `joins` are the explicit join
    /// nodes already on the statement, which the graph may use to pick
    /// aliases that do not collide.
    ///
    /// # Errors
    ///
    /// Returns `RelationError::AssociationNotFound` for an unknown
    /// association.
    fn resolve(
        &self,
        model: &dyn Model,
        associations: &[Association],
        joins: &[Join],
    ) -> RelationResult<Box<dyn JoinGraph>>;
}

/// Result of a join graph resolution
pub trait JoinGraph: fmt::Debug {
    /// Attach association joins resolved earlier
    fn graft(&mut self, joins: &[AssociationJoin]) -> RelationResult<()>;

    /// Every association join, in attachment order
    fn join_associations(&self) -> Vec<AssociationJoin>;
}

/// Resolver for models without association metadata.
///
/// Grafted joins are kept; any association is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssociations;

impl JoinGraphResolver for NoAssociations {
    fn resolve(
        &self,
        model: &dyn Model,
        associations: &[Association],
        _joins: &[Join],
    ) -> RelationResult<Box<dyn JoinGraph>> {
        if let Some(association) = associations.first() {
            return Err(RelationError::AssociationNotFound {
                model: model.table_name().to_string(),
                association: association.root().to_string(),
            });
        }
        Ok(Box::new(GraftedJoins::default()))
    }
}

/// Join graph holding grafted joins only
#[derive(Debug, Clone, Default)]
pub struct GraftedJoins {
    joins: Vec<AssociationJoin>,
}

impl JoinGraph for GraftedJoins {
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

/// Trim each line, drop blank ones and join the rest with single spaces
fn join_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Join specs partitioned by shape
#[derive(Debug, Default)]
pub(crate) struct JoinBuckets {
    nodes: Vec<Join>,
    text: Vec<String>,
    associations: Vec<Association>,
    resolved: Vec<AssociationJoin>,
}

impl JoinBuckets {
    fn push(&mut self, spec: &JoinSpec) -> RelationResult<()> {
        match spec {
            JoinSpec::Sql(sql) => self.text.push(sql.clone()),
            JoinSpec::Lines(lines) => self.text.push(join_lines(lines)),
            JoinSpec::Association(association) => {
                if !association.is_well_formed() {
                    return Err(RelationError::UnsupportedJoinSpec(format!(
                        "blank association name in {association:?}"
                    )));
                }
                self.associations.push(association.clone());
            }
            JoinSpec::Resolved(join) => self.resolved.push(join.clone()),
            JoinSpec::Node(join) => self.nodes.push(join.clone()),
            JoinSpec::List(specs) if !specs.is_empty() && specs.iter().all(JoinSpec::is_textual) => {
                let lines: Vec<String> = specs
                    .iter()
                    .map(|spec| match spec {
                        JoinSpec::Sql(sql) => sql.clone(),
                        JoinSpec::Lines(lines) => join_lines(lines),
                        _ => String::new(),
                    })
                    .collect();
                self.text.push(join_lines(&lines));
            }
            JoinSpec::List(specs) if spec.is_structural() => {
                for spec in specs {
                    self.push(spec)?;
                }
            }
            JoinSpec::List(specs) => {
                return Err(RelationError::UnsupportedJoinSpec(format!(
                    "list mixes join shapes: {specs:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Partition join specs by shape, failing on any unrecognized shape
pub(crate) fn classify(specs: &[JoinSpec]) -> RelationResult<JoinBuckets> {
    let mut buckets = JoinBuckets::default();
    for spec in specs.iter().filter(|spec| !spec.is_blank()) {
        buckets.push(spec)?;
    }
    Ok(buckets)
}

/// Joins resolved for one statement
#[derive(Debug, Clone, Default)]
pub struct JoinResolution {
    /// Explicit joins: AST nodes, then textual joins
    pub explicit: Vec<Join>,
    /// Joins produced by the join graph
    pub associations: Vec<AssociationJoin>,
    /// Association or pre-resolved joins were present
    pub implicit_readonly: bool,
}

impl JoinResolution {
    /// Every join node, in attachment order
    pub fn joins(&self) -> Vec<Join> {
        self.explicit
            .iter()
            .cloned()
            .chain(self.associations.iter().map(|a| a.join.clone()))
            .collect()
    }

    /// Attach explicit joins, then association joins
    pub fn attach(&self, statement: &mut SelectStatement) {
        for join in &self.explicit {
            statement.join(join.clone());
        }
        for association in &self.associations {
            association.join_to(statement);
        }
    }
}

/// Classify and resolve join specs against `model`
pub fn resolve_joins(
    model: &dyn Model,
    resolver: &dyn JoinGraphResolver,
    specs: &[JoinSpec],
) -> RelationResult<JoinResolution> {
    let buckets = classify(specs)?;

    let text_joins = unique(
        buckets
            .text
            .iter()
            .map(|sql| sql.trim().to_string())
            .filter(|sql| !sql.is_empty()),
    );
    let mut explicit = unique(buckets.nodes);
    explicit.extend(text_joins.into_iter().map(Join::Sql));

    let derived = !(buckets.associations.is_empty() && buckets.resolved.is_empty());
    let associations = if derived {
        let mut graph = resolver.resolve(model, &buckets.associations, &explicit)?;
        graph.graft(&buckets.resolved)?;
        graph.join_associations()
    } else {
        Vec::new()
    };

    debug!(
        explicit = explicit.len(),
        associations = associations.len(),
        "resolved joins for {}",
        model.table_name()
    );
    trace!(?explicit, ?associations, "join nodes");

    Ok(JoinResolution {
        explicit,
        associations,
        implicit_readonly: derived,
    })
}
