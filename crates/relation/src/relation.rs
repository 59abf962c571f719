// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Relation
//!
//! [`Relation`] accumulates query clauses through chained calls and compiles
//! them into a statement AST on demand.
//!
//! ## Chaining contract
//!
//! A relation is an immutable snapshot behind a shared handle. Every chain
//! method takes `&self` and:
//!
//! - normalizes its argument, dropping blank elements
//! - returns a handle to the *same* snapshot when nothing is left to add
//!   (see [`Relation::same_instance`])
//! - otherwise returns a new snapshot with only the targeted clause changed
//!
//! Sequence clauses (select, group, order, joins, where, having, binds and
//! the association hints) append and deduplicate by value, keeping the first
//! occurrence. Scalar clauses (limit, offset, reorder, lock, readonly,
//! create-with, from) overwrite. `reverse_order` toggles a flag, so two calls
//! cancel out.
//!
//! ## Compilation
//!
//! [`Relation::compile`] builds the statement once per snapshot and hands
//! out the memoized result afterwards. Snapshots have no write path, so the
//! memoized statement always matches the clauses it was built from.
//!
//! ```rust,ignore
//! let table = TableMetadata::new("users").with_columns(vec![
//!     ColumnMetadata::new("id", DataType::Integer).with_primary_key(),
//!     ColumnMetadata::new("name", DataType::Text),
//!     ColumnMetadata::new("active", DataType::Boolean),
//!     ColumnMetadata::new("age", DataType::Integer),
//! ]);
//! let users = Relation::new(Arc::new(table));
//! let query = users
//!     .where_([("active", true)])?
//!     .where_(Condition::sql("age > ?", [18]))?
//!     .order(["name"])
//!     .limit(10);
//! let compiled = query.compile()?;
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use clausal_ir::{ColumnRef, Expr, LockClause, OrderTerm, SelectItem, Source, Value};
use tracing::{trace, warn};

use crate::compiler::{self, CompileContext, CompiledQuery};
use crate::condition::Condition;
use crate::config::RelationConfig;
use crate::error::{RelationError, RelationResult};
use crate::extension::Extension;
use crate::join::{classify, Association, AssociationJoin, JoinGraphResolver, JoinSpec, NoAssociations};
use crate::limit::{DefaultLimitSanitizer, LimitSanitizer};
use crate::model::Model;
use crate::predicate::{equality_values, translate};
use crate::seq::{append_unique, overlay, unique};

/// Operation names [`Relation::call`] falls back to
const BASE_OPERATIONS: &[&str] = &[
    "where",
    "having",
    "order",
    "reorder",
    "select",
    "group",
    "limit",
    "offset",
    "reverse_order",
    "readonly",
    "lock",
    "from",
];

/// Every clause a relation accumulates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clauses {
    pub includes: Vec<Association>,
    pub eager_load: Vec<Association>,
    pub preload: Vec<Association>,
    pub select: Vec<SelectItem>,
    pub group: Vec<Expr>,
    pub order: Vec<OrderTerm>,
    /// Replaces `order` entirely when set
    pub reorder: Option<Vec<OrderTerm>>,
    pub joins: Vec<JoinSpec>,
    pub wheres: Vec<Expr>,
    pub havings: Vec<Expr>,
    pub binds: Vec<Value>,
    pub limit: Option<Value>,
    pub offset: Option<Value>,
    pub lock: Option<LockClause>,
    pub readonly: Option<bool>,
    pub create_with: Option<Vec<(String, Value)>>,
    pub from: Option<Source>,
    pub reverse_order: bool,
}

impl Clauses {
    fn reset(&mut self, kind: ClauseKind) {
        match kind {
            ClauseKind::Includes => self.includes.clear(),
            ClauseKind::EagerLoad => self.eager_load.clear(),
            ClauseKind::Preload => self.preload.clear(),
            ClauseKind::Select => self.select.clear(),
            ClauseKind::Group => self.group.clear(),
            ClauseKind::Order => self.order.clear(),
            ClauseKind::Reorder => self.reorder = None,
            ClauseKind::Joins => self.joins.clear(),
            ClauseKind::Where => self.wheres.clear(),
            ClauseKind::Having => self.havings.clear(),
            ClauseKind::Binds => self.binds.clear(),
            ClauseKind::Limit => self.limit = None,
            ClauseKind::Offset => self.offset = None,
            ClauseKind::Lock => self.lock = None,
            ClauseKind::Readonly => self.readonly = None,
            ClauseKind::CreateWith => self.create_with = None,
            ClauseKind::From => self.from = None,
            ClauseKind::ReverseOrder => self.reverse_order = false,
            // Extensions live beside the clauses
            ClauseKind::Extending => {}
        }
    }
}

/// Names a clause for [`Relation::except`] and [`Relation::only`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    Includes,
    EagerLoad,
    Preload,
    Select,
    Group,
    Order,
    Reorder,
    Joins,
    Where,
    Having,
    Binds,
    Limit,
    Offset,
    Lock,
    Readonly,
    CreateWith,
    From,
    ReverseOrder,
    Extending,
}

impl ClauseKind {
    pub const ALL: [ClauseKind; 19] = [
        ClauseKind::Includes,
        ClauseKind::EagerLoad,
        ClauseKind::Preload,
        ClauseKind::Select,
        ClauseKind::Group,
        ClauseKind::Order,
        ClauseKind::Reorder,
        ClauseKind::Joins,
        ClauseKind::Where,
        ClauseKind::Having,
        ClauseKind::Binds,
        ClauseKind::Limit,
        ClauseKind::Offset,
        ClauseKind::Lock,
        ClauseKind::Readonly,
        ClauseKind::CreateWith,
        ClauseKind::From,
        ClauseKind::ReverseOrder,
        ClauseKind::Extending,
    ];
}

/// Lock request accepted by [`Relation::lock`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lock {
    /// Lock with the dialect's default syntax
    Default,
    /// Lock with the given syntax
    Sql(String),
    /// No lock
    None,
}

impl From<bool> for Lock {
    fn from(lock: bool) -> Self {
        if lock { Lock::Default } else { Lock::None }
    }
}

impl From<&str> for Lock {
    fn from(sql: &str) -> Self {
        Lock::from(sql.to_string())
    }
}

impl From<String> for Lock {
    fn from(sql: String) -> Self {
        if sql.trim().is_empty() {
            Lock::Default
        } else {
            Lock::Sql(sql)
        }
    }
}

impl From<Option<&str>> for Lock {
    fn from(sql: Option<&str>) -> Self {
        sql.map_or(Lock::Default, Lock::from)
    }
}

/// Collaborators and settings shared down a chain
#[derive(Clone)]
struct Environment {
    model: Arc<dyn Model>,
    join_graph: Arc<dyn JoinGraphResolver>,
    limits: Option<Arc<dyn LimitSanitizer>>,
    config: RelationConfig,
}

struct Inner {
    clauses: Clauses,
    extensions: Vec<Arc<dyn Extension>>,
    env: Arc<Environment>,
    compiled: OnceLock<Arc<CompiledQuery>>,
}

/// Immutable, chainable query specification
#[derive(Clone)]
pub struct Relation {
    inner: Arc<Inner>,
}

impl fmt::Debug for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Relation")
            .field("model", &self.inner.env.model.table_name())
            .field("clauses", &self.inner.clauses)
            .field("extensions", &self.extension_names())
            .field("compiled", &self.is_compiled())
            .finish()
    }
}

impl Relation {
    /// Base relation over `model`: no clauses, no associations, default
    /// limit sanitizer and configuration
    pub fn new(model: Arc<dyn Model>) -> Self {
        Self::from_parts(
            Clauses::default(),
            Vec::new(),
            Arc::new(Environment {
                model,
                join_graph: Arc::new(NoAssociations),
                limits: None,
                config: RelationConfig::default(),
            }),
        )
    }

    /// Builder method: resolve association joins with `resolver`
    pub fn with_join_graph(self, resolver: Arc<dyn JoinGraphResolver>) -> Self {
        self.with_environment(|env| env.join_graph = resolver)
    }

    /// Builder method: sanitize limits with `sanitizer`
    pub fn with_limit_sanitizer(self, sanitizer: Arc<dyn LimitSanitizer>) -> Self {
        self.with_environment(|env| env.limits = Some(sanitizer))
    }

    /// Builder method: replace the configuration
    pub fn with_config(self, config: RelationConfig) -> Self {
        self.with_environment(|env| env.config = config)
    }

    fn with_environment(self, update: impl FnOnce(&mut Environment)) -> Self {
        let mut env = (*self.inner.env).clone();
        update(&mut env);
        Self::from_parts(
            self.inner.clauses.clone(),
            self.inner.extensions.clone(),
            Arc::new(env),
        )
    }

    fn from_parts(
        clauses: Clauses,
        extensions: Vec<Arc<dyn Extension>>,
        env: Arc<Environment>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                clauses,
                extensions,
                env,
                compiled: OnceLock::new(),
            }),
        }
    }

    /// New snapshot with updated clauses, same extensions and collaborators
    fn spawn(&self, update: impl FnOnce(&mut Clauses)) -> Self {
        let mut clauses = self.inner.clauses.clone();
        update(&mut clauses);
        Self::from_parts(
            clauses,
            self.inner.extensions.clone(),
            Arc::clone(&self.inner.env),
        )
    }

    /// Append to a sequence clause, or return `self` when nothing new remains
    fn append<T, F>(&self, items: Vec<T>, field: F) -> Self
    where
        T: PartialEq + Clone,
        F: Fn(&mut Clauses) -> &mut Vec<T>,
    {
        let mut clauses = self.inner.clauses.clone();
        let target = field(&mut clauses);
        match append_unique(target.as_slice(), items) {
            Some(merged) => {
                *target = merged;
                Self::from_parts(
                    clauses,
                    self.inner.extensions.clone(),
                    Arc::clone(&self.inner.env),
                )
            }
            None => self.clone(),
        }
    }

    // ===== Association hints =====

    pub fn includes<A: Into<Association>>(&self, associations: impl IntoIterator<Item = A>) -> Self {
        self.append(associations_of(associations), |c| &mut c.includes)
    }

    pub fn eager_load<A: Into<Association>>(
        &self,
        associations: impl IntoIterator<Item = A>,
    ) -> Self {
        self.append(associations_of(associations), |c| &mut c.eager_load)
    }

    pub fn preload<A: Into<Association>>(&self, associations: impl IntoIterator<Item = A>) -> Self {
        self.append(associations_of(associations), |c| &mut c.preload)
    }

    // ===== Projection, grouping, ordering =====

    pub fn select<S: Into<SelectItem>>(&self, fields: impl IntoIterator<Item = S>) -> Self {
        let fields = fields
            .into_iter()
            .map(Into::into)
            .filter(|f: &SelectItem| !f.is_blank())
            .collect();
        self.append(fields, |c| &mut c.select)
    }

    pub fn group<E: Into<Expr>>(&self, groups: impl IntoIterator<Item = E>) -> Self {
        let groups = groups
            .into_iter()
            .map(Into::into)
            .filter(|g: &Expr| !g.is_blank())
            .collect();
        self.append(groups, |c| &mut c.group)
    }

    pub fn order<O: Into<OrderTerm>>(&self, orders: impl IntoIterator<Item = O>) -> Self {
        self.append(order_terms(orders), |c| &mut c.order)
    }

    /// Replace every ordering given so far, including later `order` calls
    pub fn reorder<O: Into<OrderTerm>>(&self, orders: impl IntoIterator<Item = O>) -> Self {
        let orders = unique(order_terms(orders));
        if orders.is_empty() {
            return self.clone();
        }
        self.spawn(|c| c.reorder = Some(orders))
    }

    /// Toggle reversal of the effective ordering
    pub fn reverse_order(&self) -> Self {
        self.spawn(|c| c.reverse_order = !c.reverse_order)
    }

    // ===== Joins =====

    /// Add join specs.
    ///
    /// # Errors
    ///
    /// Returns `RelationError::UnsupportedJoinSpec` when a spec matches none
    /// of the recognized join shapes.
    pub fn joins<J: Into<JoinSpec>>(
        &self,
        specs: impl IntoIterator<Item = J>,
    ) -> RelationResult<Self> {
        let specs: Vec<JoinSpec> = specs
            .into_iter()
            .map(Into::into)
            .filter(|s: &JoinSpec| !s.is_blank())
            .collect();
        classify(&specs)?;
        Ok(self.append(specs, |c| &mut c.joins))
    }

    // ===== Conditions =====

    /// Add a where condition.
    ///
    /// # Errors
    ///
    /// Returns `RelationError::ConditionExpansion` when the model rejects an
    /// attribute, or `RelationError::InvalidArguments` for a condition list
    /// that does not start with SQL text.
    pub fn where_(&self, condition: impl Into<Condition>) -> RelationResult<Self> {
        self.where_with(condition, Vec::<Value>::new())
    }

    /// Add a where condition with extra positional binds
    pub fn where_with<V: Into<Value>>(
        &self,
        condition: impl Into<Condition>,
        args: impl IntoIterator<Item = V>,
    ) -> RelationResult<Self> {
        let predicates = self.translate(condition.into(), args)?;
        Ok(self.append(predicates, |c| &mut c.wheres))
    }

    pub fn having(&self, condition: impl Into<Condition>) -> RelationResult<Self> {
        self.having_with(condition, Vec::<Value>::new())
    }

    pub fn having_with<V: Into<Value>>(
        &self,
        condition: impl Into<Condition>,
        args: impl IntoIterator<Item = V>,
    ) -> RelationResult<Self> {
        let predicates = self.translate(condition.into(), args)?;
        Ok(self.append(predicates, |c| &mut c.havings))
    }

    fn translate<V: Into<Value>>(
        &self,
        condition: Condition,
        args: impl IntoIterator<Item = V>,
    ) -> RelationResult<Vec<Expr>> {
        let extra = args.into_iter().map(Into::into).collect();
        translate(self.inner.env.model.as_ref(), condition, extra)
    }

    /// Register positional binds for the renderer
    pub fn bind<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Self {
        self.append(values.into_iter().map(Into::into).collect(), |c| &mut c.binds)
    }

    // ===== Scalars =====

    /// Set the limit; a null value clears it
    pub fn limit(&self, limit: impl Into<Value>) -> Self {
        let limit = Some(limit.into()).filter(|v| *v != Value::Null);
        self.spawn(|c| c.limit = limit)
    }

    /// Set the offset; a null value clears it
    pub fn offset(&self, offset: impl Into<Value>) -> Self {
        let offset = Some(offset.into()).filter(|v| *v != Value::Null);
        self.spawn(|c| c.offset = offset)
    }

    /// Request (or cancel) a row lock
    pub fn lock(&self, lock: impl Into<Lock>) -> Self {
        let lock = match lock.into() {
            Lock::Default => Some(LockClause::Default),
            Lock::Sql(sql) => Some(LockClause::Sql(sql)),
            Lock::None => None,
        };
        self.spawn(|c| c.lock = lock)
    }

    pub fn readonly(&self, readonly: bool) -> Self {
        self.spawn(|c| c.readonly = Some(readonly))
    }

    /// Attribute defaults for records created through this relation
    pub fn create_with<K, V>(&self, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let attributes = attributes
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.spawn(|c| c.create_with = Some(attributes))
    }

    /// Read from `source` instead of the model's table; blank SQL is a no-op
    pub fn from(&self, source: impl Into<Source>) -> Self {
        let source = source.into();
        if matches!(&source, Source::Sql(sql) if sql.trim().is_empty()) {
            return self.clone();
        }
        self.spawn(|c| c.from = Some(source))
    }

    // ===== Extensions =====

    /// Attach an extension to this relation and everything chained from it
    pub fn extending(&self, extension: Arc<dyn Extension>) -> Self {
        if self.extension_names().contains(&extension.name()) {
            return self.clone();
        }
        for op in extension.operations() {
            if BASE_OPERATIONS.contains(op) {
                warn!(
                    "extension '{}' overrides base operation '{}'",
                    extension.name(),
                    op
                );
            }
        }

        let mut extensions = self.inner.extensions.clone();
        extensions.push(extension);
        Self::from_parts(
            self.inner.clauses.clone(),
            extensions,
            Arc::clone(&self.inner.env),
        )
    }

    /// Invoke an operation by name: attached extensions first (latest wins),
    /// then the base operations.
    ///
    /// # Errors
    ///
    /// Returns `RelationError::UnknownOperation` when nothing handles the
    /// name, plus whatever the operation itself returns.
    pub fn call(&self, operation: &str, args: &[Value]) -> RelationResult<Self> {
        if let Some(extension) = self
            .inner
            .extensions
            .iter()
            .rev()
            .find(|e| e.handles(operation))
        {
            trace!("dispatching '{}' to extension '{}'", operation, extension.name());
            return extension.call(self, operation, args);
        }
        self.call_base(operation, args)
    }

    /// True when `operation` can be invoked through [`Relation::call`]
    pub fn responds_to(&self, operation: &str) -> bool {
        BASE_OPERATIONS.contains(&operation)
            || self.inner.extensions.iter().any(|e| e.handles(operation))
    }

    fn call_base(&self, operation: &str, args: &[Value]) -> RelationResult<Self> {
        match operation {
            "where" => self.where_(Condition::Sequence(args.to_vec())),
            "having" => self.having(Condition::Sequence(args.to_vec())),
            "order" => Ok(self.order(text_args(operation, args)?)),
            "reorder" => Ok(self.reorder(text_args(operation, args)?)),
            "select" => Ok(self.select(text_args(operation, args)?)),
            "group" => Ok(self.group(text_args(operation, args)?)),
            "limit" => Ok(self.limit(single_arg(operation, args)?)),
            "offset" => Ok(self.offset(single_arg(operation, args)?)),
            "reverse_order" => Ok(self.reverse_order()),
            "readonly" => match args {
                [] => Ok(self.readonly(true)),
                [Value::Boolean(flag)] => Ok(self.readonly(*flag)),
                _ => Err(invalid(operation, "expected an optional boolean")),
            },
            "lock" => match args {
                [] => Ok(self.lock(Lock::Default)),
                [Value::Boolean(flag)] => Ok(self.lock(*flag)),
                [Value::String(sql)] => Ok(self.lock(sql.as_str())),
                _ => Err(invalid(operation, "expected a boolean or lock text")),
            },
            "from" => match args {
                [Value::String(sql)] => Ok(self.from(sql.as_str())),
                _ => Err(invalid(operation, "expected source text")),
            },
            _ => Err(RelationError::UnknownOperation(operation.to_string())),
        }
    }

    // ===== Spawn operations =====

    /// Copy of this relation with the named clauses reset
    pub fn except(&self, kinds: &[ClauseKind]) -> Self {
        let mut relation = self.spawn(|c| {
            for kind in kinds {
                c.reset(*kind);
            }
        });
        if kinds.contains(&ClauseKind::Extending) {
            relation = Self::from_parts(
                relation.inner.clauses.clone(),
                Vec::new(),
                Arc::clone(&self.inner.env),
            );
        }
        relation
    }

    /// Copy of this relation keeping only the named clauses
    pub fn only(&self, kinds: &[ClauseKind]) -> Self {
        let dropped: Vec<ClauseKind> = ClauseKind::ALL
            .iter()
            .copied()
            .filter(|kind| !kinds.contains(kind))
            .collect();
        self.except(&dropped)
    }

    /// Combine `other` into this relation.
    ///
    /// Sequences are concatenated and deduplicated. Scalars set on `other`
    /// win. Where equalities on the same column keep only the last one.
    /// Collaborators stay those of `self`.
    pub fn merge(&self, other: &Relation) -> Self {
        let theirs = &other.inner.clauses;
        let mut relation = self.spawn(|c| {
            c.includes = unique(c.includes.iter().chain(&theirs.includes).cloned());
            c.eager_load = unique(c.eager_load.iter().chain(&theirs.eager_load).cloned());
            c.preload = unique(c.preload.iter().chain(&theirs.preload).cloned());
            c.select = unique(c.select.iter().chain(&theirs.select).cloned());
            c.group = unique(c.group.iter().chain(&theirs.group).cloned());
            c.order = unique(c.order.iter().chain(&theirs.order).cloned());
            c.joins = unique(c.joins.iter().chain(&theirs.joins).cloned());
            c.havings = unique(c.havings.iter().chain(&theirs.havings).cloned());
            c.binds = unique(c.binds.iter().chain(&theirs.binds).cloned());
            c.wheres = merge_wheres(&c.wheres, &theirs.wheres);

            if theirs.reorder.is_some() {
                c.reorder = theirs.reorder.clone();
            }
            if theirs.limit.is_some() {
                c.limit = theirs.limit.clone();
            }
            if theirs.offset.is_some() {
                c.offset = theirs.offset.clone();
            }
            if theirs.lock.is_some() {
                c.lock = theirs.lock.clone();
            }
            if theirs.readonly.is_some() {
                c.readonly = theirs.readonly;
            }
            if theirs.from.is_some() {
                c.from = theirs.from.clone();
            }
            if let Some(defaults) = &theirs.create_with {
                let mut merged = c.create_with.take().unwrap_or_default();
                overlay(&mut merged, defaults);
                c.create_with = Some(merged);
            }
            // No unset state: false on the argument means not requested
            c.reverse_order = c.reverse_order || theirs.reverse_order;
        });

        for extension in &other.inner.extensions {
            relation = relation.extending(Arc::clone(extension));
        }
        relation
    }

    // ===== Readers =====

    /// Compile into a statement, once per snapshot.
    ///
    /// # Errors
    ///
    /// Join resolution and limit sanitization errors surface here.
    pub fn compile(&self) -> RelationResult<Arc<CompiledQuery>> {
        if let Some(compiled) = self.inner.compiled.get() {
            trace!("reusing compiled statement");
            return Ok(Arc::clone(compiled));
        }

        let env = &self.inner.env;
        let default_limits;
        let limits: &dyn LimitSanitizer = match &env.limits {
            Some(limits) => limits.as_ref(),
            None => {
                default_limits = DefaultLimitSanitizer::new(env.config.max_limit);
                &default_limits
            }
        };
        let ctx = CompileContext {
            model: env.model.as_ref(),
            join_graph: env.join_graph.as_ref(),
            limits,
            config: &env.config,
        };

        let compiled = Arc::new(compiler::compile(&self.inner.clauses, &ctx)?);
        Ok(Arc::clone(self.inner.compiled.get_or_init(|| compiled)))
    }

    /// True once [`Relation::compile`] has succeeded on this snapshot
    pub fn is_compiled(&self) -> bool {
        self.inner.compiled.get().is_some()
    }

    /// True when both handles point at the same snapshot
    pub fn same_instance(&self, other: &Relation) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn clauses(&self) -> &Clauses {
        &self.inner.clauses
    }

    pub fn model(&self) -> &dyn Model {
        self.inner.env.model.as_ref()
    }

    pub fn config(&self) -> &RelationConfig {
        &self.inner.env.config
    }

    /// Names of attached extensions, in attachment order
    pub fn extension_names(&self) -> Vec<&str> {
        self.inner.extensions.iter().map(|e| e.name()).collect()
    }

    /// Association joins the join graph produced for this relation
    pub fn association_joins(&self) -> RelationResult<Vec<AssociationJoin>> {
        Ok(self.compile()?.association_joins.clone())
    }

    /// The explicit readonly flag when set, else the implicit one
    pub fn is_readonly(&self) -> RelationResult<bool> {
        match self.inner.clauses.readonly {
            Some(readonly) => Ok(readonly),
            None => Ok(self.compile()?.implicit_readonly),
        }
    }

    pub fn is_eager_loading(&self) -> bool {
        !self.inner.clauses.eager_load.is_empty()
    }

    /// Equality conditions on the model's table as attribute/value pairs
    pub fn where_values_hash(&self) -> Vec<(String, Value)> {
        equality_values(&self.inner.clauses.wheres, self.model().table_name())
    }

    /// Attributes for records created through this relation: where
    /// equalities overlaid with `create_with` defaults
    pub fn scope_for_create(&self) -> Vec<(String, Value)> {
        let mut attributes = self.where_values_hash();
        if let Some(defaults) = &self.inner.clauses.create_with {
            overlay(&mut attributes, defaults);
        }
        attributes
    }
}

fn associations_of<A: Into<Association>>(associations: impl IntoIterator<Item = A>) -> Vec<Association> {
    associations
        .into_iter()
        .map(Into::into)
        .filter(|a: &Association| !a.root().trim().is_empty())
        .collect()
}

fn order_terms<O: Into<OrderTerm>>(orders: impl IntoIterator<Item = O>) -> Vec<OrderTerm> {
    orders
        .into_iter()
        .map(Into::into)
        .filter(|o: &OrderTerm| !o.is_blank())
        .collect()
}

/// Concatenate where predicates, keeping only the last equality per column
fn merge_wheres(ours: &[Expr], theirs: &[Expr]) -> Vec<Expr> {
    let mut seen: Vec<ColumnRef> = Vec::new();
    let mut kept: Vec<Expr> = ours
        .iter()
        .chain(theirs)
        .rev()
        .filter(|predicate| match predicate {
            Expr::Equality { column, .. } => {
                if seen.contains(column) {
                    false
                } else {
                    seen.push(column.clone());
                    true
                }
            }
            _ => true,
        })
        .cloned()
        .collect();
    kept.reverse();
    unique(kept)
}

fn invalid(operation: &str, reason: &str) -> RelationError {
    RelationError::InvalidArguments {
        operation: operation.to_string(),
        reason: reason.to_string(),
    }
}

fn single_arg(operation: &str, args: &[Value]) -> RelationResult<Value> {
    match args {
        [value] => Ok(value.clone()),
        _ => Err(invalid(operation, "expected exactly one argument")),
    }
}

fn text_args(operation: &str, args: &[Value]) -> RelationResult<Vec<String>> {
    args.iter()
        .map(|arg| match arg {
            Value::String(text) => Ok(text.clone()),
            other => Err(invalid(operation, &format!("expected text, got {other:?}"))),
        })
        .collect()
}
