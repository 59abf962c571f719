// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Statement compilation
//!
//! Assembles one [`SelectStatement`] from a relation's clauses. The sequence
//! is fixed; both SQL semantics and test expectations depend on it:
//!
//! 1. Default source: the model's table
//! 2. Joins, when any join spec exists (see [`crate::join`])
//! 3. Where predicates: every equality merged into a single conjunction,
//!    attached first, then each remaining predicate in its own grouping
//! 4. Having predicates, flat
//! 5. Limit (sanitized) and offset
//! 6. Group-by
//! 7. Ordering: reorder replaces order; reversed when the reverse flag is set
//! 8. Projection: explicit select list (clears implicit read-only), else
//!    `table.*`
//! 9. From override, replacing the default source
//! 10. Lock
//!
//! Every sequence is deduplicated and stripped of blank elements on the way
//! in, so a statement never carries empty fragments.

use clausal_ir::{Expr, SelectItem, SelectStatement, Source, Value};
use serde::Serialize;
use tracing::{debug, trace};

use crate::config::RelationConfig;
use crate::error::RelationResult;
use crate::join::{resolve_joins, AssociationJoin, JoinGraphResolver};
use crate::limit::LimitSanitizer;
use crate::model::Model;
use crate::order::reverse_order;
use crate::relation::Clauses;
use crate::seq::unique;

/// A compiled relation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    /// Statement AST handed to the renderer
    pub statement: SelectStatement,

    /// Positional binds registered with `bind`
    pub binds: Vec<Value>,

    /// Joins the join graph produced, reusable as pre-resolved joins
    pub association_joins: Vec<AssociationJoin>,

    /// Association joins are present and no explicit projection was given
    pub implicit_readonly: bool,
}

/// Collaborators a compilation runs against
pub(crate) struct CompileContext<'a> {
    pub model: &'a dyn Model,
    pub join_graph: &'a dyn JoinGraphResolver,
    pub limits: &'a dyn LimitSanitizer,
    pub config: &'a RelationConfig,
}

/// Compile clauses into a statement
pub(crate) fn compile(clauses: &Clauses, ctx: &CompileContext<'_>) -> RelationResult<CompiledQuery> {
    let table = ctx.model.table_name();
    debug!("compiling relation on {}", table);

    let mut statement = SelectStatement::new(Source::table(table));
    let mut implicit_readonly = false;
    let mut association_joins = Vec::new();

    if !clauses.joins.is_empty() {
        let resolution = resolve_joins(ctx.model, ctx.join_graph, &clauses.joins)?;
        resolution.attach(&mut statement);
        implicit_readonly = ctx.config.implicit_readonly && resolution.implicit_readonly;
        association_joins = resolution.associations;
    }

    statement.wheres = build_wheres(&clauses.wheres);
    statement.havings = unique(clauses.havings.iter().filter(|h| !h.is_blank()).cloned());

    if let Some(limit) = &clauses.limit {
        statement.limit = Some(ctx.limits.sanitize_limit(limit)?);
    }
    statement.offset = clauses.offset.clone();

    statement.groups = unique(clauses.group.iter().filter(|g| !g.is_blank()).cloned());

    let orders = clauses.reorder.as_ref().unwrap_or(&clauses.order);
    let orders = if clauses.reverse_order {
        reverse_order(orders, ctx.model)
    } else {
        orders.clone()
    };
    statement.orders = unique(orders.into_iter().filter(|o| !o.is_blank()));

    let projections = unique(clauses.select.iter().filter(|s| !s.is_blank()).cloned());
    if projections.is_empty() {
        statement.projections = vec![SelectItem::QualifiedWildcard(table.to_string())];
    } else {
        statement.projections = projections;
        implicit_readonly = false;
    }

    if let Some(from) = &clauses.from {
        statement.source = from.clone();
    }

    statement.lock = clauses.lock.clone();

    debug!(
        joins = statement.joins.len(),
        wheres = statement.wheres.len(),
        orders = statement.orders.len(),
        implicit_readonly,
        "compiled relation on {}",
        table
    );
    if ctx.config.log_compiled_ast {
        debug!(?statement, "compiled statement");
    }

    Ok(CompiledQuery {
        statement,
        binds: clauses.binds.clone(),
        association_joins,
        implicit_readonly,
    })
}

/// Equalities merged into one conjunction, then every other predicate
/// grouped on its own, in original relative order
fn build_wheres(predicates: &[Expr]) -> Vec<Expr> {
    let predicates = unique(predicates.iter().filter(|p| !p.is_blank()).cloned());
    let (equalities, others): (Vec<Expr>, Vec<Expr>) =
        predicates.into_iter().partition(Expr::is_equality);

    trace!(
        equalities = equalities.len(),
        others = others.len(),
        "partitioned where predicates"
    );

    let mut wheres = Vec::with_capacity(others.len() + 1);
    if !equalities.is_empty() {
        wheres.push(Expr::And(equalities));
    }
    wheres.extend(others.into_iter().map(Expr::grouping));
    wheres
}
