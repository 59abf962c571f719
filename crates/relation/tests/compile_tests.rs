// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Statement compilation tests
//!
//! Exercises the compiled statement layout: where-section merging, join
//! ordering, implicit read-only, ordering reversal, limit/offset and lock.

use std::sync::Arc;

use clausal_ir::{
    BinaryOp, ColumnRef, Expr, Join, LockClause, OrderTerm, Ordering, SelectItem, SortDirection,
    Source, TableRef, Value,
};
use clausal_relation::{
    Association, AssociationJoin, JoinSpec, Relation, RelationConfig, RelationError,
};
use clausal_test_utils::{AstAssertions, MockJoinGraphResolverBuilder, SchemaFixtures};

fn users() -> Relation {
    Relation::new(SchemaFixtures::users()).with_join_graph(Arc::new(
        MockJoinGraphResolverBuilder::new()
            .with_standard_associations()
            .build(),
    ))
}

fn posts_join() -> Join {
    Join::inner(
        TableRef::new("posts"),
        Expr::BinaryOp {
            left: Box::new(Expr::Column(ColumnRef::new("user_id").with_table("posts"))),
            op: BinaryOp::Eq,
            right: Box::new(Expr::Column(ColumnRef::new("id").with_table("users"))),
        },
    )
}

#[test]
fn test_bare_relation() {
    let compiled = users().compile().unwrap();
    let statement = &compiled.statement;

    AstAssertions::assert_source_table(statement, "users");
    AstAssertions::assert_default_projection(statement, "users");
    assert!(statement.joins.is_empty());
    assert!(statement.wheres.is_empty());
    assert!(statement.orders.is_empty());
    assert_eq!(statement.limit, None);
    assert_eq!(statement.lock, None);
    assert!(!compiled.implicit_readonly);
}

// ===== Where section =====

#[test]
fn test_equalities_merge_into_one_conjunction() {
    let relation = users()
        .where_([("active", true)])
        .unwrap()
        .where_("age > 2")
        .unwrap()
        .where_([("role", "admin")])
        .unwrap();
    let statement = &relation.compile().unwrap().statement;

    AstAssertions::assert_where_layout(statement, 2, 1);
    match &statement.wheres[0] {
        Expr::And(children) => {
            AstAssertions::assert_equality(&children[0], "users.active", &Value::Boolean(true));
            AstAssertions::assert_equality(&children[1], "users.role", &Value::from("admin"));
        }
        other => panic!("expected conjunction, found {other:?}"),
    }
    assert_eq!(
        statement.wheres[1],
        Expr::grouping(Expr::fragment("age > 2", Vec::new()))
    );
}

#[test]
fn test_equality_merge_ignores_relative_order() {
    let first = users()
        .where_([("active", true)])
        .unwrap()
        .where_([("role", "admin")])
        .unwrap()
        .where_("age > 2")
        .unwrap();
    let second = users()
        .where_("age > 2")
        .unwrap()
        .where_([("role", "admin")])
        .unwrap()
        .where_([("active", true)])
        .unwrap();

    AstAssertions::assert_where_layout(&first.compile().unwrap().statement, 2, 1);
    AstAssertions::assert_where_layout(&second.compile().unwrap().statement, 2, 1);
}

#[test]
fn test_havings_are_flat() {
    let relation = users()
        .group(["role"])
        .having("COUNT(*) > 1")
        .unwrap()
        .having("COUNT(*) > 1")
        .unwrap();
    let statement = &relation.compile().unwrap().statement;

    assert_eq!(statement.groups, vec![Expr::sql("role")]);
    assert_eq!(
        statement.havings,
        vec![Expr::fragment("COUNT(*) > 1", Vec::new())]
    );
}

// ===== Joins =====

#[test]
fn test_join_order_nodes_then_text_then_associations() {
    let node = Join::left(TableRef::new("teams"), Expr::sql("teams.id = users.team_id"));
    let text = "INNER JOIN roles ON roles.id = users.role_id";

    let relation = users()
        .joins([
            JoinSpec::from(Association::name("posts")),
            JoinSpec::from(text),
            JoinSpec::from(node.clone()),
        ])
        .unwrap();
    let statement = &relation.compile().unwrap().statement;

    assert_eq!(
        statement.joins,
        vec![node, Join::Sql(text.to_string()), posts_join()]
    );
}

#[test]
fn test_association_join_sets_implicit_readonly() {
    let relation = users().joins([Association::name("posts")]).unwrap();
    assert!(relation.compile().unwrap().implicit_readonly);
    assert!(relation.is_readonly().unwrap());

    let projected = relation.select(["users.*"]);
    assert!(!projected.compile().unwrap().implicit_readonly);
    assert!(!projected.is_readonly().unwrap());
}

#[test]
fn test_explicit_readonly_wins() {
    let relation = users()
        .joins([Association::name("posts")])
        .unwrap()
        .readonly(false);
    assert!(!relation.is_readonly().unwrap());
    assert!(users().readonly(true).is_readonly().unwrap());
}

#[test]
fn test_text_join_is_not_readonly() {
    let relation = users()
        .joins(["INNER JOIN posts ON posts.user_id = users.id"])
        .unwrap();
    assert!(!relation.compile().unwrap().implicit_readonly);
}

#[test]
fn test_implicit_readonly_can_be_disabled() {
    let config = RelationConfig {
        implicit_readonly: false,
        ..Default::default()
    };
    let relation = users()
        .with_config(config)
        .joins([Association::name("posts")])
        .unwrap();
    assert!(!relation.compile().unwrap().implicit_readonly);
}

#[test]
fn test_association_joins_are_reusable() {
    let source = users().joins([Association::path("posts.comments")]).unwrap();
    let resolved = source.association_joins().unwrap();
    assert_eq!(resolved.len(), 2);

    let grafted = users()
        .joins(resolved.iter().cloned().map(JoinSpec::from))
        .unwrap();
    let compiled = grafted.compile().unwrap();
    assert_eq!(compiled.association_joins, resolved);
    assert!(compiled.implicit_readonly);
}

#[test]
fn test_grafted_and_resolved_joins_deduplicate() {
    let resolved = AssociationJoin::new(vec!["posts".to_string()], posts_join());
    let relation = users()
        .joins([JoinSpec::from(Association::name("posts")), JoinSpec::from(resolved)])
        .unwrap();
    assert_eq!(relation.compile().unwrap().statement.joins, vec![posts_join()]);
}

#[test]
fn test_unknown_association_fails_at_compile() {
    let relation = users().joins([Association::name("likes")]).unwrap();
    assert_eq!(
        relation.compile().unwrap_err(),
        RelationError::AssociationNotFound {
            model: "users".to_string(),
            association: "likes".to_string(),
        }
    );
}

#[test]
fn test_mixed_join_list_fails_at_chain() {
    let mixed = JoinSpec::List(vec![
        JoinSpec::from("INNER JOIN posts ON true"),
        JoinSpec::from(Association::name("comments")),
    ]);
    assert!(matches!(
        users().joins([mixed]),
        Err(RelationError::UnsupportedJoinSpec(_))
    ));
}

// ===== Ordering =====

#[test]
fn test_reverse_without_order_uses_primary_key() {
    let statement = &users().reverse_order().compile().unwrap().statement;
    assert_eq!(statement.orders.len(), 1);
    AstAssertions::assert_ordering(
        &statement.orders[0],
        &ColumnRef::new("id").with_table("users"),
        SortDirection::Desc,
    );

    let comments = Relation::new(SchemaFixtures::comments()).reverse_order();
    AstAssertions::assert_ordering(
        &comments.compile().unwrap().statement.orders[0],
        &ColumnRef::new("uuid").with_table("comments"),
        SortDirection::Desc,
    );
}

#[test]
fn test_reverse_explicit_directions() {
    let desc = users().order(["name DESC"]).reverse_order();
    AstAssertions::assert_order_sql(&desc.compile().unwrap().statement.orders[0], "name ASC");

    let plain = users().order(["name"]).reverse_order();
    AstAssertions::assert_order_sql(&plain.compile().unwrap().statement.orders[0], "name DESC");
}

#[test]
fn test_double_reverse_is_identity() {
    let base = users()
        .order(["name DESC, id"])
        .order([Ordering::asc(Expr::sql("created_at"))]);
    let twice = base.reverse_order().reverse_order();
    assert_eq!(
        twice.compile().unwrap().statement,
        base.compile().unwrap().statement
    );
}

#[test]
fn test_reverse_structured_ordering() {
    let relation = users()
        .order([Ordering::asc(Expr::sql("created_at"))])
        .reverse_order();
    assert_eq!(
        relation.compile().unwrap().statement.orders,
        vec![OrderTerm::from(Ordering::desc(Expr::sql("created_at")))]
    );
}

// ===== Limit, offset, lock, from =====

#[test]
fn test_limit_and_offset() {
    let statement = &users().limit(10).offset(5).compile().unwrap().statement;
    assert_eq!(statement.limit, Some(Value::Integer(10)));
    assert_eq!(statement.offset, Some(Value::Integer(5)));
}

#[test]
fn test_limit_is_sanitized() {
    let statement = &users().limit("15").compile().unwrap().statement;
    assert_eq!(statement.limit, Some(Value::Integer(15)));

    assert!(matches!(
        users().limit("ten").compile(),
        Err(RelationError::InvalidLimit(_))
    ));
}

#[test]
fn test_max_limit_from_config() {
    let config = RelationConfig {
        max_limit: Some(100),
        ..Default::default()
    };
    let relation = users().with_config(config);
    assert!(relation.limit(100).compile().is_ok());
    assert!(matches!(
        relation.limit(101).compile(),
        Err(RelationError::InvalidLimit(_))
    ));
}

#[test]
fn test_lock_and_from() {
    let statement = &users()
        .lock(true)
        .from("archived_users")
        .compile()
        .unwrap()
        .statement;
    assert_eq!(statement.lock, Some(LockClause::Default));
    assert_eq!(statement.source, Source::Sql("archived_users".to_string()));
    AstAssertions::assert_default_projection(statement, "users");
}

#[test]
fn test_explicit_projection() {
    let statement = &users().select(["id", "name"]).compile().unwrap().statement;
    assert_eq!(
        statement.projections,
        vec![SelectItem::from("id"), SelectItem::from("name")]
    );
}

#[test]
fn test_binds_are_carried() {
    let compiled = users().bind([1, 2, 1]).compile().unwrap();
    assert_eq!(compiled.binds, vec![Value::Integer(1), Value::Integer(2)]);
}

// ===== Memoization =====

#[test]
fn test_compile_is_memoized_per_snapshot() {
    let relation = users().where_([("name", "bob")]).unwrap();
    assert!(!relation.is_compiled());

    let first = relation.compile().unwrap();
    let second = relation.compile().unwrap();
    assert!(relation.is_compiled());
    assert!(Arc::ptr_eq(&first, &second));

    let chained = relation.limit(1);
    assert!(!chained.is_compiled());
    assert_eq!(chained.compile().unwrap().statement.limit, Some(Value::Integer(1)));
    assert_eq!(relation.compile().unwrap().statement.limit, None);
}

#[test]
fn test_compiled_query_serializes() {
    let compiled = users().where_([("name", "bob")]).unwrap().compile().unwrap();
    let json = serde_json::to_value(&*compiled).unwrap();
    assert!(json.get("statement").is_some());
    assert_eq!(json["implicit_readonly"], serde_json::Value::Bool(false));
}
