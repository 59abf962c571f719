// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Chaining contract tests
//!
//! Covers deduplication, no-op identity, scalar overwrite, spawn operations
//! (except, only, merge) and the attribute readers.

use clausal_ir::{ColumnRef, Expr, LockClause, OrderTerm, SelectItem, Source, Value};
use clausal_relation::{Association, ClauseKind, Condition, JoinSpec, Lock, Relation, RelationConfig};
use clausal_test_utils::SchemaFixtures;

fn users() -> Relation {
    Relation::new(SchemaFixtures::users())
}

fn name_eq(value: &str) -> Expr {
    Expr::equality(ColumnRef::new("name").with_table("users"), value)
}

// ===== Sequence clauses =====

#[test]
fn test_sequence_chaining_deduplicates_in_first_occurrence_order() {
    let relation = users().order(["a"]).order(["b"]).order(["a"]);
    let expected = users().order(["a"]).order(["b"]);

    assert_eq!(relation.clauses(), expected.clauses());
    assert_eq!(
        relation.clauses().order,
        vec![OrderTerm::from("a"), OrderTerm::from("b")]
    );
}

#[test]
fn test_duplicate_only_chain_returns_receiver() {
    let relation = users().select(["id", "name"]);
    assert!(relation.select(["name"]).same_instance(&relation));
    assert!(relation.group(Vec::<&str>::new()).same_instance(&relation));
    assert!(relation.bind(Vec::<Value>::new()).same_instance(&relation));
}

#[test]
fn test_select_keeps_order_and_drops_blanks() {
    let relation = users().select(["name", "", "email", "name"]);
    assert_eq!(
        relation.clauses().select,
        vec![SelectItem::from("name"), SelectItem::from("email")]
    );
}

#[test]
fn test_where_deduplicates_predicates() {
    let relation = users()
        .where_([("name", "bob")])
        .unwrap()
        .where_("age > 18")
        .unwrap()
        .where_([("name", "bob")])
        .unwrap();

    assert_eq!(
        relation.clauses().wheres,
        vec![name_eq("bob"), Expr::fragment("age > 18", Vec::new())]
    );
}

#[test]
fn test_where_with_collects_binds() {
    let relation = users().where_with("age > ? AND age < ?", [18, 65]).unwrap();
    assert_eq!(
        relation.clauses().wheres,
        vec![Expr::fragment("age > ? AND age < ?", vec![18.into(), 65.into()])]
    );
}

#[test]
fn test_association_hints() {
    let relation = users()
        .includes(["posts", "posts"])
        .eager_load(["comments"])
        .preload(["posts.comments"]);

    assert_eq!(relation.clauses().includes, vec![Association::name("posts")]);
    assert!(relation.is_eager_loading());
    assert!(!users().includes(["posts"]).is_eager_loading());
    assert_eq!(
        relation.clauses().preload,
        vec![Association::nested("posts", vec![Association::name("comments")])]
    );
}

// ===== No-op laws =====

#[test]
fn test_blank_inputs_are_no_ops() {
    let base = users().order(["name"]);

    let noops = [
        base.where_(None::<&str>).unwrap(),
        base.where_(Vec::<(&str, i64)>::new()).unwrap(),
        base.where_("   ").unwrap(),
        base.having(Condition::Blank).unwrap(),
        base.joins(Vec::<JoinSpec>::new()).unwrap(),
        base.joins([""]).unwrap(),
        base.order(Vec::<&str>::new()),
        base.includes(Vec::<&str>::new()),
        base.from(""),
        base.from("   "),
    ];

    let compiled = base.compile().unwrap();
    for relation in &noops {
        assert!(relation.same_instance(&base));
        assert_eq!(relation.compile().unwrap(), compiled);
    }
}

#[test]
fn test_blank_from_keeps_model_table() {
    let relation = users().from("  ");
    assert_eq!(relation.clauses().from, None);
    assert_eq!(relation.compile().unwrap().statement.source, Source::table("users"));
}

// ===== Scalars =====

#[test]
fn test_scalars_overwrite() {
    let relation = users().limit(10).limit(20).offset(5).offset(Value::Null);
    assert_eq!(relation.clauses().limit, Some(Value::Integer(20)));
    assert_eq!(relation.clauses().offset, None);
}

#[test]
fn test_reorder_replaces_order() {
    let relation = users().order(["name"]).reorder(["id DESC"]).order(["email"]);
    let statement = &relation.compile().unwrap().statement;
    assert_eq!(statement.orders, vec![OrderTerm::from("id DESC")]);
}

#[test]
fn test_lock_forms() {
    assert_eq!(users().lock(true).clauses().lock, Some(LockClause::Default));
    assert_eq!(
        users().lock("LOCK IN SHARE MODE").clauses().lock,
        Some(LockClause::Sql("LOCK IN SHARE MODE".to_string()))
    );
    assert_eq!(users().lock(true).lock(Lock::None).clauses().lock, None);
}

#[test]
fn test_from_override() {
    let relation = users().from("(SELECT * FROM users WHERE active) users");
    assert_eq!(
        relation.clauses().from,
        Some(Source::Sql("(SELECT * FROM users WHERE active) users".to_string()))
    );
}

#[test]
fn test_receiver_is_never_modified() {
    let base = users();
    let _ = base.limit(1).order(["x"]).readonly(true).reverse_order();
    assert_eq!(base.clauses(), &Default::default());
}

// ===== Spawn operations =====

#[test]
fn test_except_resets_named_clauses() {
    let relation = users()
        .where_([("name", "bob")])
        .unwrap()
        .order(["name"])
        .limit(10);

    let stripped = relation.except(&[ClauseKind::Order, ClauseKind::Limit]);
    assert!(stripped.clauses().order.is_empty());
    assert_eq!(stripped.clauses().limit, None);
    assert_eq!(stripped.clauses().wheres, relation.clauses().wheres);
}

#[test]
fn test_only_keeps_named_clauses() {
    let relation = users()
        .where_([("name", "bob")])
        .unwrap()
        .order(["name"])
        .limit(10);

    let kept = relation.only(&[ClauseKind::Where]);
    assert_eq!(kept.clauses().wheres, relation.clauses().wheres);
    assert!(kept.clauses().order.is_empty());
    assert_eq!(kept.clauses().limit, None);
}

#[test]
fn test_merge_combines_clauses() {
    let left = users().where_([("name", "alice")]).unwrap().order(["name"]).limit(5);
    let right = users()
        .where_([("name", "bob")])
        .unwrap()
        .where_("age > 18")
        .unwrap()
        .order(["id"])
        .limit(50);

    let merged = left.merge(&right);
    assert_eq!(
        merged.clauses().wheres,
        vec![name_eq("bob"), Expr::fragment("age > 18", Vec::new())]
    );
    assert_eq!(
        merged.clauses().order,
        vec![OrderTerm::from("name"), OrderTerm::from("id")]
    );
    assert_eq!(merged.clauses().limit, Some(Value::Integer(50)));
}

#[test]
fn test_merge_keeps_unset_scalars() {
    let merged = users().limit(5).offset(2).merge(&users().order(["id"]));
    assert_eq!(merged.clauses().limit, Some(Value::Integer(5)));
    assert_eq!(merged.clauses().offset, Some(Value::Integer(2)));
}

#[test]
fn test_merge_keeps_either_reverse_request() {
    let reversed = users().order(["name"]).reverse_order();

    assert!(users().merge(&reversed).clauses().reverse_order);
    assert!(reversed.merge(&users()).clauses().reverse_order);
    assert!(!users().merge(&users().order(["id"])).clauses().reverse_order);
}

// ===== Readers =====

#[test]
fn test_where_values_hash() {
    let relation = users()
        .where_([("name", "bob"), ("role", "admin")])
        .unwrap()
        .where_([("posts.title", "x")])
        .unwrap()
        .where_("age > 18")
        .unwrap();

    assert_eq!(
        relation.where_values_hash(),
        vec![
            ("name".to_string(), Value::from("bob")),
            ("role".to_string(), Value::from("admin")),
        ]
    );
}

#[test]
fn test_where_values_hash_keeps_last_value_per_column() {
    let relation = users()
        .where_([("name", "a")])
        .unwrap()
        .where_([("role", "admin")])
        .unwrap()
        .where_([("name", "b")])
        .unwrap();

    assert_eq!(
        relation.where_values_hash(),
        vec![
            ("name".to_string(), Value::from("b")),
            ("role".to_string(), Value::from("admin")),
        ]
    );
    assert_eq!(
        relation.scope_for_create(),
        vec![
            ("name".to_string(), Value::from("b")),
            ("role".to_string(), Value::from("admin")),
        ]
    );
}

#[test]
fn test_scope_for_create_overlays_defaults() {
    let relation = users()
        .where_([("name", "bob")])
        .unwrap()
        .create_with([("role", "member"), ("name", "robert")]);

    assert_eq!(
        relation.scope_for_create(),
        vec![
            ("name".to_string(), Value::from("robert")),
            ("role".to_string(), Value::from("member")),
        ]
    );
}

#[test]
fn test_aggregate_condition_expands_to_columns() {
    let relation = users()
        .where_([("address", Value::record([("city", "Paris"), ("street", "Rue 1")]))])
        .unwrap();

    assert_eq!(
        relation.where_values_hash(),
        vec![
            ("address_street".to_string(), Value::from("Rue 1")),
            ("address_city".to_string(), Value::from("Paris")),
        ]
    );
}

#[test]
fn test_nested_table_condition() {
    let relation = users()
        .where_([("posts", Value::record([("title", "Hello")]))])
        .unwrap();
    assert_eq!(
        relation.clauses().wheres,
        vec![Expr::equality(ColumnRef::new("title").with_table("posts"), "Hello")]
    );
}

#[test]
fn test_config_is_inherited_down_the_chain() {
    let config = RelationConfig {
        max_limit: Some(100),
        ..Default::default()
    };
    let relation = Relation::new(SchemaFixtures::users()).with_config(config.clone());
    assert_eq!(relation.order(["name"]).limit(5).config(), &config);
}

#[test]
fn test_model_accessor() {
    let relation = Relation::new(SchemaFixtures::comments());
    assert_eq!(relation.model().table_name(), "comments");
    assert_eq!(relation.model().primary_key(), "uuid");
}
