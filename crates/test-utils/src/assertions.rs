// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Statement-shape test helpers and custom assertions

use clausal_ir::{
    ColumnRef, Expr, OrderTerm, SelectItem, SelectStatement, SortDirection, Source, Value,
};

/// Custom assertion helpers for compiled statements
pub struct AstAssertions;

impl AstAssertions {
    /// Assert that an expression is a column reference with the given
    /// qualified name
    pub fn assert_column_ref(expr: &Expr, qualified: &str) {
        match expr {
            Expr::Column(col) => assert_eq!(
                col.qualified(),
                qualified,
                "Expected column '{}', found '{}'",
                qualified,
                col.qualified()
            ),
            _ => panic!("Expected Column expression, found {:?}", expr),
        }
    }

    /// Assert that an expression is an equality on `qualified` with `value`
    pub fn assert_equality(expr: &Expr, qualified: &str, value: &Value) {
        match expr {
            Expr::Equality { column, value: v } => {
                assert_eq!(column.qualified(), qualified, "Equality column mismatch");
                assert_eq!(v, value, "Equality value mismatch");
            }
            _ => panic!("Expected Equality expression, found {:?}", expr),
        }
    }

    /// Assert that the where-section has the merged-equality layout: one
    /// conjunction of `equalities`, then one grouping per other predicate
    pub fn assert_where_layout(statement: &SelectStatement, equalities: usize, groupings: usize) {
        let expected = groupings + usize::from(equalities > 0);
        assert_eq!(
            statement.wheres.len(),
            expected,
            "Expected {} top-level where node(s), found {:?}",
            expected,
            statement.wheres
        );

        let mut nodes = statement.wheres.iter();
        if equalities > 0 {
            match nodes.next() {
                Some(Expr::And(children)) => {
                    assert_eq!(children.len(), equalities, "Conjunction size mismatch");
                    assert!(children.iter().all(Expr::is_equality));
                }
                other => panic!("Expected conjunction of equalities first, found {:?}", other),
            }
        }
        for node in nodes {
            assert!(
                matches!(node, Expr::Grouping(_)),
                "Expected grouping, found {:?}",
                node
            );
        }
    }

    /// Assert that the statement reads from the given table
    pub fn assert_source_table(statement: &SelectStatement, name: &str) {
        match &statement.source {
            Source::Table(table) => assert_eq!(table.name, name, "Source table mismatch"),
            other => panic!("Expected table source, found {:?}", other),
        }
    }

    /// Assert that the projection is the implicit `table.*`
    pub fn assert_default_projection(statement: &SelectStatement, table: &str) {
        assert_eq!(
            statement.projections,
            vec![SelectItem::QualifiedWildcard(table.to_string())],
            "Expected default projection {}.*",
            table
        );
    }

    /// Assert that an ordering term is a literal with the given text
    pub fn assert_order_sql(term: &OrderTerm, sql: &str) {
        match term {
            OrderTerm::Sql(text) => assert_eq!(text, sql, "Order text mismatch"),
            other => panic!("Expected literal ordering, found {:?}", other),
        }
    }

    /// Assert that an ordering term is a structured ordering on the given
    /// column in the given direction
    pub fn assert_ordering(term: &OrderTerm, column: &ColumnRef, direction: SortDirection) {
        match term {
            OrderTerm::Ordering(ordering) => {
                assert_eq!(ordering.expr, Expr::Column(column.clone()), "Ordering column mismatch");
                assert_eq!(ordering.direction, Some(direction), "Ordering direction mismatch");
            }
            other => panic!("Expected structured ordering, found {:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clausal_ir::{Ordering, TableRef};

    #[test]
    fn test_assert_column_ref() {
        let expr = Expr::Column(ColumnRef::new("user_id").with_table("posts"));
        AstAssertions::assert_column_ref(&expr, "posts.user_id");
    }

    #[test]
    #[should_panic(expected = "Expected Column expression")]
    fn test_assert_column_ref_wrong_kind() {
        AstAssertions::assert_column_ref(&Expr::sql("x"), "x");
    }

    #[test]
    fn test_assert_where_layout() {
        let mut statement = SelectStatement::new(Source::Table(TableRef::new("users")));
        statement.wheres = vec![
            Expr::And(vec![Expr::equality(ColumnRef::new("a"), 1)]),
            Expr::grouping(Expr::sql("b > 1")),
        ];
        AstAssertions::assert_where_layout(&statement, 1, 1);
        AstAssertions::assert_source_table(&statement, "users");
    }

    #[test]
    fn test_assert_ordering() {
        let column = ColumnRef::new("id").with_table("users");
        let term = OrderTerm::Ordering(Ordering::desc(Expr::Column(column.clone())));
        AstAssertions::assert_ordering(&term, &column, SortDirection::Desc);
    }
}
