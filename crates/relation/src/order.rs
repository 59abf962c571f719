// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Order reversal
//!
//! Backs `reverse_order`. Structured orderings reverse themselves; literal
//! ordering text is rewritten term by term:
//!
//! ```text
//! "name DESC"         -> "name ASC"
//! "name"              -> "name DESC"
//! "name asc, id desc" -> "name DESC, id ASC"
//! ```
//!
//! An empty ordering reverses to descending primary key, so reversing an
//! unordered relation still changes what it returns first.

use clausal_ir::{ColumnRef, Expr, OrderTerm, Ordering};

use crate::model::Model;

/// Reverse every ordering term, falling back to the primary key when there
/// is none. Element order and count are preserved.
pub fn reverse_order(orders: &[OrderTerm], model: &dyn Model) -> Vec<OrderTerm> {
    if orders.is_empty() {
        let primary_key = ColumnRef::new(model.primary_key()).with_table(model.table_name());
        let default = Ordering::asc(Expr::Column(primary_key));
        return vec![OrderTerm::Ordering(default.reverse())];
    }

    orders
        .iter()
        .map(|term| match term {
            OrderTerm::Ordering(ordering) => OrderTerm::Ordering(ordering.reverse()),
            OrderTerm::Sql(sql) => OrderTerm::Sql(reverse_sql_order(sql)),
        })
        .collect()
}

/// Flip the direction of every comma-separated term in ordering text
pub fn reverse_sql_order(sql: &str) -> String {
    split_terms(sql)
        .into_iter()
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(reverse_term)
        .collect::<Vec<_>>()
        .join(", ")
}

fn reverse_term(term: &str) -> String {
    if let Some((head, direction)) = term.rsplit_once(char::is_whitespace) {
        if direction.eq_ignore_ascii_case("asc") {
            return format!("{} DESC", head.trim_end());
        }
        if direction.eq_ignore_ascii_case("desc") {
            return format!("{} ASC", head.trim_end());
        }
    }
    format!("{term} DESC")
}

/// Split on top-level commas, leaving commas inside parentheses or quoted
/// text alone. Single quotes, double quotes and backticks all quote; a quote
/// only closes on the character that opened it.
fn split_terms(sql: &str) -> Vec<&str> {
    let mut terms = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, ch) in sql.char_indices() {
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' | '`' => quote = Some(ch),
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                terms.push(&sql[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    terms.push(&sql[start..]);
    terms
}
