// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Order-preserving value deduplication for clause sequences and
//! attribute lists.
//!
//! Clause elements are compared with `PartialEq` only (floats in bound
//! values rule out hashing), so these are linear scans.

/// Keep the first occurrence of every value
pub(crate) fn unique<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// `existing` followed by the new items, deduplicated.
///
/// Returns `None` when no new value survives deduplication.
pub(crate) fn append_unique<T: PartialEq + Clone>(
    existing: &[T],
    items: impl IntoIterator<Item = T>,
) -> Option<Vec<T>> {
    let mut out = existing.to_vec();
    let before = out.len();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    (out.len() > before).then_some(out)
}

/// Overlay key/value pairs: matching keys take the new value in place, new
/// keys are appended
pub(crate) fn overlay<K: PartialEq + Clone, V: Clone>(target: &mut Vec<(K, V)>, updates: &[(K, V)]) {
    for (key, value) in updates {
        match target.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value.clone(),
            None => target.push((key.clone(), value.clone())),
        }
    }
}
