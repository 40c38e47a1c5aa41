//! Set reconciliation for nested child collections.
//!
//! A client submits the full desired state of a collection (e.g. an employee's
//! details in one language). [`reconcile`] compares it with the persisted
//! state and splits it into the rows to update, create and delete:
//!
//! - an item with id `0` in the desired collection is a creation request;
//! - an item with a non-zero id is an update of the row with that id;
//! - a persisted item whose id is absent from the desired collection is removed.
//!
//! Existence of updated ids is not checked here; the repository reports an
//! unknown id as not found when the update is applied.

use std::collections::HashSet;

/// Minimal capability required to take part in reconciliation.
pub trait Identified {
    /// Persistent identifier; `0` means "not persisted yet".
    fn id(&self) -> i64;
}

/// Result of [`reconcile`]. Each output keeps the traversal order of its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation<T> {
    pub updated: Vec<T>,
    pub created: Vec<T>,
    pub removed: Vec<T>,
}

/// Diff `old` (persisted) against `new` (desired) in O(|old| + |new|).
///
/// `new` must not contain the same non-zero id twice.
pub fn reconcile<T: Identified>(old: Vec<T>, new: Vec<T>) -> Reconciliation<T> {
    let mut kept = HashSet::with_capacity(new.len());
    let mut updated = Vec::new();
    let mut created = Vec::new();

    for item in new {
        match item.id() {
            0 => created.push(item),
            id => {
                kept.insert(id);
                updated.push(item);
            }
        }
    }

    let removed = old
        .into_iter()
        .filter(|item| !kept.contains(&item.id()))
        .collect();

    Reconciliation {
        updated,
        created,
        removed,
    }
}
