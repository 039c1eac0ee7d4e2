//! Diff algebra for discovery cycles
//!
//! A [`Diff`] is the minimal change between two observations: what appeared
//! and what disappeared. The same type is used for container rosters
//! (diffing ids) and hostname sets, and is the unit the notifier emits.
//!
//! Invariant after [`Diff::reconciled`]: `added` and `removed` are disjoint
//! and duplicate-free. Before reconciliation both may overlap (a hostname
//! moved between containers shows up on both sides within one cycle).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;

/// An added/removed pair accumulated over one discovery cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff<T> {
    /// Items present now but not before
    pub added: Vec<T>,
    /// Items present before but not now
    pub removed: Vec<T>,
}

impl<T> Diff<T> {
    /// Create an empty diff
    pub fn new() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// True if neither side holds any items
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Append another diff's entries to this one
    ///
    /// No deduplication happens here; contradictory entries are repaired
    /// by [`Diff::reconciled`] before emission.
    pub fn merge(&mut self, other: Diff<T>) {
        self.added.extend(other.added);
        self.removed.extend(other.removed);
    }
}

impl<T> Default for Diff<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash> Diff<T> {
    /// Remove self-cancelling entries and collapse duplicates
    ///
    /// A hostname both added and removed within the same cycle (e.g. moved
    /// between two containers) cancels out entirely. Idempotent: once
    /// reconciled, reconciling again is a no-op.
    pub fn reconciled(self) -> Diff<T> {
        let added: HashSet<T> = self.added.into_iter().collect();
        let mut removed: HashSet<T> = self.removed.into_iter().collect();

        let mut cleaned = Diff::new();

        for item in added {
            if removed.remove(&item) {
                continue;
            }
            cleaned.added.push(item);
        }
        cleaned.removed.extend(removed);

        cleaned
    }
}

impl Diff<String> {
    /// Debug-log a per-container diff, skipping empty ones
    pub(crate) fn log(&self, name: &str) {
        if self.is_empty() {
            return;
        }

        tracing::debug!(
            "[{}] (+) {} (-) {}",
            name,
            self.added.join(","),
            self.removed.join(",")
        );
    }
}

/// Set difference between two collections
///
/// Returns `{added: new − old, removed: old − new}`. Input order is
/// irrelevant and duplicates within one collection collapse. Reused for
/// both container-roster diffing and hostname-set diffing.
pub fn diff<T: Eq + Hash + Clone>(old: &[T], new: &[T]) -> Diff<T> {
    let old_set: HashSet<&T> = old.iter().collect();
    let new_set: HashSet<&T> = new.iter().collect();

    Diff {
        added: new_set.difference(&old_set).map(|v| (*v).clone()).collect(),
        removed: old_set.difference(&new_set).map(|v| (*v).clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn as_set(items: &[String]) -> HashSet<&str> {
        items.iter().map(String::as_str).collect()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn diff_symmetry() {
        let old = strings(&["a", "b", "c"]);
        let new = strings(&["b", "c", "d"]);

        let d = diff(&old, &new);

        assert_eq!(as_set(&d.added), HashSet::from(["d"]));
        assert_eq!(as_set(&d.removed), HashSet::from(["a"]));
    }

    #[test]
    fn diff_of_equal_sets_is_empty() {
        let items = strings(&["a", "b"]);
        assert!(diff(&items, &items).is_empty());
    }

    #[test]
    fn diff_collapses_duplicates_within_one_collection() {
        let old = strings(&["a", "a", "b"]);
        let new = strings(&["b", "c", "c"]);

        let d = diff(&old, &new);

        assert_eq!(as_set(&d.added), HashSet::from(["c"]));
        assert_eq!(as_set(&d.removed), HashSet::from(["a"]));
    }

    #[test]
    fn reconcile_cancels_entries_on_both_sides() {
        let raw = Diff {
            added: strings(&["moved.example.com", "new.example.com"]),
            removed: strings(&["moved.example.com", "gone.example.com"]),
        };

        let cleaned = raw.reconciled();

        assert_eq!(as_set(&cleaned.added), HashSet::from(["new.example.com"]));
        assert_eq!(as_set(&cleaned.removed), HashSet::from(["gone.example.com"]));
    }

    #[test]
    fn reconcile_is_idempotent() {
        let raw = Diff {
            added: strings(&["a", "a", "b", "x"]),
            removed: strings(&["x", "c"]),
        };

        let once = raw.reconciled();
        let twice = once.clone().reconciled();

        assert_eq!(as_set(&once.added), as_set(&twice.added));
        assert_eq!(as_set(&once.removed), as_set(&twice.removed));

        let added = as_set(&once.added);
        let removed = as_set(&once.removed);
        assert!(added.is_disjoint(&removed));
    }

    #[test]
    fn reconcile_collapses_duplicates() {
        let raw = Diff {
            added: strings(&["a", "a"]),
            removed: strings(&["b", "b"]),
        };

        let cleaned = raw.reconciled();

        assert_eq!(cleaned.added, strings(&["a"]));
        assert_eq!(cleaned.removed, strings(&["b"]));
    }

    #[test]
    fn merge_appends_both_sides() {
        let mut acc: Diff<String> = Diff::new();
        acc.merge(Diff {
            added: strings(&["a"]),
            removed: strings(&["b"]),
        });
        acc.merge(Diff {
            added: strings(&["c"]),
            removed: vec![],
        });

        assert_eq!(acc.added, strings(&["a", "c"]));
        assert_eq!(acc.removed, strings(&["b"]));
    }
}
