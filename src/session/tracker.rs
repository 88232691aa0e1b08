//! Pending-edit ledger.
//!
//! The tracker holds every edit that currently differs from the live
//! configuration. The comparison rule is part of each field's declared
//! [`EditKind`], decided when the form is built, not inferred at compare
//! time. The ledger never holds a clean entry: reconciling an edit that
//! matches the baseline removes its entry.

use indexmap::IndexMap;
use serde_json::Value;

use crate::schema::path::FieldPath;
use crate::schema::value;

/// Comparison rule for a field's edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Single field; candidate is coerced to the baseline's type.
    Scalar,
    /// Whole list/mapping replacement; lists compare as element sets.
    Section,
    /// Grid rows; compare as a set of row tuples.
    Grid,
}

/// One recorded pending edit.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEdit {
    pub value: Value,
    pub kind: EditKind,
}

/// Per-path ledger of pending edits.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    changes: IndexMap<FieldPath, PendingEdit>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records or clears the entry for `path` by comparing `candidate`
    /// against `baseline` under the field's rule. Returns whether the edit
    /// is dirty.
    ///
    /// A missing baseline always compares dirty: the candidate introduces a
    /// value the configuration does not have.
    pub fn reconcile(
        &mut self,
        path: &FieldPath,
        candidate: Value,
        kind: EditKind,
        baseline: Option<&Value>,
    ) -> bool {
        let dirty = match baseline {
            None => true,
            Some(baseline) => Self::differs(&candidate, kind, baseline),
        };
        if dirty {
            let value = match (kind, baseline) {
                (EditKind::Scalar, Some(baseline)) => value::coerce_like(&candidate, baseline),
                _ => candidate,
            };
            self.changes.insert(path.clone(), PendingEdit { value, kind });
        } else {
            self.changes.shift_remove(path);
        }
        dirty
    }

    fn differs(candidate: &Value, kind: EditKind, baseline: &Value) -> bool {
        match kind {
            EditKind::Section => match (candidate, baseline) {
                (Value::Array(candidate), Value::Array(baseline)) => {
                    !value::set_eq(candidate, baseline)
                }
                (Value::Array(_), _) => true,
                _ => &value::coerce_like(candidate, baseline) != baseline,
            },
            EditKind::Grid => match (value::grid_pairs(candidate), value::grid_pairs(baseline)) {
                (Some(candidate), Some(baseline)) => candidate != baseline,
                _ => true,
            },
            EditKind::Scalar => match candidate {
                Value::Bool(_) => candidate != baseline,
                _ => &value::coerce_like(candidate, baseline) != baseline,
            },
        }
    }

    pub fn get(&self, path: &FieldPath) -> Option<&PendingEdit> {
        self.changes.get(path)
    }

    /// Removes the entry for one path.
    pub fn clear(&mut self, path: &FieldPath) {
        self.changes.shift_remove(path);
    }

    /// Removes every entry whose canonical path contains `needle`.
    ///
    /// Used when a redraw regenerates a subtree: its previously pending
    /// edits become meaningless.
    pub fn clear_containing(&mut self, needle: &str) {
        self.changes
            .retain(|path, _| !path.to_string().contains(needle));
    }

    /// Removes and returns the entries owned by `module`, in record order.
    pub fn take_module(&mut self, module: &str) -> Vec<(FieldPath, PendingEdit)> {
        let keys: Vec<FieldPath> = self
            .changes
            .keys()
            .filter(|path| path.module() == Some(module))
            .cloned()
            .collect();
        keys.into_iter()
            .filter_map(|key| {
                let edit = self.changes.shift_remove(&key)?;
                Some((key, edit))
            })
            .collect()
    }

    pub fn clear_all(&mut self) {
        self.changes.clear();
    }

    pub fn entries(&self) -> impl Iterator<Item = (&FieldPath, &PendingEdit)> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(key: &str) -> FieldPath {
        FieldPath::parse(key)
    }

    #[test]
    fn reconcile_is_idempotent() {
        let mut tracker = ChangeTracker::new();
        let baseline = json!(true);
        assert!(tracker.reconcile(&path("main.gui.on_top"), json!(false), EditKind::Scalar, Some(&baseline)));
        assert!(tracker.reconcile(&path("main.gui.on_top"), json!(false), EditKind::Scalar, Some(&baseline)));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn reapplying_the_baseline_clears_the_entry() {
        let mut tracker = ChangeTracker::new();
        let baseline = json!("dark");
        tracker.reconcile(&path("main.display.theme"), json!("light"), EditKind::Scalar, Some(&baseline));
        assert!(!tracker.is_empty());
        tracker.reconcile(&path("main.display.theme"), json!("dark"), EditKind::Scalar, Some(&baseline));
        assert!(tracker.is_empty());
    }

    #[test]
    fn scalar_comparison_coerces_text_to_baseline_type() {
        let mut tracker = ChangeTracker::new();
        let baseline = json!(25);
        assert!(!tracker.reconcile(&path("webchat.style.port"), json!("25"), EditKind::Scalar, Some(&baseline)));
        assert!(tracker.reconcile(&path("webchat.style.port"), json!("26"), EditKind::Scalar, Some(&baseline)));
        assert_eq!(tracker.get(&path("webchat.style.port")).unwrap().value, json!(26));
    }

    #[test]
    fn list_sections_compare_as_sets() {
        let mut tracker = ChangeTracker::new();
        let baseline = json!(["a", "b"]);
        assert!(!tracker.reconcile(&path("chat.rooms"), json!(["b", "a"]), EditKind::Section, Some(&baseline)));
        assert!(tracker.is_empty());
        assert!(tracker.reconcile(&path("chat.rooms"), json!(["b", "c"]), EditKind::Section, Some(&baseline)));
    }

    #[test]
    fn grids_compare_as_row_sets_with_duplicates_collapsed() {
        let mut tracker = ChangeTracker::new();
        let baseline = json!({"ban": "spam", "mod": "ops"});
        let permuted = json!({"mod": "ops", "ban": "spam"});
        assert!(!tracker.reconcile(&path("chat.rules"), permuted, EditKind::Grid, Some(&baseline)));
        let changed = json!({"ban": "flood"});
        assert!(tracker.reconcile(&path("chat.rules"), changed, EditKind::Grid, Some(&baseline)));
    }

    #[test]
    fn clear_containing_drops_matching_entries() {
        let mut tracker = ChangeTracker::new();
        tracker.reconcile(&path("grep.filters.symbol"), json!("x"), EditKind::Scalar, Some(&json!("y")));
        tracker.reconcile(&path("grep.output"), json!(["a"]), EditKind::Section, Some(&json!(["b"])));
        tracker.reconcile(&path("main.gui.on_top"), json!(true), EditKind::Scalar, Some(&json!(false)));
        tracker.clear_containing("grep");
        assert_eq!(tracker.len(), 1);
        assert!(tracker.get(&path("main.gui.on_top")).is_some());
    }

    #[test]
    fn take_module_preserves_record_order() {
        let mut tracker = ChangeTracker::new();
        tracker.reconcile(&path("grep.b"), json!("1"), EditKind::Scalar, Some(&json!("0")));
        tracker.reconcile(&path("main.a"), json!("1"), EditKind::Scalar, Some(&json!("0")));
        tracker.reconcile(&path("grep.a"), json!("1"), EditKind::Scalar, Some(&json!("0")));
        let taken = tracker.take_module("grep");
        let keys: Vec<String> = taken.iter().map(|(p, _)| p.to_string()).collect();
        assert_eq!(keys, ["grep.b", "grep.a"]);
        assert_eq!(tracker.len(), 1);
    }
}
