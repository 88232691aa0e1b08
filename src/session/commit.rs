//! Commit pipeline.
//!
//! Consumes the pending-edit ledger on save: edits are grouped by owning
//! module in load order, classified against the module's `non_dynamic`
//! patterns, written into the live configuration tree, and each touched
//! module's apply hook is invoked once.
//!
//! Recovery policy: best effort, continue on error. A failure writing one
//! edit or running one module's hook is recorded in the outcome and does
//! not stop the remaining modules; the ledger is fully cleared either way.
//! There is no multi-module atomicity.

use log::{debug, warn};

use crate::render::LIST_BOX;
use crate::schema::category::ModuleSet;
use crate::schema::value;
use crate::session::tracker::ChangeTracker;

/// Field that doubles as the live editor's show-hidden toggle.
pub const SHOW_HIDDEN_KEY: &str = "main.gui.show_hidden";

/// Result of one save pass.
#[derive(Debug, Default)]
pub struct SaveOutcome {
    /// Some applied edit matched a `non_dynamic` pattern.
    pub requires_restart: bool,
    /// Write or hook failures, per module, in processing order.
    pub errors: Vec<(String, anyhow::Error)>,
}

fn matches_non_dynamic(patterns: &[String], section: &str, field: Option<&str>) -> bool {
    patterns.iter().any(|pattern| {
        if pattern == &format!("{section}.*") {
            return true;
        }
        match field {
            Some(field) => pattern == &format!("{section}.{field}"),
            None => false,
        }
    })
}

/// Applies every pending edit and clears the ledger.
///
/// `show_hidden` is the live editor flag, updated immediately when the
/// matching field is among the applied edits.
pub fn save(
    tracker: &mut ChangeTracker,
    modules: &mut ModuleSet,
    show_hidden: &mut bool,
) -> SaveOutcome {
    let mut outcome = SaveOutcome::default();
    let names: Vec<String> = modules.names().cloned().collect();

    for name in names {
        let entries = tracker.take_module(&name);
        if entries.is_empty() {
            continue;
        }
        let Some(module) = modules.get_mut(&name) else {
            continue;
        };

        for (path, edit) in &entries {
            let mut segments: Vec<String> = path.segments()[1..].to_vec();
            if segments.last().map(String::as_str) == Some(LIST_BOX) {
                segments.pop();
            }
            let Some(section) = segments.first() else {
                warn!("pending edit with no section: {path}");
                continue;
            };
            let field = segments.get(1).map(String::as_str);
            if matches_non_dynamic(&module.gui.non_dynamic, section, field) {
                debug!("non-dynamic edit at {path}");
                outcome.requires_restart = true;
            }
            if path.to_string() == SHOW_HIDDEN_KEY {
                *show_hidden = edit.value.as_bool().unwrap_or(*show_hidden);
            }
            if let Err(err) = value::set_at(&mut module.config, &segments, edit.value.clone()) {
                warn!("failed to apply {path}: {err:#}");
                outcome.errors.push((name.clone(), err));
            }
        }

        if let Some(apply) = &module.apply
            && let Err(err) = apply(&module.config)
        {
            warn!("apply hook of `{name}` failed: {err:#}");
            outcome.errors.push((name.clone(), err));
        }
    }

    tracker.clear_all();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::category::LoadedModule;
    use crate::schema::meta::GuiMeta;
    use crate::schema::path::FieldPath;
    use crate::session::tracker::EditKind;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn module(config: serde_json::Value, non_dynamic: &[&str]) -> LoadedModule {
        LoadedModule::new(
            config,
            GuiMeta {
                non_dynamic: non_dynamic.iter().map(|s| s.to_string()).collect(),
                ..GuiMeta::default()
            },
        )
    }

    #[test]
    fn section_wildcard_flags_every_leaf() {
        assert!(matches_non_dynamic(&["grep.*".to_string()], "grep", Some("symbol")));
        assert!(matches_non_dynamic(&["grep.*".to_string()], "grep", Some("file")));
        assert!(!matches_non_dynamic(&["grep.*".to_string()], "prof", Some("dwarf")));
        assert!(matches_non_dynamic(&["net.host".to_string()], "net", Some("host")));
        assert!(!matches_non_dynamic(&["net.host".to_string()], "net", Some("port")));
    }

    #[test]
    fn save_writes_edits_and_reports_restart() {
        let mut modules = ModuleSet::new();
        modules.insert(
            "grep",
            module(json!({"grep": {"symbol": "a", "file": "log"}}), &["grep.*"]),
        );
        let mut tracker = ChangeTracker::new();
        tracker.reconcile(
            &FieldPath::parse("grep.grep.symbol"),
            json!("b"),
            EditKind::Scalar,
            Some(&json!("a")),
        );

        let mut show_hidden = false;
        let outcome = save(&mut tracker, &mut modules, &mut show_hidden);
        assert!(outcome.requires_restart);
        assert!(outcome.errors.is_empty());
        assert!(tracker.is_empty());
        assert_eq!(
            modules.get("grep").unwrap().config["grep"]["symbol"],
            json!("b")
        );
    }

    #[test]
    fn failing_hook_does_not_block_other_modules() {
        let mut modules = ModuleSet::new();
        modules.insert(
            "first",
            module(json!({"a": {"x": 1}}), &[]).with_apply(Arc::new(
                |_config: &serde_json::Value| -> anyhow::Result<()> { anyhow::bail!("boom") },
            )),
        );
        let applied = Arc::new(AtomicUsize::new(0));
        let counter = applied.clone();
        modules.insert(
            "second",
            module(json!({"b": {"y": 1}}), &[]).with_apply(Arc::new(
                move |_config: &serde_json::Value| -> anyhow::Result<()> {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                },
            )),
        );

        let mut tracker = ChangeTracker::new();
        tracker.reconcile(&FieldPath::parse("first.a.x"), json!(2), EditKind::Scalar, Some(&json!(1)));
        tracker.reconcile(&FieldPath::parse("second.b.y"), json!(2), EditKind::Scalar, Some(&json!(1)));

        let mut show_hidden = false;
        let outcome = save(&mut tracker, &mut modules, &mut show_hidden);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].0, "first");
        assert_eq!(applied.load(Ordering::SeqCst), 1);
        assert_eq!(modules.get("second").unwrap().config["b"]["y"], json!(2));
    }

    #[test]
    fn show_hidden_edit_updates_the_live_flag() {
        let mut modules = ModuleSet::new();
        modules.insert("main", module(json!({"gui": {"show_hidden": false}}), &[]));
        let mut tracker = ChangeTracker::new();
        tracker.reconcile(
            &FieldPath::parse("main.gui.show_hidden"),
            json!(true),
            EditKind::Scalar,
            Some(&json!(false)),
        );
        let mut show_hidden = false;
        save(&mut tracker, &mut modules, &mut show_hidden);
        assert!(show_hidden);
    }

    #[test]
    fn hook_runs_only_for_modules_with_changes() {
        let hook_calls = Arc::new(AtomicUsize::new(0));
        let counter = hook_calls.clone();
        let mut modules = ModuleSet::new();
        modules.insert(
            "quiet",
            module(json!({"a": {"x": 1}}), &[]).with_apply(Arc::new(
                move |_config: &serde_json::Value| -> anyhow::Result<()> {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                },
            )),
        );
        let mut tracker = ChangeTracker::new();
        let mut show_hidden = false;
        save(&mut tracker, &mut modules, &mut show_hidden);
        assert_eq!(hook_calls.load(Ordering::SeqCst), 0);
    }
}
