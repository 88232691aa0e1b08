//! Redraw dependency declarations.
//!
//! At page-build time each module's metadata may declare that some section
//! (the target) must be regenerated whenever one of its sibling fields (the
//! triggers) changes. The map records those declarations; the session runs
//! the actual regeneration.

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::schema::meta::RedrawRule;
use crate::schema::path::FieldPath;

/// One registered dependency: regenerate the subtree at `path` when a
/// trigger field of the owning module changes.
#[derive(Debug, Clone)]
pub struct RedrawEntry {
    /// Path of the target subtree (module path plus target section name).
    pub path: FieldPath,
    pub rule: RedrawRule,
}

/// Per-module redraw declarations, target name to entry.
#[derive(Debug, Default)]
pub struct RedrawMap {
    modules: HashMap<String, IndexMap<String, RedrawEntry>>,
}

impl RedrawMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module's declaration for one target.
    pub fn register(&mut self, module: &str, target: &str, entry: RedrawEntry) {
        self.modules
            .entry(module.to_string())
            .or_default()
            .insert(target.to_string(), entry);
    }

    /// Target names of `module` triggered by an edit to `section`.
    pub fn triggered(&self, module: &str, section: &str) -> Vec<String> {
        let Some(targets) = self.modules.get(module) else {
            return Vec::new();
        };
        targets
            .iter()
            .filter(|(_, entry)| entry.rule.triggers.iter().any(|t| t == section))
            .map(|(target, _)| target.clone())
            .collect()
    }

    pub fn get(&self, module: &str, target: &str) -> Option<&RedrawEntry> {
        self.modules.get(module)?.get(target)
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
