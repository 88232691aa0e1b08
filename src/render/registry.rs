//! Widget identity registry.
//!
//! The rendering backend delivers input events carrying only an opaque
//! per-widget handle. The registry is the sole bridge from that handle back
//! to the semantic settings path: it is owned by the editing session and
//! passed explicitly into every builder and handler that needs resolution.

use std::collections::HashMap;

use crate::schema::path::FieldPath;

/// Opaque widget identity handed to the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetHandle(u64);

impl WidgetHandle {
    /// Raw numeric form, for backend bookkeeping.
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Bidirectional map between settings paths and widget handles.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    next: u64,
    paths: HashMap<WidgetHandle, FieldPath>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a handle for `path`.
    ///
    /// Unless `allow_multiple`, any pre-existing handle recorded for the
    /// same path is evicted first, so a path maps to at most one handle.
    /// With `persist` false the handle stays anonymous: it is never
    /// resolvable and is used for structural widgets nothing looks up later.
    pub fn allocate(&mut self, path: &FieldPath, persist: bool, allow_multiple: bool) -> WidgetHandle {
        if !allow_multiple && let Some(old) = self.find(path) {
            self.paths.remove(&old);
        }
        self.next += 1;
        let handle = WidgetHandle(self.next);
        if persist {
            self.paths.insert(handle, path.clone());
        }
        handle
    }

    /// Path recorded for a handle.
    pub fn resolve(&self, handle: WidgetHandle) -> Option<&FieldPath> {
        self.paths.get(&handle)
    }

    /// Any handle recorded for `path`. Linear scan over the registry.
    pub fn find(&self, path: &FieldPath) -> Option<WidgetHandle> {
        self.paths
            .iter()
            .find(|(_, p)| *p == path)
            .map(|(handle, _)| *handle)
    }

    /// All handles whose path starts with `prefix`.
    pub fn handles_under(&self, prefix: &FieldPath) -> Vec<WidgetHandle> {
        let mut handles: Vec<WidgetHandle> = self
            .paths
            .iter()
            .filter(|(_, path)| path.starts_with(prefix))
            .map(|(handle, _)| *handle)
            .collect();
        handles.sort();
        handles
    }

    /// Drops the mapping for one handle.
    pub fn release(&mut self, handle: WidgetHandle) -> Option<FieldPath> {
        self.paths.remove(&handle)
    }

    /// Drops every mapping whose path starts with `prefix`.
    pub fn release_under(&mut self, prefix: &FieldPath) -> usize {
        let before = self.paths.len();
        self.paths.retain(|_, path| !path.starts_with(prefix));
        before - self.paths.len()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
