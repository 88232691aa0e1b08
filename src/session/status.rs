//! Channel status panel.
//!
//! Modules report connection status for their channels from worker threads;
//! the UI thread drains the updates and mirrors them into a row of status
//! items, one per (module, channel). The panel is the only cross-thread
//! surface of the engine and takes no locks: the UI thread is the sole
//! mutator of rendered state.

use std::sync::mpsc::Receiver;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::render::backend::{ContainerKind, Control, RenderBackend};
use crate::render::registry::{WidgetHandle, WidgetRegistry};
use crate::schema::path::FieldPath;

/// Status change pushed by a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StatusUpdate {
    /// A channel appeared; creates its row.
    Add { module: String, channel: String },
    /// The channel connected.
    Online { module: String, channel: String },
    /// The channel disconnected.
    Offline { module: String, channel: String },
    /// The channel went away; removes its row.
    Remove { module: String, channel: String },
    /// Viewer count changed.
    Viewers {
        module: String,
        channel: String,
        count: u64,
    },
}

struct StatusRow {
    container: WidgetHandle,
    indicator: WidgetHandle,
    viewers: WidgetHandle,
}

/// Rendered per-channel status row collection.
pub struct StatusPanel {
    root: WidgetHandle,
    rows: IndexMap<(String, String), StatusRow>,
}

/// Abbreviates large viewer counts: five or more digits drop the last
/// three and gain a `k` suffix.
pub fn format_viewers(count: u64) -> String {
    let text = count.to_string();
    if text.len() >= 5 {
        format!("{}k", &text[..text.len() - 3])
    } else {
        text
    }
}

impl StatusPanel {
    /// Creates the (empty) panel container.
    pub fn new(backend: &mut dyn RenderBackend, registry: &mut WidgetRegistry) -> Self {
        let root = registry.allocate(&FieldPath::parse("status"), false, false);
        backend.create_container(root, ContainerKind::Row, None);
        Self {
            root,
            rows: IndexMap::new(),
        }
    }

    /// The panel's container handle, for the embedder to place.
    pub fn handle(&self) -> WidgetHandle {
        self.root
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Drains every queued update from a module channel.
    pub fn drain(
        &mut self,
        backend: &mut dyn RenderBackend,
        registry: &mut WidgetRegistry,
        updates: &Receiver<StatusUpdate>,
    ) {
        while let Ok(update) = updates.try_recv() {
            self.apply(backend, registry, update);
        }
    }

    /// Applies one status update.
    pub fn apply(
        &mut self,
        backend: &mut dyn RenderBackend,
        registry: &mut WidgetRegistry,
        update: StatusUpdate,
    ) {
        match update {
            StatusUpdate::Add { module, channel } => {
                let key = (module, channel.to_lowercase());
                if !self.rows.contains_key(&key) {
                    let row = self.create_row(backend, registry, &key.0, &key.1, &channel);
                    self.rows.insert(key, row);
                    backend.relayout();
                }
            }
            StatusUpdate::Online { module, channel } => {
                self.set_indicator(backend, &module, &channel, true);
            }
            StatusUpdate::Offline { module, channel } => {
                self.set_indicator(backend, &module, &channel, false);
            }
            StatusUpdate::Remove { module, channel } => {
                let key = (module, channel.to_lowercase());
                if let Some(row) = self.rows.shift_remove(&key) {
                    let _ = backend.detach(self.root, row.container);
                    backend.destroy(row.viewers);
                    backend.destroy(row.indicator);
                    backend.destroy(row.container);
                    registry.release_under(&row_path(&key.0, &key.1));
                    backend.relayout();
                }
            }
            StatusUpdate::Viewers {
                module,
                channel,
                count,
            } => {
                let key = (module, channel.to_lowercase());
                if let Some(row) = self.rows.get(&key) {
                    backend.set_text(row.viewers, &format_viewers(count));
                    backend.relayout();
                }
            }
        }
    }

    fn set_indicator(
        &mut self,
        backend: &mut dyn RenderBackend,
        module: &str,
        channel: &str,
        on: bool,
    ) {
        let key = (module.to_string(), channel.to_lowercase());
        if let Some(row) = self.rows.get(&key) {
            backend.update_control(row.indicator, &Control::Indicator { on });
        }
    }

    fn create_row(
        &mut self,
        backend: &mut dyn RenderBackend,
        registry: &mut WidgetRegistry,
        module: &str,
        channel_key: &str,
        channel_label: &str,
    ) -> StatusRow {
        let path = row_path(module, channel_key);
        let container = registry.allocate(&path, true, false);
        backend.create_container(container, ContainerKind::Row, None);

        let label = registry.allocate(&path.child("name"), true, false);
        backend.create_control(
            label,
            &Control::StatusText {
                text: format!("{channel_label}: "),
            },
        );
        backend.attach(container, label, None);

        let viewers = registry.allocate(&path.child("viewers"), true, false);
        backend.create_control(
            viewers,
            &Control::StatusText {
                text: "N/A".to_string(),
            },
        );
        backend.attach(container, viewers, None);

        let indicator = registry.allocate(&path.child("state"), true, false);
        backend.create_control(indicator, &Control::Indicator { on: false });
        backend.attach(container, indicator, None);

        backend.attach(self.root, container, None);
        StatusRow {
            container,
            indicator,
            viewers,
        }
    }
}

fn row_path(module: &str, channel: &str) -> FieldPath {
    FieldPath::from_segments(["status", module, channel])
}
