//! Widget-tree rendering: dispatch, builders, identity, backend contract.
//!
//! The renderer turns a configuration subtree plus its metadata into a tree
//! of backend widgets, mirrored by an engine-side [`tree::RenderedNode`]
//! model. Dispatch is driven by an explicit-or-inferred [`ViewKind`]:
//!
//! - [`backend`] - Toolkit contract and input events
//! - [`registry`] - Path/handle identity registry
//! - [`tree`] - Rendered-subtree model and teardown walk
//! - [`build`] - View builders
//! - [`scan`] - Filesystem enumeration for choice universes

/// Toolkit contract and input events.
pub mod backend;

/// View builders.
pub mod build;

/// Path/handle identity registry.
pub mod registry;

/// Filesystem enumeration for choice views.
pub mod scan;

/// Rendered-subtree model.
pub mod tree;

use serde_json::Value;

use crate::schema::meta::{GuiMeta, ViewKind};

pub use backend::{Control, ContainerKind, InputEvent, NavItem, RenderBackend};
pub use build::{RenderCtx, render};
pub use registry::{WidgetHandle, WidgetRegistry};
pub use scan::{EntryScanner, FsScanner};
pub use tree::{ButtonRole, ControlBinding, NodeKind, RenderedNode, destroy_subtree};

/// Config children that are internal annotations, never rendered.
pub const SKIP_KEYS: &[&str] = &["gui_information"];

/// Auxiliary input paths of addable lists; edits to them are scratch state.
pub const SKIP_TEXT_CONTROLS: &[&str] = &[LIST_INPUT, LIST_INPUT2];

/// First auxiliary input of an addable list.
pub const LIST_INPUT: &str = "list_input";
/// Second auxiliary input of a dual addable list.
pub const LIST_INPUT2: &str = "list_input2";
/// Add button of an addable list.
pub const LIST_ADD: &str = "list_add";
/// Remove button of an addable list.
pub const LIST_REMOVE: &str = "list_remove";
/// The list/choose widget itself, below its section path.
pub const LIST_BOX: &str = "list_box";
/// Description text of a choose view, below its section path.
pub const DESCRIPTION_SUFFIX: &str = "descr_explain";

/// Shared page button paths.
pub const OK_BUTTON_KEY: &str = "settings.ok_button";
pub const APPLY_BUTTON_KEY: &str = "settings.apply_button";
pub const CANCEL_BUTTON_KEY: &str = "settings.cancel_button";

/// Extra width reserved past the widest label in a group.
pub const LABEL_PADDING: u32 = 50;

/// Resolves the render strategy for a node.
///
/// An explicit tag in the metadata wins; otherwise the strategy is inferred
/// from the value's runtime kind: booleans render as checkboxes, strings as
/// text inputs, mappings as nested groups, absent values as action buttons.
/// `None` means the node has no renderer and is silently omitted.
pub fn resolve_view(meta: &GuiMeta, value: Option<&Value>) -> Option<ViewKind> {
    if let Some(view) = meta.view {
        return Some(view);
    }
    match value {
        None => Some(ViewKind::Button),
        Some(Value::Bool(_)) => Some(ViewKind::Checkbox),
        Some(Value::String(_)) => Some(ViewKind::Text),
        Some(Value::Object(_)) => Some(ViewKind::Group),
        Some(_) => None,
    }
}
