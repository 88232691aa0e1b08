//! Engine-side model of a rendered subtree.
//!
//! Every widget the engine creates is mirrored by a [`RenderedNode`] so that
//! event routing, redraws and teardown can work without querying the
//! backend. Teardown is an explicit tree walk over the generic container
//! capability, independent of the concrete toolkit.

use crate::render::backend::{ContainerKind, RenderBackend};
use crate::render::registry::{WidgetHandle, WidgetRegistry};
use crate::schema::path::FieldPath;

/// Shared page button roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonRole {
    /// Module-defined action button.
    Action,
    /// Append the auxiliary inputs to an addable list.
    ListAdd,
    /// Remove the selected rows from an addable list.
    ListRemove,
    /// Save and close.
    Ok,
    /// Save and stay open.
    Apply,
    /// Close without saving.
    Cancel,
}

/// How input events on a control translate into edits.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlBinding {
    Checkbox,
    Text,
    Spin,
    Slider,
    Colour,
    Dropdown {
        /// Choice keys by index.
        keys: Vec<String>,
    },
    Choose {
        /// Item keys by index.
        keys: Vec<String>,
        single: bool,
        /// Selection changes update the sibling description text.
        describe: bool,
    },
    GridBox {
        columns: usize,
        /// Current row model; the backend mirrors this.
        rows: Vec<Vec<String>>,
    },
    Button(ButtonRole),
    /// Static text, no events expected.
    Label,
}

/// What a rendered node is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Container(ContainerKind),
    Control(ControlBinding),
}

/// One widget in a rendered subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNode {
    pub handle: WidgetHandle,
    pub path: FieldPath,
    pub kind: NodeKind,
    pub children: Vec<RenderedNode>,
}

impl RenderedNode {
    /// Creates a leaf node.
    pub fn control(handle: WidgetHandle, path: FieldPath, binding: ControlBinding) -> Self {
        Self {
            handle,
            path,
            kind: NodeKind::Control(binding),
            children: Vec::new(),
        }
    }

    /// Creates a container node.
    pub fn container(
        handle: WidgetHandle,
        path: FieldPath,
        kind: ContainerKind,
        children: Vec<RenderedNode>,
    ) -> Self {
        Self {
            handle,
            path,
            kind: NodeKind::Container(kind),
            children,
        }
    }

    /// Finds a node by handle.
    pub fn find(&self, handle: WidgetHandle) -> Option<&RenderedNode> {
        if self.handle == handle {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(handle))
    }

    /// Finds a node by path.
    pub fn find_path(&self, path: &FieldPath) -> Option<&RenderedNode> {
        if &self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_path(path))
    }

    /// Finds a node by path, mutably.
    pub fn find_path_mut(&mut self, path: &FieldPath) -> Option<&mut RenderedNode> {
        if &self.path == path {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_path_mut(path))
    }
}

/// Destroys a subtree, children first, and releases its registry entries.
///
/// After this returns, no handle of the subtree resolves to a path anymore.
pub fn destroy_subtree(
    node: &RenderedNode,
    backend: &mut dyn RenderBackend,
    registry: &mut WidgetRegistry,
) {
    for child in &node.children {
        destroy_subtree(child, backend, registry);
    }
    backend.destroy(node.handle);
    registry.release(node.handle);
}
