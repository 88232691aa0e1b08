//! Rendering and behavior metadata attached to configuration paths.
//!
//! A [`GuiMeta`] tree runs parallel to a module's configuration tree and
//! drives how each value renders and behaves: the explicit view tag, choice
//! universes, numeric bounds, hidden children, restart classification, and
//! redraw dependencies between sibling fields.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Render strategy tag for a configuration node.
///
/// Explicit tags come from metadata; the remaining variants are inferred
/// from the value's runtime kind during dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Boolean toggle.
    Checkbox,
    /// Single-line text input.
    Text,
    /// Bounded integer spinner.
    Spin,
    /// Bounded slider.
    Slider,
    /// Single choice among fixed items.
    Dropdown,
    /// Colour swatch with picker.
    ColourPicker,
    /// Push button placeholder for an action entry.
    Button,
    /// Titled group of child fields.
    Group,
    /// Single-column editable list.
    List,
    /// Two-column editable list.
    ListDual,
    /// Selection list, one item selectable.
    ChooseSingle,
    /// Selection list, many items checkable.
    ChooseMultiple,
}

/// What a filesystem scan should enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanKind {
    /// Sub-directories of the scanned directory.
    Directories,
    /// Plain files of the scanned directory.
    Files,
}

/// Declaration of a filesystem-backed choice universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSpec {
    /// Directory to enumerate, relative to the scanner root.
    pub dir: PathBuf,
    /// Entry kind to keep.
    pub kind: ScanKind,
    /// Keep file extensions in entry names.
    #[serde(default)]
    pub keep_extension: bool,
}

/// Callback producing a fresh configuration subtree for a redraw target.
pub type ConfigProvider = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Callback producing fresh metadata for a redraw target.
pub type GuiProvider = Arc<dyn Fn(&Value) -> GuiMeta + Send + Sync>;

/// Label lookup callback, keyed by canonical path strings.
pub type Translator = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Hook invoked after a module's pending edits have been written.
pub type ApplyHook = Arc<dyn Fn(&Value) -> anyhow::Result<()> + Send + Sync>;

/// Translator that returns the lookup key unchanged.
pub fn identity_translator() -> Translator {
    Arc::new(|key: &str| key.to_string())
}

/// Redraw dependency: regenerate a target subtree when a trigger changes.
#[derive(Clone)]
pub struct RedrawRule {
    /// Sibling field names whose edits trigger the redraw.
    pub triggers: Vec<String>,
    /// Produces the target's new configuration from the trigger value.
    pub get_config: ConfigProvider,
    /// Produces the target's new metadata from the trigger value.
    pub get_gui: GuiProvider,
}

impl fmt::Debug for RedrawRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedrawRule")
            .field("triggers", &self.triggers)
            .finish_non_exhaustive()
    }
}

/// Metadata attached to one configuration path.
///
/// All fields are optional; an empty `GuiMeta` renders a value entirely
/// from its inferred view.
#[derive(Debug, Clone, Default)]
pub struct GuiMeta {
    /// Category this module belongs to (module-level metadata only).
    pub category: Option<String>,
    /// Explicit render strategy; inferred from the value kind when absent.
    pub view: Option<ViewKind>,
    /// Ordered choice universe for dropdown and choose views.
    pub choices: Vec<String>,
    /// Lower bound for numeric views.
    pub min: Option<i64>,
    /// Upper bound for numeric views.
    pub max: Option<i64>,
    /// List views accept new entries through auxiliary inputs.
    pub addable: bool,
    /// Child names suppressed unless the global show-hidden flag is set.
    pub hidden: Vec<String>,
    /// Selection changes show an explanatory text for the selected item.
    pub description: bool,
    /// Path-suffix patterns marking edits that require a restart.
    ///
    /// `section.*` flags every leaf of a section, `section.field` a single
    /// field.
    pub non_dynamic: Vec<String>,
    /// Filesystem-backed choice universe for choose views.
    pub scan: Option<ScanSpec>,
    /// Redraw declarations, target child name to rule.
    pub redraw: IndexMap<String, RedrawRule>,
    /// Metadata of child nodes, in rendering order.
    pub children: IndexMap<String, GuiMeta>,
}

impl GuiMeta {
    /// Metadata of a child node, if declared.
    pub fn child(&self, name: &str) -> Option<&GuiMeta> {
        self.children.get(name)
    }

    /// Owned metadata of a child node, defaulting to empty.
    pub fn child_or_default(&self, name: &str) -> GuiMeta {
        self.child(name).cloned().unwrap_or_default()
    }
}
