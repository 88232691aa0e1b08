//! Rendering backend contract.
//!
//! The engine never talks to a widget toolkit directly. It emits widget
//! creation and layout operations through [`RenderBackend`] and consumes
//! [`InputEvent`]s the embedder forwards from the toolkit, each carrying the
//! opaque [`WidgetHandle`] of the originating widget.

use crate::render::registry::WidgetHandle;

/// Layout container kinds the engine creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Top-level page surface (scrollable in most toolkits).
    Page,
    /// Titled, framed group of fields.
    Group,
    /// Plain unframed container.
    Row,
}

/// One entry of the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    /// Canonical navigation key delivered back on selection.
    pub key: String,
    /// Display label.
    pub label: String,
    pub children: Vec<NavItem>,
}

/// Leaf widget description.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Checkbox {
        label: String,
        value: bool,
    },
    TextInput {
        label: String,
        value: String,
    },
    /// Multi-line, read-only text.
    StatusText {
        text: String,
    },
    Spinner {
        label: String,
        value: i64,
        min: i64,
        max: i64,
    },
    Slider {
        label: String,
        value: i64,
        min: i64,
        max: i64,
        tick: i64,
    },
    Dropdown {
        label: String,
        choices: Vec<String>,
        selected: usize,
    },
    ListBox {
        label: String,
        items: Vec<String>,
        selected: Option<usize>,
        checked: Vec<usize>,
        multi: bool,
    },
    /// Editable grid with one or two columns.
    Grid {
        columns: usize,
        rows: Vec<Vec<String>>,
    },
    ColourSwatch {
        label: String,
        value: String,
    },
    Button {
        label: String,
        enabled: bool,
    },
    /// Category/module navigation tree.
    NavTree {
        items: Vec<NavItem>,
    },
    /// On/off status light.
    Indicator {
        on: bool,
    },
}

/// Operations the engine requires from a widget toolkit.
///
/// Implementations own all geometry, styling and event delivery; the engine
/// only describes structure and reacts to events.
pub trait RenderBackend {
    /// Creates a leaf widget. Returns the natural width of the widget's
    /// label, used to align label columns within a group.
    fn create_control(&mut self, handle: WidgetHandle, control: &Control) -> u32;

    /// Creates a layout container.
    fn create_container(&mut self, handle: WidgetHandle, kind: ContainerKind, title: Option<&str>);

    /// Attaches `child` to `parent` at `index`, or appends when `None`.
    fn attach(&mut self, parent: WidgetHandle, child: WidgetHandle, index: Option<usize>);

    /// Detaches `child` from `parent`, reporting the layout slot it held.
    fn detach(&mut self, parent: WidgetHandle, child: WidgetHandle) -> Option<usize>;

    /// Replaces a leaf widget's displayed state.
    fn update_control(&mut self, handle: WidgetHandle, control: &Control);

    /// Replaces the text of a text-bearing widget.
    fn set_text(&mut self, handle: WidgetHandle, text: &str);

    fn set_enabled(&mut self, handle: WidgetHandle, enabled: bool);

    fn set_visible(&mut self, handle: WidgetHandle, visible: bool);

    /// Reserves a minimum label-column width on a labeled widget.
    fn set_min_label_width(&mut self, handle: WidgetHandle, width: u32);

    /// Destroys one widget. The engine walks subtrees itself and destroys
    /// children first.
    fn destroy(&mut self, handle: WidgetHandle);

    /// Recomputes layout after structural changes.
    fn relayout(&mut self);
}

/// Input event forwarded by the embedder, with the originating widget's
/// opaque handle alongside.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Toggled(bool),
    TextEdited(String),
    SpinChanged(i64),
    SliderMoved(i64),
    /// Dropdown selection by choice index.
    ChoicePicked(usize),
    /// Single-selection list pick by item index.
    ListPicked(usize),
    /// Checked set of a multi-selection list, by item indexes.
    ChecksChanged(Vec<usize>),
    /// Grid cell focus change.
    CellSelected { row: usize, col: usize },
    /// Colour chosen, as `#RRGGBB` text.
    ColourPicked(String),
    Clicked,
    /// Navigation tree selection, carrying the node's canonical key.
    TreeSelected(String),
}
