//! Recording backend used by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use formset::render::{ContainerKind, Control, RenderBackend, WidgetHandle};

/// Mirror of one created widget.
#[derive(Debug, Clone)]
pub struct Widget {
    pub control: Option<Control>,
    pub container: Option<ContainerKind>,
    pub title: Option<String>,
    pub children: Vec<u64>,
    pub enabled: bool,
    pub visible: bool,
    pub text: Option<String>,
    pub min_label_width: Option<u32>,
}

impl Default for Widget {
    fn default() -> Self {
        Self {
            control: None,
            container: None,
            title: None,
            children: Vec::new(),
            enabled: true,
            visible: true,
            text: None,
            min_label_width: None,
        }
    }
}

/// In-memory backend that records every operation the engine performs.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub widgets: HashMap<u64, Widget>,
    pub destroyed: Vec<u64>,
    pub relayouts: usize,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn widget(&self, handle: WidgetHandle) -> &Widget {
        self.widgets.get(&handle.raw()).expect("widget not created")
    }

    pub fn control(&self, handle: WidgetHandle) -> &Control {
        self.widget(handle).control.as_ref().expect("not a control")
    }

    pub fn is_alive(&self, handle: WidgetHandle) -> bool {
        self.widgets.contains_key(&handle.raw())
    }

    pub fn children_of(&self, handle: WidgetHandle) -> &[u64] {
        &self.widget(handle).children
    }
}

impl RenderBackend for RecordingBackend {
    fn create_control(&mut self, handle: WidgetHandle, control: &Control) -> u32 {
        let width = match control {
            Control::TextInput { label, .. }
            | Control::Spinner { label, .. }
            | Control::Slider { label, .. }
            | Control::Dropdown { label, .. }
            | Control::ColourSwatch { label, .. } => label.len() as u32,
            _ => 0,
        };
        let enabled = !matches!(control, Control::Button { enabled: false, .. });
        self.widgets.insert(
            handle.raw(),
            Widget {
                control: Some(control.clone()),
                enabled,
                ..Widget::default()
            },
        );
        width
    }

    fn create_container(
        &mut self,
        handle: WidgetHandle,
        kind: ContainerKind,
        title: Option<&str>,
    ) {
        self.widgets.insert(
            handle.raw(),
            Widget {
                container: Some(kind),
                title: title.map(str::to_string),
                ..Widget::default()
            },
        );
    }

    fn attach(&mut self, parent: WidgetHandle, child: WidgetHandle, index: Option<usize>) {
        let parent = self.widgets.get_mut(&parent.raw()).expect("parent not created");
        match index {
            Some(index) => parent.children.insert(index, child.raw()),
            None => parent.children.push(child.raw()),
        }
    }

    fn detach(&mut self, parent: WidgetHandle, child: WidgetHandle) -> Option<usize> {
        let parent = self.widgets.get_mut(&parent.raw())?;
        let position = parent.children.iter().position(|c| *c == child.raw())?;
        parent.children.remove(position);
        Some(position)
    }

    fn update_control(&mut self, handle: WidgetHandle, control: &Control) {
        if let Some(widget) = self.widgets.get_mut(&handle.raw()) {
            widget.control = Some(control.clone());
        }
    }

    fn set_text(&mut self, handle: WidgetHandle, text: &str) {
        if let Some(widget) = self.widgets.get_mut(&handle.raw()) {
            widget.text = Some(text.to_string());
        }
    }

    fn set_enabled(&mut self, handle: WidgetHandle, enabled: bool) {
        if let Some(widget) = self.widgets.get_mut(&handle.raw()) {
            widget.enabled = enabled;
        }
    }

    fn set_visible(&mut self, handle: WidgetHandle, visible: bool) {
        if let Some(widget) = self.widgets.get_mut(&handle.raw()) {
            widget.visible = visible;
        }
    }

    fn set_min_label_width(&mut self, handle: WidgetHandle, width: u32) {
        if let Some(widget) = self.widgets.get_mut(&handle.raw()) {
            widget.min_label_width = Some(width);
        }
    }

    fn destroy(&mut self, handle: WidgetHandle) {
        self.widgets.remove(&handle.raw());
        self.destroyed.push(handle.raw());
    }

    fn relayout(&mut self) {
        self.relayouts += 1;
    }
}
