//! View builders.
//!
//! Each builder is a function `(ctx, path, value, meta)` returning the
//! engine-side model of the widgets it created through the backend. The
//! group builder recurses through the dispatch, so a whole module page is
//! built by walking its configuration tree once.

use anyhow::Context;
use log::debug;
use serde_json::Value;

use crate::render::backend::{ContainerKind, Control, RenderBackend};
use crate::render::registry::{WidgetHandle, WidgetRegistry};
use crate::render::scan::EntryScanner;
use crate::render::tree::{ButtonRole, ControlBinding, RenderedNode};
use crate::render::{
    APPLY_BUTTON_KEY, CANCEL_BUTTON_KEY, DESCRIPTION_SUFFIX, LABEL_PADDING, LIST_ADD, LIST_BOX,
    LIST_INPUT, LIST_INPUT2, LIST_REMOVE, OK_BUTTON_KEY, SKIP_KEYS, resolve_view,
};
use crate::schema::meta::{GuiMeta, Translator, ViewKind};
use crate::schema::path::FieldPath;
use crate::schema::value;

/// Mutable state a builder needs: identity, backend, lookups.
pub struct RenderCtx<'a> {
    pub registry: &'a mut WidgetRegistry,
    pub backend: &'a mut dyn RenderBackend,
    pub translate: &'a Translator,
    pub scanner: &'a dyn EntryScanner,
    pub show_hidden: bool,
}

impl RenderCtx<'_> {
    fn label(&self, path: &FieldPath) -> String {
        (self.translate)(&path.to_string())
    }
}

/// A built subtree plus the natural label width of its root control, used
/// by the group builder to align label columns.
struct Built {
    node: RenderedNode,
    label_width: Option<u32>,
}

impl Built {
    fn plain(node: RenderedNode) -> Self {
        Self {
            node,
            label_width: None,
        }
    }
}

/// Renders one node, dispatching on its resolved view.
///
/// Returns `Ok(None)` when no view applies: the field is silently omitted,
/// by policy. Everything else that goes wrong (missing bounds, unknown
/// choice values, failed directory scans) is an error.
pub fn render(
    ctx: &mut RenderCtx<'_>,
    path: &FieldPath,
    value: Option<&Value>,
    meta: &GuiMeta,
) -> anyhow::Result<Option<RenderedNode>> {
    let Some(view) = resolve_view(meta, value) else {
        debug!("no view for {path}, field omitted");
        return Ok(None);
    };
    Ok(build_view(ctx, view, path, value, meta)?.map(|built| built.node))
}

fn build_view(
    ctx: &mut RenderCtx<'_>,
    view: ViewKind,
    path: &FieldPath,
    value: Option<&Value>,
    meta: &GuiMeta,
) -> anyhow::Result<Option<Built>> {
    let built = match view {
        ViewKind::Checkbox => build_checkbox(ctx, path, value),
        ViewKind::Text => build_text(ctx, path, value),
        ViewKind::Spin => build_spin(ctx, path, value, meta)?,
        ViewKind::Slider => build_slider(ctx, path, value, meta)?,
        ViewKind::Dropdown => build_dropdown(ctx, path, value, meta)?,
        ViewKind::ColourPicker => build_colour(ctx, path, value),
        ViewKind::Button => build_button(ctx, path, ButtonRole::Action, true, false),
        ViewKind::Group => build_group(ctx, path, value, meta)?,
        ViewKind::List => build_list(ctx, path, value, meta, false)?,
        ViewKind::ListDual => build_list(ctx, path, value, meta, true)?,
        ViewKind::ChooseSingle => build_choose(ctx, path, value, meta, true)?,
        ViewKind::ChooseMultiple => build_choose(ctx, path, value, meta, false)?,
    };
    Ok(Some(built))
}

fn build_checkbox(ctx: &mut RenderCtx<'_>, path: &FieldPath, value: Option<&Value>) -> Built {
    let checked = value.and_then(Value::as_bool).unwrap_or(false);
    let handle = ctx.registry.allocate(path, true, false);
    ctx.backend.create_control(
        handle,
        &Control::Checkbox {
            label: ctx.label(path),
            value: checked,
        },
    );
    Built::plain(RenderedNode::control(
        handle,
        path.clone(),
        ControlBinding::Checkbox,
    ))
}

fn build_text(ctx: &mut RenderCtx<'_>, path: &FieldPath, value: Option<&Value>) -> Built {
    let handle = ctx.registry.allocate(path, true, false);
    let width = ctx.backend.create_control(
        handle,
        &Control::TextInput {
            label: ctx.label(path),
            value: value.map(value::as_cell).unwrap_or_default(),
        },
    );
    Built {
        node: RenderedNode::control(handle, path.clone(), ControlBinding::Text),
        label_width: Some(width),
    }
}

fn int_value(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn bounds(path: &FieldPath, meta: &GuiMeta) -> anyhow::Result<(i64, i64)> {
    let min = meta
        .min
        .with_context(|| format!("numeric view at {path} requires a min bound"))?;
    let max = meta
        .max
        .with_context(|| format!("numeric view at {path} requires a max bound"))?;
    Ok((min, max))
}

fn build_spin(
    ctx: &mut RenderCtx<'_>,
    path: &FieldPath,
    value: Option<&Value>,
    meta: &GuiMeta,
) -> anyhow::Result<Built> {
    let (min, max) = bounds(path, meta)?;
    let current =
        int_value(value).with_context(|| format!("spin view at {path} requires an integer"))?;
    let handle = ctx.registry.allocate(path, true, false);
    let width = ctx.backend.create_control(
        handle,
        &Control::Spinner {
            label: ctx.label(path),
            value: current,
            min,
            max,
        },
    );
    Ok(Built {
        node: RenderedNode::control(handle, path.clone(), ControlBinding::Spin),
        label_width: Some(width),
    })
}

fn build_slider(
    ctx: &mut RenderCtx<'_>,
    path: &FieldPath,
    value: Option<&Value>,
    meta: &GuiMeta,
) -> anyhow::Result<Built> {
    let (min, max) = bounds(path, meta)?;
    let current =
        int_value(value).with_context(|| format!("slider view at {path} requires an integer"))?;
    let handle = ctx.registry.allocate(path, true, false);
    let width = ctx.backend.create_control(
        handle,
        &Control::Slider {
            label: ctx.label(path),
            value: current,
            min,
            max,
            tick: ((max - min) / 5).max(1),
        },
    );
    Ok(Built {
        node: RenderedNode::control(handle, path.clone(), ControlBinding::Slider),
        label_width: Some(width),
    })
}

fn build_dropdown(
    ctx: &mut RenderCtx<'_>,
    path: &FieldPath,
    value: Option<&Value>,
    meta: &GuiMeta,
) -> anyhow::Result<Built> {
    let current = value.map(value::as_cell).unwrap_or_default();
    let selected = meta
        .choices
        .iter()
        .position(|choice| choice == &current)
        .with_context(|| format!("value `{current}` is not among the choices at {path}"))?;
    let handle = ctx.registry.allocate(path, true, false);
    let width = ctx.backend.create_control(
        handle,
        &Control::Dropdown {
            label: ctx.label(path),
            choices: meta.choices.clone(),
            selected,
        },
    );
    Ok(Built {
        node: RenderedNode::control(
            handle,
            path.clone(),
            ControlBinding::Dropdown {
                keys: meta.choices.clone(),
            },
        ),
        label_width: Some(width),
    })
}

fn build_colour(ctx: &mut RenderCtx<'_>, path: &FieldPath, value: Option<&Value>) -> Built {
    let handle = ctx.registry.allocate(path, true, false);
    let width = ctx.backend.create_control(
        handle,
        &Control::ColourSwatch {
            label: ctx.label(path),
            value: value.map(value::as_cell).unwrap_or_default(),
        },
    );
    Built {
        node: RenderedNode::control(handle, path.clone(), ControlBinding::Colour),
        label_width: Some(width),
    }
}

fn build_button(
    ctx: &mut RenderCtx<'_>,
    path: &FieldPath,
    role: ButtonRole,
    enabled: bool,
    multiple: bool,
) -> Built {
    let handle = ctx.registry.allocate(path, true, multiple);
    ctx.backend.create_control(
        handle,
        &Control::Button {
            label: ctx.label(path),
            enabled,
        },
    );
    Built::plain(RenderedNode::control(
        handle,
        path.clone(),
        ControlBinding::Button(role),
    ))
}

fn build_label(ctx: &mut RenderCtx<'_>, path: FieldPath, text: String) -> RenderedNode {
    let handle = ctx.registry.allocate(&path, false, false);
    ctx.backend
        .create_control(handle, &Control::StatusText { text });
    RenderedNode::control(handle, path, ControlBinding::Label)
}

/// Builds a titled group of child fields.
///
/// Children render in configuration order; reserved and hidden names are
/// filtered, unsupported kinds are omitted. A group left with no visible
/// items renders as an empty frameless container.
fn build_group(
    ctx: &mut RenderCtx<'_>,
    path: &FieldPath,
    value: Option<&Value>,
    meta: &GuiMeta,
) -> anyhow::Result<Built> {
    let map = value
        .and_then(Value::as_object)
        .with_context(|| format!("group view at {path} requires a mapping value"))?;

    let mut children: Vec<RenderedNode> = Vec::new();
    let mut labeled: Vec<(WidgetHandle, u32)> = Vec::new();
    for (name, child_value) in map {
        if SKIP_KEYS.contains(&name.as_str()) {
            continue;
        }
        if !ctx.show_hidden && meta.hidden.iter().any(|hidden| hidden == name) {
            continue;
        }
        let child_meta = meta.child_or_default(name);
        let child_path = path.child(name.clone());
        let Some(view) = resolve_view(&child_meta, Some(child_value)) else {
            debug!("no view for {child_path}, field omitted");
            continue;
        };
        let Some(built) = build_view(ctx, view, &child_path, Some(child_value), &child_meta)?
        else {
            continue;
        };
        if let Some(width) = built.label_width {
            labeled.push((built.node.handle, width));
        }
        children.push(built.node);
    }

    if children.is_empty() {
        let handle = ctx.registry.allocate(path, false, false);
        ctx.backend
            .create_container(handle, ContainerKind::Row, None);
        return Ok(Built::plain(RenderedNode::container(
            handle,
            path.clone(),
            ContainerKind::Row,
            Vec::new(),
        )));
    }

    if let Some(max) = labeled.iter().map(|(_, width)| *width).max() {
        for (handle, _) in &labeled {
            ctx.backend.set_min_label_width(*handle, max + LABEL_PADDING);
        }
    }

    let handle = ctx.registry.allocate(path, false, false);
    let title = ctx.label(path);
    ctx.backend
        .create_container(handle, ContainerKind::Group, Some(&title));
    for child in &children {
        ctx.backend.attach(handle, child.handle, None);
    }
    Ok(Built::plain(RenderedNode::container(
        handle,
        path.clone(),
        ContainerKind::Group,
        children,
    )))
}

/// Builds a single- or two-column editable list with optional add/remove
/// controls.
fn build_list(
    ctx: &mut RenderCtx<'_>,
    path: &FieldPath,
    value: Option<&Value>,
    meta: &GuiMeta,
    dual: bool,
) -> anyhow::Result<Built> {
    let rows: Vec<Vec<String>> = if dual {
        let map = value
            .and_then(Value::as_object)
            .with_context(|| format!("dual list view at {path} requires a mapping value"))?;
        map.iter()
            .map(|(key, item)| vec![key.clone(), value::as_cell(item)])
            .collect()
    } else {
        let items = value
            .and_then(Value::as_array)
            .with_context(|| format!("list view at {path} requires a list value"))?;
        items.iter().map(|item| vec![value::as_cell(item)]).collect()
    };
    let columns = if dual { 2 } else { 1 };

    let mut children = Vec::new();
    let caption = format!("{}:", ctx.label(path));
    children.push(build_label(ctx, path.child("label"), caption));

    if meta.addable {
        let mut aux = Vec::new();
        for input_name in [LIST_INPUT, LIST_INPUT2] {
            if input_name == LIST_INPUT2 && !dual {
                continue;
            }
            let input_path = path.child(input_name);
            let handle = ctx.registry.allocate(&input_path, true, false);
            ctx.backend.create_control(
                handle,
                &Control::TextInput {
                    label: String::new(),
                    value: String::new(),
                },
            );
            aux.push(RenderedNode::control(handle, input_path, ControlBinding::Text));
        }
        aux.push(build_button(ctx, &path.child(LIST_ADD), ButtonRole::ListAdd, true, false).node);
        aux.push(
            build_button(ctx, &path.child(LIST_REMOVE), ButtonRole::ListRemove, true, false).node,
        );

        let aux_path = path.child("addable");
        let aux_handle = ctx.registry.allocate(&aux_path, false, false);
        ctx.backend
            .create_container(aux_handle, ContainerKind::Row, None);
        for item in &aux {
            ctx.backend.attach(aux_handle, item.handle, None);
        }
        children.push(RenderedNode::container(
            aux_handle,
            aux_path,
            ContainerKind::Row,
            aux,
        ));
    }

    let box_path = path.child(LIST_BOX);
    let box_handle = ctx.registry.allocate(&box_path, true, false);
    ctx.backend.create_control(
        box_handle,
        &Control::Grid {
            columns,
            rows: rows.clone(),
        },
    );
    children.push(RenderedNode::control(
        box_handle,
        box_path,
        ControlBinding::GridBox { columns, rows },
    ));

    let handle = ctx.registry.allocate(path, false, false);
    ctx.backend
        .create_container(handle, ContainerKind::Row, None);
    for child in &children {
        ctx.backend.attach(handle, child.handle, None);
    }
    Ok(Built::plain(RenderedNode::container(
        handle,
        path.clone(),
        ContainerKind::Row,
        children,
    )))
}

/// Builds a selection list whose universe comes from the metadata choices
/// or a filesystem scan.
fn build_choose(
    ctx: &mut RenderCtx<'_>,
    path: &FieldPath,
    value: Option<&Value>,
    meta: &GuiMeta,
    single: bool,
) -> anyhow::Result<Built> {
    let keys: Vec<String> = match &meta.scan {
        Some(spec) => ctx.scanner.scan(spec)?,
        None => meta.choices.clone(),
    };
    let items: Vec<String> = keys.iter().map(|key| (ctx.translate)(key)).collect();

    let (selected, checked) = if single {
        let current = value.map(value::as_cell).unwrap_or_default();
        let selected = match keys.iter().position(|key| key == &current) {
            Some(index) => Some(index),
            None if !keys.is_empty() => Some(0),
            None => None,
        };
        (selected, Vec::new())
    } else {
        let picked = value
            .and_then(Value::as_array)
            .with_context(|| format!("choose view at {path} requires a list value"))?;
        let mut checked = Vec::new();
        for item in picked {
            let cell = value::as_cell(item);
            let index = keys
                .iter()
                .position(|key| key == &cell)
                .with_context(|| format!("checked item `{cell}` is not in the universe at {path}"))?;
            checked.push(index);
        }
        (None, checked)
    };

    let mut children = Vec::new();
    let caption = format!("{}:", ctx.label(path));
    children.push(build_label(ctx, path.child("label"), caption));

    let box_path = path.child(LIST_BOX);
    let box_handle = ctx.registry.allocate(&box_path, true, false);
    ctx.backend.create_control(
        box_handle,
        &Control::ListBox {
            label: String::new(),
            items,
            selected,
            checked,
            multi: !single,
        },
    );
    children.push(RenderedNode::control(
        box_handle,
        box_path,
        ControlBinding::Choose {
            keys,
            single,
            describe: meta.description,
        },
    ));

    if meta.description {
        let descr_path = path.child(DESCRIPTION_SUFFIX);
        let handle = ctx.registry.allocate(&descr_path, true, false);
        let text = (ctx.translate)(&descr_path.to_string());
        ctx.backend
            .create_control(handle, &Control::StatusText { text });
        children.push(RenderedNode::control(
            handle,
            descr_path,
            ControlBinding::Label,
        ));
    }

    let handle = ctx.registry.allocate(path, false, false);
    ctx.backend
        .create_container(handle, ContainerKind::Row, None);
    for child in &children {
        ctx.backend.attach(handle, child.handle, None);
    }
    Ok(Built::plain(RenderedNode::container(
        handle,
        path.clone(),
        ContainerKind::Row,
        children,
    )))
}

/// Builds a whole module page: one subtree per configuration section plus
/// the shared OK / Apply / Cancel button row.
pub(crate) fn build_page(
    ctx: &mut RenderCtx<'_>,
    module_path: &FieldPath,
    config: &Value,
    gui: &GuiMeta,
) -> anyhow::Result<RenderedNode> {
    let map = config
        .as_object()
        .with_context(|| format!("module `{module_path}` config must be a mapping"))?;

    let mut children = Vec::new();
    for (name, section_value) in map {
        if SKIP_KEYS.contains(&name.as_str()) {
            continue;
        }
        let section_meta = gui.child_or_default(name);
        let section_path = module_path.child(name.clone());
        if let Some(node) = render(ctx, &section_path, Some(section_value), &section_meta)? {
            children.push(node);
        }
    }
    children.push(build_page_buttons(ctx));

    let handle = ctx.registry.allocate(module_path, false, false);
    ctx.backend
        .create_container(handle, ContainerKind::Page, None);
    for child in &children {
        ctx.backend.attach(handle, child.handle, None);
    }
    Ok(RenderedNode::container(
        handle,
        module_path.clone(),
        ContainerKind::Page,
        children,
    ))
}

fn build_page_buttons(ctx: &mut RenderCtx<'_>) -> RenderedNode {
    // Shared controls: the same buttons appear on every page, so the
    // registry keeps a multiset of handles under each path.
    let buttons = vec![
        build_button(ctx, &FieldPath::parse(OK_BUTTON_KEY), ButtonRole::Ok, true, true).node,
        build_button(ctx, &FieldPath::parse(APPLY_BUTTON_KEY), ButtonRole::Apply, false, true).node,
        build_button(ctx, &FieldPath::parse(CANCEL_BUTTON_KEY), ButtonRole::Cancel, true, true)
            .node,
    ];
    let path = FieldPath::parse("settings.buttons");
    let handle = ctx.registry.allocate(&path, false, false);
    ctx.backend
        .create_container(handle, ContainerKind::Row, None);
    for button in &buttons {
        ctx.backend.attach(handle, button.handle, None);
    }
    RenderedNode::container(handle, path, ContainerKind::Row, buttons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::resolve_view;
    use serde_json::json;

    #[test]
    fn view_resolution_prefers_explicit_tags() {
        let meta = GuiMeta {
            view: Some(ViewKind::Slider),
            ..GuiMeta::default()
        };
        assert_eq!(resolve_view(&meta, Some(&json!(5))), Some(ViewKind::Slider));
    }

    #[test]
    fn view_resolution_infers_from_value_kind() {
        let meta = GuiMeta::default();
        assert_eq!(resolve_view(&meta, Some(&json!(true))), Some(ViewKind::Checkbox));
        assert_eq!(resolve_view(&meta, Some(&json!("x"))), Some(ViewKind::Text));
        assert_eq!(resolve_view(&meta, Some(&json!({}))), Some(ViewKind::Group));
        assert_eq!(resolve_view(&meta, None), Some(ViewKind::Button));
        // Bare numbers and lists have no inferred view.
        assert_eq!(resolve_view(&meta, Some(&json!(3))), None);
        assert_eq!(resolve_view(&meta, Some(&json!([]))), None);
    }
}
