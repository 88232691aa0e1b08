//! The editing session.
//!
//! An [`EditorSession`] owns all per-session state: the widget registry,
//! the pending-edit ledger, the redraw declarations, and the cache of built
//! module pages. It is created when the settings editor opens and dropped
//! when it closes; the configuration and metadata trees it renders outlive
//! it and belong to the loaded modules.
//!
//! All methods run on the UI thread. The embedder forwards toolkit input
//! events into [`EditorSession::handle_event`] and acts on the returned
//! [`SessionAction`].

use std::collections::HashMap;

use anyhow::Context;
use log::debug;
use serde_json::{Map, Value};

use crate::render::backend::{ContainerKind, Control, InputEvent, NavItem, RenderBackend};
use crate::render::build::{self, RenderCtx};
use crate::render::registry::{WidgetHandle, WidgetRegistry};
use crate::render::scan::EntryScanner;
use crate::render::tree::{ButtonRole, ControlBinding, NodeKind, RenderedNode, destroy_subtree};
use crate::render::{APPLY_BUTTON_KEY, DESCRIPTION_SUFFIX, LIST_BOX, LIST_INPUT, LIST_INPUT2, SKIP_TEXT_CONTROLS};
use crate::schema::category::{Categories, ModuleSet, SETTINGS_ROOT};
use crate::schema::meta::Translator;
use crate::schema::path::FieldPath;
use crate::schema::value;
use crate::session::commit::{self, SaveOutcome};
use crate::session::redraw::{RedrawEntry, RedrawMap};
use crate::session::tracker::{ChangeTracker, EditKind};

/// What the embedder should do after an input event was handled.
#[derive(Debug)]
pub enum SessionAction {
    /// Nothing beyond what the engine already did.
    None,
    /// Pending edits were committed.
    Saved {
        outcome: SaveOutcome,
        /// The triggering button also requests closing the editor.
        close: bool,
    },
    /// The editor should close without saving.
    Close,
    /// A module-defined action button was pressed.
    ModuleAction(FieldPath),
}

/// One settings-editing session.
pub struct EditorSession {
    categories: Categories,
    registry: WidgetRegistry,
    tracker: ChangeTracker,
    redraw: RedrawMap,
    /// Built module pages, kept for the session and shown/hidden on
    /// navigation.
    pages: HashMap<String, RenderedNode>,
    /// Auxiliary list-input buffers; never part of the ledger.
    scratch: HashMap<FieldPath, String>,
    /// Last focused cell per grid, for row removal.
    selected_cell: HashMap<FieldPath, (usize, usize)>,
    translate: Translator,
    scanner: Box<dyn EntryScanner>,
    show_hidden: bool,
    content: Option<WidgetHandle>,
    current: Option<String>,
}

impl EditorSession {
    /// Creates a session over pre-built categories.
    pub fn new(
        categories: Categories,
        translate: Translator,
        scanner: Box<dyn EntryScanner>,
        show_hidden: bool,
    ) -> Self {
        Self {
            categories,
            registry: WidgetRegistry::new(),
            tracker: ChangeTracker::new(),
            redraw: RedrawMap::new(),
            pages: HashMap::new(),
            scratch: HashMap::new(),
            selected_cell: HashMap::new(),
            translate,
            scanner,
            show_hidden,
            content: None,
            current: None,
        }
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    /// Module key of the page currently shown.
    pub fn current_page(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Rendered page of a module, if built.
    pub fn page(&self, module_id: &str) -> Option<&RenderedNode> {
        self.pages.get(module_id)
    }

    /// Creates the navigation tree and the content container.
    ///
    /// Returns `(tree, content)` handles for the embedder to place.
    pub fn build_shell(&mut self, backend: &mut dyn RenderBackend) -> (WidgetHandle, WidgetHandle) {
        let tree = self
            .registry
            .allocate(&FieldPath::parse("settings.tree"), true, false);
        let mut items = Vec::new();
        for (category, members) in self.categories.iter() {
            let category_key = format!("{SETTINGS_ROOT}.{category}");
            let children = members
                .iter()
                .filter(|module| *module != category)
                .map(|module| NavItem {
                    key: format!("{category_key}.{module}"),
                    label: (self.translate)(module),
                    children: Vec::new(),
                })
                .collect();
            items.push(NavItem {
                key: category_key.clone(),
                label: (self.translate)(&category_key),
                children,
            });
        }
        backend.create_control(tree, &Control::NavTree { items });

        let content = self
            .registry
            .allocate(&FieldPath::parse("settings.content"), false, false);
        backend.create_container(content, ContainerKind::Page, None);
        self.content = Some(content);
        (tree, content)
    }

    /// Shows the page a navigation key points at, building it on first
    /// visit.
    ///
    /// # Errors
    ///
    /// Navigation failures surface as [`crate::SchemaKeyError`]; build
    /// failures (scan errors, malformed metadata) propagate as-is.
    pub fn select_page(
        &mut self,
        backend: &mut dyn RenderBackend,
        modules: &ModuleSet,
        key: &FieldPath,
    ) -> anyhow::Result<()> {
        let (_, module_id) = self.categories.resolve(key)?;
        let content = self.content.context("shell not built")?;

        if !self.pages.contains_key(&module_id) {
            let module = modules
                .get(&module_id)
                .with_context(|| format!("module `{module_id}` is not loaded"))?;
            let module_path = FieldPath::parse(&module_id);
            debug!("building page for {module_path}");
            let mut ctx = RenderCtx {
                registry: &mut self.registry,
                backend: &mut *backend,
                translate: &self.translate,
                scanner: self.scanner.as_ref(),
                show_hidden: self.show_hidden,
            };
            let page = build::build_page(&mut ctx, &module_path, &module.config, &module.gui)?;
            for (target, rule) in &module.gui.redraw {
                self.redraw.register(
                    &module_id,
                    target,
                    RedrawEntry {
                        path: module_path.child(target.clone()),
                        rule: rule.clone(),
                    },
                );
            }
            backend.attach(content, page.handle, None);
            self.pages.insert(module_id.clone(), page);
        }

        for (id, page) in &self.pages {
            backend.set_visible(page.handle, *id == module_id);
        }
        backend.relayout();
        self.current = Some(module_id);
        Ok(())
    }

    /// Routes one toolkit input event.
    pub fn handle_event(
        &mut self,
        backend: &mut dyn RenderBackend,
        modules: &mut ModuleSet,
        handle: WidgetHandle,
        event: InputEvent,
    ) -> anyhow::Result<SessionAction> {
        if let InputEvent::TreeSelected(key) = &event {
            self.select_page(backend, modules, &FieldPath::parse(key))?;
            return Ok(SessionAction::None);
        }

        let path = self
            .registry
            .resolve(handle)
            .cloned()
            .context("event from an unregistered widget")?;
        let binding = self
            .find_binding(handle)
            .with_context(|| format!("no rendered control at {path}"))?;

        match (binding, event) {
            (ControlBinding::Checkbox, InputEvent::Toggled(checked)) => {
                self.on_change(backend, modules, &path, Value::Bool(checked), EditKind::Scalar)?;
            }
            (ControlBinding::Text, InputEvent::TextEdited(text)) => {
                if path
                    .last()
                    .is_some_and(|name| SKIP_TEXT_CONTROLS.contains(&name))
                {
                    self.scratch.insert(path, text);
                } else {
                    self.on_change(
                        backend,
                        modules,
                        &path,
                        Value::String(text),
                        EditKind::Scalar,
                    )?;
                }
            }
            (ControlBinding::Spin, InputEvent::SpinChanged(n))
            | (ControlBinding::Slider, InputEvent::SliderMoved(n)) => {
                self.on_change(backend, modules, &path, Value::from(n), EditKind::Scalar)?;
            }
            (ControlBinding::Dropdown { keys }, InputEvent::ChoicePicked(index)) => {
                let choice = keys
                    .get(index)
                    .with_context(|| format!("choice index {index} out of range at {path}"))?
                    .clone();
                self.on_change(backend, modules, &path, Value::String(choice), EditKind::Scalar)?;
            }
            (
                ControlBinding::Choose {
                    keys,
                    single,
                    describe,
                },
                InputEvent::ListPicked(index),
            ) => {
                let selection = keys
                    .get(index)
                    .with_context(|| format!("item index {index} out of range at {path}"))?
                    .clone();
                let section = path.parent();
                if describe {
                    let descr_path = section.child(DESCRIPTION_SUFFIX);
                    if let Some(descr) = self.registry.find(&descr_path) {
                        let text = (self.translate)(&format!("{selection}.description"));
                        backend.set_text(descr, &text);
                    }
                }
                if single {
                    self.on_change(
                        backend,
                        modules,
                        &section,
                        Value::String(selection),
                        EditKind::Section,
                    )?;
                }
            }
            (ControlBinding::Choose { keys, .. }, InputEvent::ChecksChanged(indexes)) => {
                let mut picked = Vec::new();
                for index in indexes {
                    let key = keys
                        .get(index)
                        .with_context(|| format!("item index {index} out of range at {path}"))?;
                    picked.push(Value::String(key.clone()));
                }
                let section = path.parent();
                self.on_change(backend, modules, &section, Value::Array(picked), EditKind::Section)?;
            }
            (ControlBinding::GridBox { .. }, InputEvent::CellSelected { row, col }) => {
                self.selected_cell.insert(path.parent(), (row, col));
            }
            (ControlBinding::Colour, InputEvent::ColourPicked(hex)) => {
                self.on_change(backend, modules, &path, Value::String(hex), EditKind::Scalar)?;
            }
            (ControlBinding::Button(role), InputEvent::Clicked) => {
                return self.on_button(backend, modules, &path, role);
            }
            (binding, event) => {
                debug!("unhandled event {event:?} at {path} ({binding:?})");
            }
        }
        Ok(SessionAction::None)
    }

    /// Commits the ledger and disables the apply buttons.
    pub fn save(&mut self, backend: &mut dyn RenderBackend, modules: &mut ModuleSet) -> SaveOutcome {
        let outcome = commit::save(&mut self.tracker, modules, &mut self.show_hidden);
        self.set_apply_enabled(backend, false);
        outcome
    }

    fn find_binding(&self, handle: WidgetHandle) -> Option<ControlBinding> {
        self.pages
            .values()
            .find_map(|page| page.find(handle))
            .and_then(|node| match &node.kind {
                NodeKind::Control(binding) => Some(binding.clone()),
                NodeKind::Container(_) => None,
            })
    }

    fn on_button(
        &mut self,
        backend: &mut dyn RenderBackend,
        modules: &mut ModuleSet,
        path: &FieldPath,
        role: ButtonRole,
    ) -> anyhow::Result<SessionAction> {
        debug!("button clicked: {path}");
        match role {
            ButtonRole::ListAdd | ButtonRole::ListRemove => {
                self.on_list_operation(backend, modules, &path.parent(), role)?;
                Ok(SessionAction::None)
            }
            ButtonRole::Apply => Ok(SessionAction::Saved {
                outcome: self.save(backend, modules),
                close: false,
            }),
            ButtonRole::Ok => Ok(SessionAction::Saved {
                outcome: self.save(backend, modules),
                close: true,
            }),
            ButtonRole::Cancel => Ok(SessionAction::Close),
            ButtonRole::Action => Ok(SessionAction::ModuleAction(path.clone())),
        }
    }

    /// Applies an add/remove operation to an addable list and reconciles
    /// the resulting rows as a grid edit.
    fn on_list_operation(
        &mut self,
        backend: &mut dyn RenderBackend,
        modules: &ModuleSet,
        list_path: &FieldPath,
        role: ButtonRole,
    ) -> anyhow::Result<()> {
        let box_path = list_path.child(LIST_BOX);
        let selected_row = self.selected_cell.get(list_path).map(|(row, _)| *row);
        let input = self
            .scratch
            .get(&list_path.child(LIST_INPUT))
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        let input2 = self
            .scratch
            .get(&list_path.child(LIST_INPUT2))
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        let (handle, columns, rows) = {
            let node = self
                .pages
                .values_mut()
                .find_map(|page| page.find_path_mut(&box_path))
                .with_context(|| format!("no list box at {box_path}"))?;
            let NodeKind::Control(ControlBinding::GridBox { columns, rows }) = &mut node.kind
            else {
                anyhow::bail!("widget at {box_path} is not a grid");
            };
            match role {
                ButtonRole::ListAdd => {
                    let duplicate = rows
                        .iter()
                        .any(|row| row.first().is_some_and(|cell| cell.eq_ignore_ascii_case(&input)));
                    if !duplicate {
                        let mut row = vec![input.clone()];
                        if *columns == 2 {
                            row.push(input2.clone());
                        }
                        rows.push(row);
                    }
                }
                ButtonRole::ListRemove => {
                    if let Some(row) = selected_row
                        && row < rows.len()
                    {
                        rows.remove(row);
                    }
                }
                _ => {}
            }
            (node.handle, *columns, rows.clone())
        };

        backend.update_control(
            handle,
            &Control::Grid {
                columns,
                rows: rows.clone(),
            },
        );

        let candidate = if columns == 2 {
            let mut map = Map::new();
            for row in &rows {
                map.insert(
                    row.first().cloned().unwrap_or_default(),
                    Value::String(row.get(1).cloned().unwrap_or_default()),
                );
            }
            Value::Object(map)
        } else {
            let mut cells: Vec<Value> = Vec::new();
            for row in &rows {
                let cell = row.first().cloned().unwrap_or_default();
                if !cells.iter().any(|existing| existing.as_str() == Some(cell.as_str())) {
                    cells.push(Value::String(cell));
                }
            }
            Value::Array(cells)
        };
        self.on_change(backend, modules, list_path, candidate, EditKind::Grid)
    }

    /// Records or clears a pending edit, running any redraw the edit
    /// triggers first: re-deriving the target can itself change whether the
    /// page has pending edits.
    fn on_change(
        &mut self,
        backend: &mut dyn RenderBackend,
        modules: &ModuleSet,
        path: &FieldPath,
        candidate: Value,
        kind: EditKind,
    ) -> anyhow::Result<()> {
        let module_id = path
            .module()
            .context("edit path has no module segment")?
            .to_string();

        if let Some(leaf) = path.last().map(str::to_string) {
            for target in self.redraw.triggered(&module_id, &leaf) {
                self.run_redraw(backend, &module_id, &target, &candidate)?;
                self.set_apply_enabled(backend, true);
            }
        }

        let module = modules
            .get(&module_id)
            .with_context(|| format!("module `{module_id}` is not loaded"))?;
        let baseline = value::get_at(&module.config, &path.segments()[1..]);
        let dirty = self.tracker.reconcile(path, candidate, kind, baseline);
        debug!("edit at {path}: {}", if dirty { "dirty" } else { "clean" });
        self.set_apply_enabled(backend, !self.tracker.is_empty());
        Ok(())
    }

    /// Regenerates a redraw target in place: the old subtree is detached
    /// from its slot, destroyed with all its registry entries, and the
    /// freshly derived subtree is inserted at the same position.
    fn run_redraw(
        &mut self,
        backend: &mut dyn RenderBackend,
        module_id: &str,
        target: &str,
        trigger_value: &Value,
    ) -> anyhow::Result<()> {
        let entry = self
            .redraw
            .get(module_id, target)
            .with_context(|| format!("no redraw entry `{target}` for `{module_id}`"))?
            .clone();
        debug!("redrawing {} of `{module_id}`", entry.path);
        let fresh_config = (entry.rule.get_config)(trigger_value);
        let fresh_meta = (entry.rule.get_gui)(trigger_value);

        let page = self
            .pages
            .get_mut(module_id)
            .with_context(|| format!("page `{module_id}` not built"))?;
        let page_handle = page.handle;
        let position = page
            .children
            .iter()
            .position(|child| child.path == entry.path)
            .with_context(|| format!("redraw target {} is not on the page", entry.path))?;
        let old = page.children.remove(position);

        let _ = backend.detach(page_handle, old.handle);
        destroy_subtree(&old, backend, &mut self.registry);
        self.registry.release_under(&entry.path);

        let mut ctx = RenderCtx {
            registry: &mut self.registry,
            backend: &mut *backend,
            translate: &self.translate,
            scanner: self.scanner.as_ref(),
            show_hidden: self.show_hidden,
        };
        let node = build::render(&mut ctx, &entry.path, Some(&fresh_config), &fresh_meta)?
            .with_context(|| format!("redraw target {} produced no renderable view", entry.path))?;

        backend.attach(page_handle, node.handle, Some(position));
        if let Some(page) = self.pages.get_mut(module_id) {
            page.children.insert(position, node);
        }
        // A fresh subtree starts clean.
        self.tracker.clear_containing(&entry.path.to_string());
        backend.relayout();
        Ok(())
    }

    fn set_apply_enabled(&self, backend: &mut dyn RenderBackend, enabled: bool) {
        for handle in self
            .registry
            .handles_under(&FieldPath::parse(APPLY_BUTTON_KEY))
        {
            backend.set_enabled(handle, enabled);
        }
    }
}
