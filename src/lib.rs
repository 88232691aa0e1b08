//! # formset
//!
//! A metadata-driven settings form engine with dirty tracking and
//! dependency-triggered redraws.
//!
//! formset turns a nested configuration tree plus a parallel tree of
//! rendering metadata into an editable form, tracks pending edits against
//! the live values, regenerates dependent sub-forms when a driving field
//! changes, and commits edits back per module with "requires restart"
//! classification.
//!
//! ## Features
//!
//! - Schema-driven form generation: explicit view tags or views inferred
//!   from value kinds (String, Integer, Boolean, Enum, List, Group)
//! - Toolkit-agnostic rendering through a small backend trait; widget
//!   identity flows through an explicit path/handle registry
//! - Per-path pending-edit ledger with kind-specific comparison rules
//! - Declarative redraw dependencies between sibling fields
//! - Per-module commit pipeline with non-dynamic (restart) classification
//!   and apply hooks
//! - Channel status panel fed asynchronously from module worker threads
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use formset::schema::{GuiMeta, LoadedModule, ModuleSet, build_categories};
//! use formset::session::EditorSession;
//! use formset::render::FsScanner;
//! use formset::identity_translator;
//! use serde_json::json;
//!
//! let mut modules = ModuleSet::new();
//! modules.insert(
//!     "main",
//!     LoadedModule::new(
//!         json!({"gui": {"on_top": false, "show_hidden": false}}),
//!         GuiMeta {
//!             category: Some("main".to_string()),
//!             ..GuiMeta::default()
//!         },
//!     ),
//! );
//!
//! let categories = build_categories(&modules);
//! let session = EditorSession::new(
//!     categories,
//!     identity_translator(),
//!     Box::new(FsScanner::new(".")),
//!     false,
//! );
//! // Hand `session` a RenderBackend implementation and forward toolkit
//! // events into `session.handle_event`.
//! # let _ = session;
//! ```
//!
//! ## Modules
//!
//! - [`schema`] - Configuration data model and rendering metadata
//! - [`render`] - Dispatch, builders, identity registry, backend contract
//! - [`session`] - Session state, change tracking, redraw and commit
//! - [`error`] - Navigation error taxonomy

/// Navigation error taxonomy.
pub mod error;

/// Widget-tree rendering and backend contract.
pub mod render;

/// Configuration data model and rendering metadata.
pub mod schema;

/// Editing-session state and control flow.
pub mod session;

pub use error::SchemaKeyError;
pub use render::{InputEvent, RenderBackend, WidgetHandle};
pub use schema::meta::identity_translator;
pub use schema::{FieldPath, GuiMeta, LoadedModule, ModuleSet};
pub use session::{EditorSession, SaveOutcome, SessionAction};
pub use serde_json::Value;
