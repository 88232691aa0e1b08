//! Configuration data model and rendering metadata.
//!
//! The engine works on a dual tree: per-module configuration values (plain
//! ordered JSON trees) and a parallel [`meta::GuiMeta`] tree describing how
//! each value renders and behaves. This module provides:
//!
//! - [`path`] - Structured settings paths
//! - [`value`] - Lookup, write-back, coercion and comparison helpers
//! - [`meta`] - Rendering/behavior metadata and callback aliases
//! - [`category`] - Loaded modules and category grouping for navigation

/// Loaded modules and category grouping.
pub mod category;

/// Rendering/behavior metadata attached to paths.
pub mod meta;

/// Structured settings paths.
pub mod path;

/// Helpers over JSON configuration trees.
pub mod value;

pub use category::{Categories, LoadedModule, ModuleSet, build_categories};
pub use meta::{GuiMeta, RedrawRule, ViewKind};
pub use path::FieldPath;
