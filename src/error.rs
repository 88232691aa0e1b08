//! Error types for schema navigation.

use thiserror::Error;

/// Failure raised when a navigation key does not resolve to a settings page.
///
/// The three variants are deliberately distinct so callers can show
/// different diagnostics for each failure kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaKeyError {
    /// The key does not start with the settings root segment.
    #[error("key is not for the settings tree: {0}")]
    NotSettingsKey(String),
    /// The category segment is not a known category.
    #[error("key not found in categories: {0}")]
    UnknownCategory(String),
    /// The module segment is not a member of the category.
    #[error("key not found in modules: {0}")]
    UnknownModule(String),
}
