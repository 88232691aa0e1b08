//! Loaded modules and category grouping for navigation.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::SchemaKeyError;
use crate::schema::meta::{ApplyHook, GuiMeta};
use crate::schema::path::{FieldPath, PATH_SEP};

/// Root segment of every navigation key.
pub const SETTINGS_ROOT: &str = "settings";

/// One module as handed over by the embedding application.
pub struct LoadedModule {
    /// Live configuration tree, owned by the module.
    pub config: Value,
    /// Rendering metadata parallel to `config`.
    pub gui: GuiMeta,
    /// Invoked after the module's pending edits have been applied.
    pub apply: Option<ApplyHook>,
}

impl LoadedModule {
    /// Creates a module with no apply hook.
    pub fn new(config: Value, gui: GuiMeta) -> Self {
        Self {
            config,
            gui,
            apply: None,
        }
    }

    /// Attaches the apply hook.
    pub fn with_apply(mut self, hook: ApplyHook) -> Self {
        self.apply = Some(hook);
        self
    }
}

/// Ordered map of module name to loaded module.
#[derive(Default)]
pub struct ModuleSet {
    modules: IndexMap<String, LoadedModule>,
}

impl ModuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module, keeping insertion order.
    pub fn insert(&mut self, name: impl Into<String>, module: LoadedModule) {
        self.modules.insert(name.into(), module);
    }

    pub fn get(&self, name: &str) -> Option<&LoadedModule> {
        self.modules.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut LoadedModule> {
        self.modules.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Module names in load order.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.modules.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LoadedModule)> {
        self.modules.iter()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Category grouping of modules for the navigation tree.
///
/// Built once from all loaded modules. A module belongs to a category iff
/// its metadata declares one; categories keep first-seen order, modules keep
/// load order within their category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categories {
    groups: IndexMap<String, Vec<String>>,
}

/// Groups every module carrying a category declaration.
pub fn build_categories(modules: &ModuleSet) -> Categories {
    let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
    for (name, module) in modules.iter() {
        let Some(category) = &module.gui.category else {
            continue;
        };
        groups.entry(category.clone()).or_default().push(name.clone());
    }
    Categories { groups }
}

impl Categories {
    /// Category names in first-seen order.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.groups.keys()
    }

    /// Module names of a category.
    pub fn modules(&self, category: &str) -> Option<&[String]> {
        self.groups.get(category).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Resolves a navigation key to `(category, module)` names.
    ///
    /// The key has the shape `settings.<category>[.<module..>]`; selecting a
    /// category node resolves to the module named like the category itself.
    ///
    /// # Errors
    ///
    /// Returns the matching [`SchemaKeyError`] variant when the key is not a
    /// settings key, names an unknown category, or names a module that is
    /// not a member of the category.
    pub fn resolve<'a>(&'a self, key: &FieldPath) -> Result<(&'a str, String), SchemaKeyError> {
        if key.get(0) != Some(SETTINGS_ROOT) {
            return Err(SchemaKeyError::NotSettingsKey(key.to_string()));
        }
        let category = key
            .get(1)
            .ok_or_else(|| SchemaKeyError::UnknownCategory(key.to_string()))?;
        let Some((category, members)) = self.groups.get_key_value(category) else {
            return Err(SchemaKeyError::UnknownCategory(category.to_string()));
        };
        let module = if key.len() > 2 {
            key.segments()[2..].join(PATH_SEP)
        } else {
            category.clone()
        };
        if !members.contains(&module) {
            return Err(SchemaKeyError::UnknownModule(module));
        }
        Ok((category.as_str(), module))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta_in(category: &str) -> GuiMeta {
        GuiMeta {
            category: Some(category.to_string()),
            ..GuiMeta::default()
        }
    }

    fn sample() -> ModuleSet {
        let mut modules = ModuleSet::new();
        modules.insert("chat", LoadedModule::new(json!({}), meta_in("chat")));
        modules.insert("twitch", LoadedModule::new(json!({}), meta_in("chat")));
        modules.insert("grep", LoadedModule::new(json!({}), meta_in("messaging")));
        modules.insert("bare", LoadedModule::new(json!({}), GuiMeta::default()));
        modules
    }

    #[test]
    fn grouping_preserves_order_and_skips_undeclared() {
        let categories = build_categories(&sample());
        let names: Vec<_> = categories.names().cloned().collect();
        assert_eq!(names, ["chat", "messaging"]);
        assert_eq!(categories.modules("chat").unwrap(), ["chat", "twitch"]);
        assert_eq!(categories.modules("messaging").unwrap(), ["grep"]);
    }

    #[test]
    fn resolve_distinguishes_failure_kinds() {
        let categories = build_categories(&sample());
        assert!(matches!(
            categories.resolve(&FieldPath::parse("options.chat")),
            Err(SchemaKeyError::NotSettingsKey(_))
        ));
        assert!(matches!(
            categories.resolve(&FieldPath::parse("settings.video")),
            Err(SchemaKeyError::UnknownCategory(_))
        ));
        assert!(matches!(
            categories.resolve(&FieldPath::parse("settings.chat.youtube")),
            Err(SchemaKeyError::UnknownModule(_))
        ));
    }

    #[test]
    fn resolve_category_node_selects_module_of_same_name() {
        let categories = build_categories(&sample());
        let (category, module) = categories.resolve(&FieldPath::parse("settings.chat")).unwrap();
        assert_eq!((category, module.as_str()), ("chat", "chat"));
        let (_, module) = categories
            .resolve(&FieldPath::parse("settings.chat.twitch"))
            .unwrap();
        assert_eq!(module, "twitch");
    }
}
