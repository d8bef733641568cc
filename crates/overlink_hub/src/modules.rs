//! Module dependency graph

use overlink_core::OrderedMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStatus {
    #[default]
    Inactive,
    Active,
    Loading,
    Error,
}

impl ModuleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Active => "active",
            Self::Loading => "loading",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dependency-gated unit of functionality bound to a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConnection {
    pub id: String,
    pub zone_id: String,
    pub status: ModuleStatus,
    pub dependencies: Vec<String>,
    pub remix_mode: bool,
}

impl ModuleConnection {
    pub fn new<I, S>(id: impl Into<String>, zone_id: impl Into<String>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            zone_id: zone_id.into(),
            status: ModuleStatus::Inactive,
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            remix_mode: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ModuleStatus::Active
    }
}

/// Registered modules plus the derived list of active ids.
///
/// The active list is recomputed from module statuses on every change and is
/// always in registration order.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    modules: OrderedMap<ModuleConnection>,
    active: Vec<String>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module as inactive, replacing any module with the same id
    pub fn register<I, S>(
        &mut self,
        id: impl Into<String>,
        zone_id: impl Into<String>,
        dependencies: I,
    ) -> ModuleConnection
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let module = ModuleConnection::new(id, zone_id, dependencies);
        if self.modules.insert(module.id.clone(), module.clone()).is_some() {
            log::debug!("Module {} re-registered", module.id);
            self.recompute_active();
        }
        module
    }

    /// Dependencies of `id` that are not currently active.
    ///
    /// Unregistered dependencies count as unmet. Unknown modules report nothing.
    fn unmet_dependencies(&self, id: &str) -> Vec<&str> {
        let Some(module) = self.modules.get(id) else {
            return Vec::new();
        };
        module
            .dependencies
            .iter()
            .filter(|dep| !self.modules.get(dep).is_some_and(ModuleConnection::is_active))
            .map(String::as_str)
            .collect()
    }

    /// Activate a module whose dependencies are all active
    pub fn activate(&mut self, id: &str) -> bool {
        if !self.modules.contains_key(id) {
            log::debug!("Cannot activate unknown module {}", id);
            return false;
        }
        let unmet = self.unmet_dependencies(id);
        if !unmet.is_empty() {
            log::debug!("Module {} blocked on {:?}", id, unmet);
            return false;
        }
        self.set_status(id, ModuleStatus::Active)
    }

    /// Mark a module inactive. Dependents are left as they are.
    pub fn deactivate(&mut self, id: &str) -> bool {
        self.set_status(id, ModuleStatus::Inactive)
    }

    fn set_status(&mut self, id: &str, status: ModuleStatus) -> bool {
        match self.modules.get_mut(id) {
            Some(module) => {
                module.status = status;
                self.recompute_active();
                true
            }
            None => false,
        }
    }

    fn recompute_active(&mut self) {
        self.active = self
            .modules
            .values()
            .filter(|m| m.is_active())
            .map(|m| m.id.clone())
            .collect();
    }

    pub fn get(&self, id: &str) -> Option<&ModuleConnection> {
        self.modules.get(id)
    }

    pub fn status(&self, id: &str) -> Option<ModuleStatus> {
        self.modules.get(id).map(|m| m.status)
    }

    /// All modules in registration order
    pub fn modules(&self) -> impl Iterator<Item = &ModuleConnection> {
        self.modules.values()
    }

    /// Active module ids in registration order
    pub fn active_modules(&self) -> &[String] {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub(crate) fn export(&self) -> OrderedMap<ModuleConnection> {
        self.modules.clone()
    }

    pub(crate) fn restore(&mut self, modules: OrderedMap<ModuleConnection>) {
        self.modules = modules;
        self.recompute_active();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> ModuleGraph {
        let mut graph = ModuleGraph::new();
        graph.register("toppler_demo", "toppler", Vec::<String>::new());
        graph.register("spirit_tamer_demo", "spirit_tamer", Vec::<String>::new());
        graph.register("remix_preview", "preview", ["toppler_demo", "spirit_tamer_demo"]);
        graph
    }

    #[test]
    fn test_register_starts_inactive() {
        let graph = graph();
        let module = graph.get("remix_preview").unwrap();
        assert_eq!(module.status, ModuleStatus::Inactive);
        assert!(!module.remix_mode);
        assert_eq!(module.zone_id, "preview");
        assert!(graph.active_modules().is_empty());
    }

    #[test]
    fn test_activation_requires_active_dependencies() {
        let mut graph = graph();
        assert!(!graph.activate("remix_preview"));
        assert_eq!(graph.unmet_dependencies("remix_preview").len(), 2);

        assert!(graph.activate("toppler_demo"));
        assert!(!graph.activate("remix_preview"));
        assert_eq!(graph.unmet_dependencies("remix_preview"), vec!["spirit_tamer_demo"]);

        assert!(graph.activate("spirit_tamer_demo"));
        assert!(graph.activate("remix_preview"));
        assert_eq!(
            graph.active_modules(),
            ["toppler_demo", "spirit_tamer_demo", "remix_preview"]
        );
    }

    #[test]
    fn test_unregistered_dependency_is_unmet() {
        let mut graph = ModuleGraph::new();
        graph.register("missing_dep_module", "hub", ["toppler_demo"]);
        assert!(!graph.activate("missing_dep_module"));
        assert_eq!(graph.status("missing_dep_module"), Some(ModuleStatus::Inactive));
    }

    #[test]
    fn test_unknown_module() {
        let mut graph = graph();
        assert!(!graph.activate("nope"));
        assert!(!graph.deactivate("nope"));
        assert!(graph.unmet_dependencies("nope").is_empty());
    }

    #[test]
    fn test_deactivate_does_not_cascade() {
        let mut graph = graph();
        graph.activate("toppler_demo");
        graph.activate("spirit_tamer_demo");
        graph.activate("remix_preview");

        assert!(graph.deactivate("toppler_demo"));
        assert_eq!(graph.status("remix_preview"), Some(ModuleStatus::Active));
        assert_eq!(graph.active_modules(), ["spirit_tamer_demo", "remix_preview"]);
    }

    #[test]
    fn test_active_list_follows_registration_order() {
        let mut graph = graph();
        graph.activate("spirit_tamer_demo");
        graph.activate("toppler_demo");
        assert_eq!(graph.active_modules(), ["toppler_demo", "spirit_tamer_demo"]);
    }

    #[test]
    fn test_reregister_replaces_in_place() {
        let mut graph = graph();
        graph.activate("toppler_demo");
        graph.register("toppler_demo", "elsewhere", Vec::<String>::new());

        let ids: Vec<_> = graph.modules().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["toppler_demo", "spirit_tamer_demo", "remix_preview"]);
        assert_eq!(graph.get("toppler_demo").unwrap().zone_id, "elsewhere");
        assert!(graph.active_modules().is_empty());
    }
}
