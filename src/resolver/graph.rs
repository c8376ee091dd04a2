//! Graph building for module dependencies
//!
//! The dependency graph maps every module name to its descriptor; the
//! edge set is read straight off each descriptor's dependency list:
//!
//! ```text
//! BTreeMap<String, ModuleDescriptor>
//!    ↓              ↓
//!  module_name   descriptor.dependencies() = {dep1, dep2}
//! ```
//!
//! Building never checks that dependency targets exist. Dangling
//! references are reported by the resolver as their own error kind.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::ModuleDescriptor;
use crate::error::{Result, StackupError};

/// Immutable dependency graph for one resolution pass
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    modules: BTreeMap<String, ModuleDescriptor>,
}

impl DependencyGraph {
    /// Build a graph from a collection of descriptors
    ///
    /// # Errors
    ///
    /// Returns `StackupError::DuplicateModule` naming the first repeated name.
    pub fn build(descriptors: impl IntoIterator<Item = ModuleDescriptor>) -> Result<Self> {
        let mut modules = BTreeMap::new();
        for descriptor in descriptors {
            let name = descriptor.name().to_string();
            if modules.contains_key(&name) {
                return Err(StackupError::DuplicateModule { name });
            }
            modules.insert(name, descriptor);
        }
        Ok(Self { modules })
    }

    pub fn get(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.modules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// All modules in ascending name order
    pub fn modules(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.values()
    }

    /// Outgoing edges of `name`, or `None` for unknown modules
    pub fn dependencies_of(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.modules.get(name).map(ModuleDescriptor::dependencies)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn module(name: &str, deps: &[&str]) -> ModuleDescriptor {
        ModuleDescriptor::new(name, format!("/modules/{name}")).with_dependencies(deps.iter().copied())
    }

    #[test]
    fn test_build_graph_simple() {
        let graph = DependencyGraph::build([module("api", &["core"]), module("core", &[])])
            .expect("graph should build");

        assert_eq!(graph.len(), 2);
        assert!(graph.contains("api"));
        assert!(graph.contains("core"));
        let deps = graph.dependencies_of("api").expect("api is in the graph");
        assert!(deps.contains("core"));
    }

    #[test]
    fn test_build_graph_keeps_dangling_dependencies() {
        let graph = DependencyGraph::build([module("api", &["missing"])])
            .expect("dangling references are the resolver's concern");

        assert!(!graph.contains("missing"));
        assert!(
            graph
                .dependencies_of("api")
                .is_some_and(|deps| deps.contains("missing"))
        );
    }

    #[test]
    fn test_build_graph_rejects_duplicates() {
        let result = DependencyGraph::build([
            module("core", &[]),
            module("api", &[]),
            module("core", &["api"]),
        ]);

        match result {
            Err(StackupError::DuplicateModule { name }) => assert_eq!(name, "core"),
            other => panic!("expected DuplicateModule, got {other:?}"),
        }
    }

    #[test]
    fn test_modules_iterate_in_name_order() {
        let graph = DependencyGraph::build([module("web", &[]), module("api", &[]), module("db", &[])])
            .expect("graph should build");

        let names: Vec<&str> = graph.modules().map(ModuleDescriptor::name).collect();
        assert_eq!(names, vec!["api", "db", "web"]);
    }

    #[test]
    fn test_empty_graph() {
        let graph = DependencyGraph::build(Vec::<ModuleDescriptor>::new()).expect("empty graph is valid");
        assert!(graph.is_empty());
        assert!(graph.dependencies_of("anything").is_none());
    }
}
