//! Validation utilities for the resolver
//!
//! This module provides:
//! - Pinned prefix presence checks
//! - Dangling dependency detection
//!
//! Both run before ordering so that a missing module is never
//! misreported as a cycle.

use crate::error::{Result, StackupError};
use crate::resolver::graph::DependencyGraph;

/// Check that every pinned module exists in the graph
///
/// # Errors
///
/// Returns `StackupError::MissingPinnedModule` for the first absent name.
pub fn validate_pinned(graph: &DependencyGraph, pinned: &[&str]) -> Result<()> {
    match pinned.iter().find(|name| !graph.contains(name)) {
        Some(name) => Err(StackupError::MissingPinnedModule {
            name: (*name).to_string(),
        }),
        None => Ok(()),
    }
}

/// Check that every declared dependency names a module in the graph
///
/// Modules and their dependencies are visited in name order, so the
/// reported pair is stable for a given input.
///
/// # Errors
///
/// Returns `StackupError::MissingDependency` with the declaring module and
/// the missing name.
pub fn validate_dependencies(graph: &DependencyGraph) -> Result<()> {
    for module in graph.modules() {
        if let Some(missing) = module
            .dependencies()
            .iter()
            .find(|dep| !graph.contains(dep))
        {
            return Err(StackupError::MissingDependency {
                module: module.name().to_string(),
                dependency: missing.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModuleDescriptor;

    fn graph(modules: &[(&str, &[&str])]) -> DependencyGraph {
        DependencyGraph::build(modules.iter().map(|(name, deps)| {
            ModuleDescriptor::new(*name, format!("/modules/{name}"))
                .with_dependencies(deps.iter().copied())
        }))
        .expect("graph should build")
    }

    #[test]
    fn test_validate_pinned_present() {
        let graph = graph(&[("core", &[]), ("api", &["core"])]);
        assert!(validate_pinned(&graph, &["core"]).is_ok());
        assert!(validate_pinned(&graph, &[]).is_ok());
    }

    #[test]
    fn test_validate_pinned_missing() {
        let graph = graph(&[("api", &[])]);
        match validate_pinned(&graph, &["core"]) {
            Err(StackupError::MissingPinnedModule { name }) => assert_eq!(name, "core"),
            other => panic!("expected MissingPinnedModule, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_dependencies_valid() {
        let graph = graph(&[("a", &[]), ("b", &["a"])]);
        assert!(validate_dependencies(&graph).is_ok());
    }

    #[test]
    fn test_validate_dependencies_missing() {
        let graph = graph(&[("a", &["z"]), ("b", &["a"])]);
        match validate_dependencies(&graph) {
            Err(StackupError::MissingDependency { module, dependency }) => {
                assert_eq!(module, "a");
                assert_eq!(dependency, "z");
            }
            other => panic!("expected MissingDependency, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_dependencies_reports_first_in_name_order() {
        let graph = graph(&[("m", &["y", "x"]), ("b", &["q"])]);
        match validate_dependencies(&graph) {
            Err(StackupError::MissingDependency { module, dependency }) => {
                assert_eq!(module, "b");
                assert_eq!(dependency, "q");
            }
            other => panic!("expected MissingDependency, got {other:?}"),
        }
    }
}
