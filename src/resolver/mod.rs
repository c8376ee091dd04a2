//! Dependency resolution for stackup modules
//!
//! This module handles:
//! - Building dependency graphs from module descriptors
//! - Topological sorting to determine installation order
//! - Missing dependency, missing pinned module and cycle detection
//!
//! Resolution is pure: nothing is installed until a complete, valid
//! plan exists.

pub mod graph;
pub mod sort;
pub mod validation;

pub use graph::DependencyGraph;

use crate::domain::ModuleDescriptor;
use crate::error::Result;

/// Foundational modules installed before anything else, in this order
pub const PINNED_PREFIX: &[&str] = &["core"];

/// Ordered list of modules to install
#[derive(Debug, Clone)]
pub struct InstallPlan {
    modules: Vec<ModuleDescriptor>,
    pinned: usize,
}

impl InstallPlan {
    pub fn modules(&self) -> &[ModuleDescriptor] {
        &self.modules
    }

    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(ModuleDescriptor::name).collect()
    }

    /// Whether the module at `index` belongs to the pinned prefix
    pub fn is_pinned(&self, index: usize) -> bool {
        index < self.pinned
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Resolves a dependency graph into an install plan
pub struct Resolver<'a> {
    pinned: &'a [&'a str],
}

impl Default for Resolver<'static> {
    fn default() -> Self {
        Self::new(PINNED_PREFIX)
    }
}

impl<'a> Resolver<'a> {
    pub fn new(pinned: &'a [&'a str]) -> Self {
        Self { pinned }
    }

    /// Resolve `graph` into a plan
    ///
    /// Always returns the same plan for the same graph.
    ///
    /// # Errors
    ///
    /// See [`sort::topological_sort`].
    pub fn resolve(&self, graph: &DependencyGraph) -> Result<InstallPlan> {
        let order = sort::topological_sort(graph, self.pinned)?;
        let modules = order
            .iter()
            .filter_map(|name| graph.get(name).cloned())
            .collect();

        Ok(InstallPlan {
            modules,
            pinned: self.pinned.len(),
        })
    }
}
