//! Topological sort with a pinned prefix
//!
//! This module orders modules so that every dependency is installed before
//! its dependents, with a fixed list of foundational modules spliced to
//! the front.
//!
//! ## Algorithm
//!
//! Kahn's algorithm, processed in layers:
//!
//! 1. The pinned prefix is placed first, in its given order. Pinned modules
//!    count as already satisfied for every other module.
//! 2. Each remaining module starts with an in-degree equal to its number of
//!    non-pinned dependencies.
//! 3. Every module whose in-degree is zero forms the next layer. A layer is
//!    emitted in ascending name order, then the in-degree of its dependents
//!    is decremented.
//! 4. If modules remain once no layer can be formed, they are stuck behind
//!    at least one cycle.
//!
//! ## Example
//!
//! ```text
//! A (no deps), B -> A, D (no deps), C -> B, D
//!
//! layer 1: [A, D]
//! layer 2: [B]
//! layer 3: [C]
//!
//! Result: [A, D, B, C]
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::{debug, warn};

use crate::error::{Result, StackupError};
use crate::resolver::graph::DependencyGraph;
use crate::resolver::validation;

/// Compute the installation order for `graph`
///
/// # Errors
///
/// - `MissingPinnedModule` if a pinned name is absent from the graph
/// - `MissingDependency` if any module references an unknown name
/// - `Cycle` if the remaining modules cannot be ordered
pub fn topological_sort(graph: &DependencyGraph, pinned: &[&str]) -> Result<Vec<String>> {
    validation::validate_pinned(graph, pinned)?;
    validation::validate_dependencies(graph)?;

    let pinned_set: HashSet<&str> = pinned.iter().copied().collect();
    let mut order: Vec<String> = Vec::with_capacity(graph.len());
    order.extend(pinned.iter().map(|name| (*name).to_string()));

    let mut in_degree: BTreeMap<&str, usize> = BTreeMap::new();
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

    for module in graph.modules() {
        let name = module.name();
        if pinned_set.contains(name) {
            for dep in module.dependencies() {
                if !pinned_set.contains(dep.as_str()) {
                    warn!(module = name, dependency = %dep, "pinned module depends on a non-pinned module; ignoring");
                }
            }
            continue;
        }

        let mut count = 0;
        for dep in module.dependencies() {
            if pinned_set.contains(dep.as_str()) {
                continue;
            }
            count += 1;
            dependents.entry(dep.as_str()).or_default().push(name);
        }
        in_degree.insert(name, count);
    }

    let mut layer: Vec<&str> = in_degree
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(name, _)| *name)
        .collect();

    while !layer.is_empty() {
        debug!(layer = ?layer, "resolved layer");
        let mut next = Vec::new();
        for name in &layer {
            in_degree.remove(name);
            order.push((*name).to_string());

            for dependent in dependents.get(name).into_iter().flatten() {
                if let Some(count) = in_degree.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        next.push(*dependent);
                    }
                }
            }
        }
        next.sort_unstable();
        layer = next;
    }

    if !in_degree.is_empty() {
        let stuck: BTreeSet<&str> = in_degree.keys().copied().collect();
        return Err(StackupError::Cycle {
            modules: cycle_members(graph, stuck),
        });
    }

    Ok(order)
}

/// Narrow a stuck set down towards the modules that actually form cycles
///
/// Modules that are only stuck because they depend on a cycle have no
/// dependent inside the stuck set; they are peeled off until none remain.
fn cycle_members(graph: &DependencyGraph, mut stuck: BTreeSet<&str>) -> Vec<String> {
    loop {
        let leaves: Vec<&str> = stuck
            .iter()
            .copied()
            .filter(|name| {
                !stuck.iter().any(|other| {
                    graph
                        .dependencies_of(other)
                        .is_some_and(|deps| deps.contains(*name))
                })
            })
            .collect();

        if leaves.is_empty() {
            break;
        }
        for leaf in leaves {
            stuck.remove(leaf);
        }
    }

    stuck.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
#[allow(clippy::expect_used)]
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

    fn position(order: &[String], name: &str) -> usize {
        order
            .iter()
            .position(|n| n == name)
            .expect("module should be in the order")
    }

    #[test]
    fn test_topological_sort_diamond_without_pins() {
        let graph = graph(&[("A", &[]), ("B", &["A"]), ("D", &[]), ("C", &["B", "D"])]);

        let order = topological_sort(&graph, &[]).expect("sort should succeed");

        assert_eq!(order, vec!["A", "D", "B", "C"]);
        assert!(position(&order, "A") < position(&order, "B"));
        assert!(position(&order, "B") < position(&order, "C"));
        assert!(position(&order, "D") < position(&order, "C"));
    }

    #[test]
    fn test_topological_sort_transitive_deps() {
        let graph = graph(&[("b", &[]), ("c", &["b"]), ("d", &["c"])]);

        let order = topological_sort(&graph, &[]).expect("sort should succeed");

        assert_eq!(order, vec!["b", "c", "d"]);
    }

    #[test]
    fn test_pinned_prefix_comes_first_in_fixed_order() {
        let graph = graph(&[
            ("aaa", &[]),
            ("core", &[]),
            ("base", &[]),
            ("api", &["core", "base"]),
        ]);

        let order = topological_sort(&graph, &["core", "base"]).expect("sort should succeed");

        assert_eq!(order, vec!["core", "base", "aaa", "api"]);
    }

    #[test]
    fn test_pinned_modules_ignore_their_own_dependencies() {
        let graph = graph(&[("core", &["util"]), ("util", &[])]);

        let order = topological_sort(&graph, &["core"]).expect("sort should succeed");

        assert_eq!(order, vec!["core", "util"]);
    }

    #[test]
    fn test_explicit_dependency_on_pinned_module_is_satisfied() {
        let graph = graph(&[("core", &[]), ("api", &["core"]), ("web", &["api", "core"])]);

        let order = topological_sort(&graph, &["core"]).expect("sort should succeed");

        assert_eq!(order, vec!["core", "api", "web"]);
    }

    #[test]
    fn test_missing_pinned_module() {
        let graph = graph(&[("api", &[])]);

        let result = topological_sort(&graph, &["core"]);

        assert!(matches!(
            result,
            Err(StackupError::MissingPinnedModule { ref name }) if name == "core"
        ));
    }

    #[test]
    fn test_cycle_detection_names_exact_cycle() {
        let graph = graph(&[("A", &["B"]), ("B", &["C"]), ("C", &["A"])]);

        match topological_sort(&graph, &[]) {
            Err(StackupError::Cycle { modules }) => assert_eq!(modules, vec!["A", "B", "C"]),
            other => panic!("expected Cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_cycle_detection_drops_modules_hanging_off_the_cycle() {
        let graph = graph(&[
            ("A", &["B"]),
            ("B", &["A"]),
            ("X", &["A"]),
            ("Y", &["X"]),
            ("ok", &[]),
        ]);

        match topological_sort(&graph, &[]) {
            Err(StackupError::Cycle { modules }) => assert_eq!(modules, vec!["A", "B"]),
            other => panic!("expected Cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let graph = graph(&[("A", &["A"])]);

        match topological_sort(&graph, &[]) {
            Err(StackupError::Cycle { modules }) => assert_eq!(modules, vec!["A"]),
            other => panic!("expected Cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_dependency_is_not_reported_as_cycle() {
        let graph = graph(&[("A", &["Z"]), ("B", &["C"]), ("C", &["B"])]);

        match topological_sort(&graph, &[]) {
            Err(StackupError::MissingDependency { module, dependency }) => {
                assert_eq!(module, "A");
                assert_eq!(dependency, "Z");
            }
            other => panic!("expected MissingDependency, got {other:?}"),
        }
    }

    #[test]
    fn test_sort_is_deterministic() {
        let graph = graph(&[
            ("web", &["api"]),
            ("api", &["db", "cache"]),
            ("db", &[]),
            ("cache", &[]),
            ("cli", &[]),
            ("core", &[]),
        ]);

        let first = topological_sort(&graph, &["core"]).expect("sort should succeed");
        for _ in 0..10 {
            let again = topological_sort(&graph, &["core"]).expect("sort should succeed");
            assert_eq!(first, again);
        }
        assert_eq!(first, vec!["core", "cache", "cli", "db", "api", "web"]);
    }

    #[test]
    fn test_every_module_follows_its_dependencies() {
        let graph = graph(&[
            ("m1", &[]),
            ("m2", &["m1"]),
            ("m3", &["m1", "m2"]),
            ("m4", &["m3"]),
            ("m5", &["m2", "m4"]),
            ("m6", &[]),
            ("m7", &["m6", "m5"]),
        ]);

        let order = topological_sort(&graph, &[]).expect("sort should succeed");

        assert_eq!(order.len(), 7);
        for module in graph.modules() {
            for dep in module.dependencies() {
                assert!(
                    position(&order, dep) < position(&order, module.name()),
                    "{dep} should precede {}",
                    module.name()
                );
            }
        }
    }
}
