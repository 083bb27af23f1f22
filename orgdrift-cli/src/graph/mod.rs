//! Dependency graph logic for ordering schema objects
//!
//! This module provides functions to:
//! - Build a dependency graph from object relationship references
//! - Perform topological sort for a deterministic processing order
//! - Categorize objects as standalone, dependent, or junction
//!
//! Relationship references are weak: a reference to an object outside the
//! scanned set is dropped when the graph is built. Cycles never fail the
//! build; objects caught in one are appended after the sorted prefix.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::inventory::SchemaObject;

/// Kind of a relationship edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    Lookup,
    MasterDetail,
}

impl RelationshipKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Lookup => "lookup",
            Self::MasterDetail => "master-detail",
        }
    }
}

/// Represents the category of an object in the dependency graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyCategory {
    /// Object has no relationships to other graph objects
    Standalone,
    /// Object references exactly one other graph object
    Dependent,
    /// Object references 2+ graph objects (N:M relationship table)
    Junction,
}

impl DependencyCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Standalone => "Standalone",
            Self::Dependent => "Dependent",
            Self::Junction => "Junction",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Standalone => "○",
            Self::Dependent => "→",
            Self::Junction => "⬌",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    pub label: Option<String>,
}

/// Directed edge from the referencing object to the referenced one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
    pub kind: RelationshipKind,
}

impl GraphEdge {
    pub fn is_self_reference(&self) -> bool {
        self.from == self.to
    }
}

/// Dependency graph for a set of schema objects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// One node per input object, in input order
    pub nodes: Vec<GraphNode>,
    /// Resolved relationship edges, in input order
    pub edges: Vec<GraphEdge>,
    /// Every node name exactly once: referenced objects before the objects
    /// that reference them, cyclic leftovers last
    pub order: Vec<String>,
    /// Nodes appended to `order` because a cycle kept them from resolving,
    /// in input order
    pub unresolved: Vec<String>,
}

/// Build a dependency graph from schema objects
pub fn build_graph(objects: &[SchemaObject]) -> Graph {
    let index: HashMap<&str, usize> = objects
        .iter()
        .enumerate()
        .map(|(i, o)| (o.name.as_str(), i))
        .collect();

    let nodes: Vec<GraphNode> = objects
        .iter()
        .map(|o| GraphNode {
            name: o.name.clone(),
            label: o.label.clone(),
        })
        .collect();

    let mut edges = Vec::new();
    // Per node: pending dependency count, and the nodes waiting on it
    let mut pending = vec![0usize; objects.len()];
    let mut waiting: Vec<Vec<usize>> = vec![Vec::new(); objects.len()];

    for (from, object) in objects.iter().enumerate() {
        for lookup in &object.lookups {
            // Targets outside the scanned set are expected with partial scope
            let Some(&to) = index.get(lookup.target.as_str()) else {
                continue;
            };

            let kind = if lookup.is_master_detail {
                RelationshipKind::MasterDetail
            } else {
                RelationshipKind::Lookup
            };

            edges.push(GraphEdge {
                from: object.name.clone(),
                to: lookup.target.clone(),
                kind,
            });

            // Self-references don't block ordering
            if to != from {
                pending[from] += 1;
                waiting[to].push(from);
            }
        }
    }

    let (order, unresolved) = topological_order(objects, pending, &waiting);

    Graph {
        nodes,
        edges,
        order,
        unresolved,
    }
}

/// Kahn's algorithm with a FIFO queue seeded in input order
///
/// Returns the order and the names left over by cycles.
fn topological_order(
    objects: &[SchemaObject],
    mut pending: Vec<usize>,
    waiting: &[Vec<usize>],
) -> (Vec<String>, Vec<String>) {
    let mut queue: VecDeque<usize> = pending
        .iter()
        .enumerate()
        .filter(|(_, count)| **count == 0)
        .map(|(i, _)| i)
        .collect();

    let mut emitted = vec![false; objects.len()];
    let mut order = Vec::with_capacity(objects.len());

    while let Some(node) = queue.pop_front() {
        emitted[node] = true;
        order.push(objects[node].name.clone());

        for &dependent in &waiting[node] {
            pending[dependent] -= 1;
            if pending[dependent] == 0 {
                queue.push_back(dependent);
            }
        }
    }

    let unresolved: Vec<String> = objects
        .iter()
        .enumerate()
        .filter(|(i, _)| !emitted[*i])
        .map(|(_, o)| o.name.clone())
        .collect();

    order.extend(unresolved.iter().cloned());

    (order, unresolved)
}

impl Graph {
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.iter().any(|n| n.name == name)
    }

    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Get insert order (dependencies before dependents)
    pub fn insert_order(&self) -> &[String] {
        &self.order
    }

    /// Get delete order (dependents before dependencies - reverse of insert)
    pub fn delete_order(&self) -> Vec<String> {
        self.order.iter().rev().cloned().collect()
    }

    /// Distinct objects `name` references, excluding itself
    pub fn dependencies_of(&self, name: &str) -> Vec<&str> {
        let mut deps: Vec<&str> = Vec::new();
        for edge in self.edges.iter().filter(|e| e.from == name && !e.is_self_reference()) {
            if !deps.contains(&edge.to.as_str()) {
                deps.push(&edge.to);
            }
        }
        deps
    }

    /// Distinct objects referencing `name`, excluding itself
    pub fn dependents_of(&self, name: &str) -> Vec<&str> {
        let mut dependents: Vec<&str> = Vec::new();
        for edge in self.edges.iter().filter(|e| e.to == name && !e.is_self_reference()) {
            if !dependents.contains(&edge.from.as_str()) {
                dependents.push(&edge.from);
            }
        }
        dependents
    }

    /// Categorize an object based on its relationships
    pub fn categorize(&self, name: &str) -> DependencyCategory {
        match self.dependencies_of(name).len() {
            0 => DependencyCategory::Standalone,
            1 => DependencyCategory::Dependent,
            _ => DependencyCategory::Junction,
        }
    }

    pub fn has_cycles(&self) -> bool {
        !self.unresolved.is_empty()
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
            master_detail_edges: self
                .edges
                .iter()
                .filter(|e| e.kind == RelationshipKind::MasterDetail)
                .count(),
            unresolved: self.unresolved.len(),
        }
    }

    /// Log graph statistics; the builder itself never logs
    pub fn log_summary(&self) {
        let stats = self.stats();
        log::info!(
            "Dependency graph: {} nodes, {} edges ({} master-detail)",
            stats.nodes,
            stats.edges,
            stats.master_detail_edges
        );
        if self.has_cycles() {
            log::warn!(
                "Circular dependency detected involving: {}",
                self.unresolved.join(", ")
            );
        }
        log::debug!("Processing order: {}", self.order.join(" -> "));
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub master_detail_edges: usize,
    pub unresolved: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::RelationshipRef;

    fn make_lookup(target: &str, is_master_detail: bool) -> RelationshipRef {
        RelationshipRef {
            field: None,
            target: target.to_string(),
            is_master_detail,
        }
    }

    fn make_object(name: &str, lookups: Vec<RelationshipRef>) -> SchemaObject {
        SchemaObject {
            name: name.to_string(),
            label: Some(name.to_string()),
            lookups,
            ..Default::default()
        }
    }

    fn position(order: &[String], name: &str) -> usize {
        order.iter().position(|e| e == name).unwrap()
    }

    fn assert_permutation(graph: &Graph) {
        let mut names: Vec<_> = graph.nodes.iter().map(|n| n.name.clone()).collect();
        let mut order = graph.order.clone();
        names.sort();
        order.sort();
        assert_eq!(names, order);
    }

    #[test]
    fn test_empty_input() {
        let graph = build_graph(&[]);

        assert!(graph.nodes.is_empty());
        assert!(graph.edges.is_empty());
        assert!(graph.order.is_empty());
        assert!(!graph.has_cycles());
    }

    #[test]
    fn test_account_contact_opportunity() {
        let objects = vec![
            make_object("Account", vec![]),
            make_object("Contact", vec![make_lookup("Account", false)]),
            make_object(
                "Opportunity",
                vec![make_lookup("Account", false), make_lookup("Missing__c", true)],
            ),
        ];

        let graph = build_graph(&objects);

        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(
            graph.edges,
            vec![
                GraphEdge {
                    from: "Contact".to_string(),
                    to: "Account".to_string(),
                    kind: RelationshipKind::Lookup,
                },
                GraphEdge {
                    from: "Opportunity".to_string(),
                    to: "Account".to_string(),
                    kind: RelationshipKind::Lookup,
                },
            ]
        );
        assert!(position(&graph.order, "Account") < position(&graph.order, "Contact"));
        assert!(position(&graph.order, "Account") < position(&graph.order, "Opportunity"));
        assert_eq!(graph.order, vec!["Account", "Contact", "Opportunity"]);
    }

    #[test]
    fn test_node_labels_preserved() {
        let mut object = make_object("Invoice__c", vec![]);
        object.label = Some("Invoice".to_string());

        let graph = build_graph(&[object]);

        assert_eq!(graph.node("Invoice__c").unwrap().label.as_deref(), Some("Invoice"));
    }

    #[test]
    fn test_edges_only_between_known_nodes() {
        let objects = vec![
            make_object("Case", vec![make_lookup("User", false), make_lookup("Account", false)]),
            make_object("Account", vec![make_lookup("Territory__c", true)]),
        ];

        let graph = build_graph(&objects);

        assert_eq!(graph.edges.len(), 1);
        for edge in &graph.edges {
            assert!(graph.contains(&edge.from));
            assert!(graph.contains(&edge.to));
        }
    }

    #[test]
    fn test_master_detail_kind() {
        let objects = vec![
            make_object("Order", vec![]),
            make_object("OrderLine__c", vec![make_lookup("Order", true)]),
        ];

        let graph = build_graph(&objects);

        assert_eq!(graph.edges[0].kind, RelationshipKind::MasterDetail);
        assert_eq!(graph.stats().master_detail_edges, 1);
    }

    #[test]
    fn test_chain_ordering() {
        // Input deliberately lists dependents first
        let objects = vec![
            make_object("child", vec![make_lookup("parent", false)]),
            make_object("parent", vec![make_lookup("grandparent", false)]),
            make_object("grandparent", vec![]),
        ];

        let graph = build_graph(&objects);

        assert_eq!(graph.order, vec!["grandparent", "parent", "child"]);
        for edge in &graph.edges {
            assert!(position(&graph.order, &edge.to) < position(&graph.order, &edge.from));
        }
    }

    #[test]
    fn test_two_node_cycle_degrades() {
        let objects = vec![
            make_object("A", vec![make_lookup("B", false)]),
            make_object("B", vec![make_lookup("A", true)]),
        ];

        let graph = build_graph(&objects);

        assert_eq!(graph.order, vec!["A", "B"]);
        assert_eq!(graph.unresolved, vec!["A", "B"]);
        assert!(graph.has_cycles());
        assert_permutation(&graph);
    }

    #[test]
    fn test_cycle_members_follow_resolved_prefix() {
        let objects = vec![
            make_object("Loop1", vec![make_lookup("Loop2", false)]),
            make_object("Root", vec![]),
            make_object("Loop2", vec![make_lookup("Loop1", false), make_lookup("Root", false)]),
            make_object("Leaf", vec![make_lookup("Root", false)]),
        ];

        let graph = build_graph(&objects);

        assert_eq!(graph.order, vec!["Root", "Leaf", "Loop1", "Loop2"]);
        assert_eq!(graph.unresolved, vec!["Loop1", "Loop2"]);
    }

    #[test]
    fn test_dependents_of_cycle_are_unresolved() {
        let objects = vec![
            make_object("A", vec![make_lookup("B", false)]),
            make_object("B", vec![make_lookup("A", false)]),
            make_object("C", vec![make_lookup("A", false)]),
        ];

        let graph = build_graph(&objects);

        assert_eq!(graph.order, vec!["A", "B", "C"]);
        assert_permutation(&graph);
    }

    #[test]
    fn test_self_reference_kept_but_not_blocking() {
        let objects = vec![make_object("Account", vec![make_lookup("Account", false)])];

        let graph = build_graph(&objects);

        assert_eq!(graph.edges.len(), 1);
        assert!(graph.edges[0].is_self_reference());
        assert_eq!(graph.order, vec!["Account"]);
        assert!(!graph.has_cycles());
        assert_eq!(graph.categorize("Account"), DependencyCategory::Standalone);
    }

    #[test]
    fn test_duplicate_references_to_same_target() {
        let objects = vec![
            make_object("User", vec![]),
            make_object(
                "Case",
                vec![make_lookup("User", false), make_lookup("User", false)],
            ),
        ];

        let graph = build_graph(&objects);

        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.order, vec!["User", "Case"]);
        assert_eq!(graph.dependencies_of("Case"), vec!["User"]);
    }

    #[test]
    fn test_independent_nodes_keep_input_order() {
        let objects = vec![
            make_object("Zeta", vec![]),
            make_object("Alpha", vec![]),
            make_object("Mid", vec![]),
        ];

        let graph = build_graph(&objects);

        assert_eq!(graph.order, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_categorize() {
        let objects = vec![
            make_object("Account", vec![]),
            make_object("Contact", vec![make_lookup("Account", false)]),
            make_object(
                "AccountContactRelation",
                vec![make_lookup("Account", false), make_lookup("Contact", false)],
            ),
        ];

        let graph = build_graph(&objects);

        assert_eq!(graph.categorize("Account"), DependencyCategory::Standalone);
        assert_eq!(graph.categorize("Contact"), DependencyCategory::Dependent);
        assert_eq!(graph.categorize("AccountContactRelation"), DependencyCategory::Junction);
        assert_eq!(graph.dependents_of("Account"), vec!["Contact", "AccountContactRelation"]);
    }

    #[test]
    fn test_delete_order_reverses_insert() {
        let objects = vec![
            make_object("parent", vec![]),
            make_object("child", vec![make_lookup("parent", false)]),
        ];

        let graph = build_graph(&objects);
        let mut reversed_insert = graph.insert_order().to_vec();
        reversed_insert.reverse();

        assert_eq!(graph.delete_order(), reversed_insert);
        let delete = graph.delete_order();
        assert!(position(&delete, "child") < position(&delete, "parent"));
    }

    #[test]
    fn test_order_is_permutation_for_dense_graph() {
        let names: Vec<String> = (0..30).map(|i| format!("Obj{}", i)).collect();
        let objects: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let lookups = (0..30)
                    .filter(|j| (i * 7 + j * 3) % 5 == 0)
                    .map(|j| make_lookup(&names[j], j % 2 == 0))
                    .collect();
                make_object(name, lookups)
            })
            .collect();

        let graph = build_graph(&objects);

        assert_permutation(&graph);
        assert_eq!(graph.order.len(), 30);
    }
}
