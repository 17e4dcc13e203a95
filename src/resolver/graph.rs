//! DependencyGraph - a read-only view of a manifest's edges.
//!
//! Built on demand for inspection (`scopack tree`); resolution itself works
//! on the manifest directly.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::core::identifier::ResourceId;
use crate::core::Manifest;

/// Directed graph of resources, `a -> b` meaning `a` depends on `b`.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<ResourceId, ()>,

    /// Map from identifier to node index
    id_to_node: HashMap<ResourceId, NodeIndex>,

    /// Edge targets that name no resource
    dangling: HashSet<ResourceId>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph of every resource and edge in `manifest`.
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let mut graph = DependencyGraph::new();
        for resource in manifest.resources() {
            graph.add_node(resource.identifier.clone());
        }
        for edge in manifest.edges() {
            if manifest.resource(edge.to.as_str()).is_none() {
                graph.dangling.insert(edge.to.clone());
            }
            graph.add_edge(edge.from.clone(), edge.to.clone());
        }
        graph
    }

    fn add_node(&mut self, id: ResourceId) -> NodeIndex {
        if let Some(&node) = self.id_to_node.get(&id) {
            return node;
        }
        let node = self.graph.add_node(id.clone());
        self.id_to_node.insert(id, node);
        node
    }

    /// Add a dependency edge, creating missing nodes.
    pub fn add_edge(&mut self, from: ResourceId, to: ResourceId) {
        let from_node = self.add_node(from);
        let to_node = self.add_node(to);

        if !self.graph.contains_edge(from_node, to_node) {
            self.graph.add_edge(from_node, to_node, ());
        }
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_to_node.contains_key(id)
    }

    /// Whether `id` is referenced by an edge but has no resource.
    pub fn is_dangling(&self, id: &str) -> bool {
        self.dangling.contains(id)
    }

    /// Direct dependencies of `id`, in the order the edges were added.
    pub fn deps(&self, id: &str) -> Vec<&ResourceId> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Resources that depend on `id`, in the order the edges were added.
    pub fn dependents(&self, id: &str) -> Vec<&ResourceId> {
        self.neighbors(id, Direction::Incoming)
    }

    fn neighbors(&self, id: &str, direction: Direction) -> Vec<&ResourceId> {
        let Some(&node) = self.id_to_node.get(id) else {
            return Vec::new();
        };
        // petgraph walks adjacency lists newest-first
        let mut out: Vec<_> = self
            .graph
            .neighbors_directed(node, direction)
            .map(|n| &self.graph[n])
            .collect();
        out.reverse();
        out
    }

    /// Every resource reachable from `id`, excluding `id` itself.
    pub fn transitive_deps(&self, id: &str) -> HashSet<&ResourceId> {
        let mut visited: HashSet<&ResourceId> = HashSet::new();
        let mut stack = self.deps(id);

        while let Some(current) = stack.pop() {
            if current.as_str() != id && visited.insert(current) {
                stack.extend(self.deps(current.as_str()));
            }
        }

        visited
    }
}
