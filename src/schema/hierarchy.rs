//! Class hierarchy built from `rdfs:subClassOf` edges.
//!
//! Edges point from subclass to superclass. Ancestors are reached by walking
//! edges forward, descendants by walking them in reverse. Both closures are
//! reflexive and tolerate cycles.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, Reversed};

/// Directed subclass graph over class IRIs.
#[derive(Debug, Clone, Default)]
pub struct ClassHierarchy {
    graph: DiGraph<String, ()>,
    node_index: HashMap<String, NodeIndex>,
}

impl ClassHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_node(&mut self, iri: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(iri) {
            return idx;
        }
        let idx = self.graph.add_node(iri.to_string());
        self.node_index.insert(iri.to_string(), idx);
        idx
    }

    /// Record `sub rdfs:subClassOf sup`.
    pub fn add_subclass(&mut self, sub: &str, sup: &str) {
        let sub_idx = self.ensure_node(sub);
        let sup_idx = self.ensure_node(sup);
        if self.graph.find_edge(sub_idx, sup_idx).is_none() {
            self.graph.add_edge(sub_idx, sup_idx, ());
        }
    }

    /// Whether the IRI takes part in any subclass relation.
    pub fn contains(&self, iri: &str) -> bool {
        self.node_index.contains_key(iri)
    }

    /// The class itself plus every transitive superclass.
    pub fn ancestors(&self, iri: &str) -> Vec<String> {
        let Some(&start) = self.node_index.get(iri) else {
            return vec![iri.to_string()];
        };
        let mut bfs = Bfs::new(&self.graph, start);
        let mut out = Vec::new();
        while let Some(idx) = bfs.next(&self.graph) {
            out.push(self.graph[idx].clone());
        }
        out
    }

    /// The class itself plus every transitive subclass.
    pub fn descendants(&self, iri: &str) -> Vec<String> {
        let Some(&start) = self.node_index.get(iri) else {
            return vec![iri.to_string()];
        };
        let reversed = Reversed(&self.graph);
        let mut bfs = Bfs::new(reversed, start);
        let mut out = Vec::new();
        while let Some(idx) = bfs.next(reversed) {
            out.push(self.graph[idx].clone());
        }
        out
    }
}
