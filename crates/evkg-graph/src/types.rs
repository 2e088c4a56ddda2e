//! Core graph types for entity co-occurrence.
//!
//! Nodes are entity names; an undirected edge joins two entities that appear
//! in the same event and accumulates what those shared events say.

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// GraphConfig
// ============================================================================

/// Graph view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Edges lighter than this are pruned before analysis.
    #[serde(default = "default_min_edge_weight")]
    pub min_edge_weight: u32,

    /// Rows in the centrality table.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Titles listed in an edge tooltip.
    #[serde(default = "default_max_titles")]
    pub max_titles: usize,
}

fn default_min_edge_weight() -> u32 {
    1
}

fn default_top_n() -> usize {
    15
}

fn default_max_titles() -> usize {
    12
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            min_edge_weight: default_min_edge_weight(),
            top_n: default_top_n(),
            max_titles: default_max_titles(),
        }
    }
}

// ============================================================================
// EntityNode
// ============================================================================

/// An entity in the co-occurrence graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityNode {
    /// Entity name, also the node's unique ID.
    pub id: String,
    /// Number of multi-entity events mentioning this entity.
    pub mentions: usize,
}

impl EntityNode {
    /// Creates a node with no recorded mentions.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            mentions: 0,
        }
    }
}

// ============================================================================
// CooccurrenceEdge
// ============================================================================

/// Accumulated evidence that two entities appear together.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CooccurrenceEdge {
    /// Lexicographically smaller endpoint.
    pub source: String,
    /// Lexicographically larger endpoint.
    pub target: String,
    /// Number of shared events.
    pub weight: u32,
    /// Sentiment of each shared event.
    pub sentiments: Vec<f64>,
    /// Event types of all shared events, with repeats.
    pub event_types: Vec<String>,
    /// Titles of shared events in the order they were seen.
    pub event_titles: Vec<String>,
    /// Mean of `sentiments`, computed once the graph is complete.
    pub mean_sentiment: f64,
}

impl CooccurrenceEdge {
    /// Creates an edge with no recorded events.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight: 0,
            sentiments: Vec::new(),
            event_types: Vec::new(),
            event_titles: Vec::new(),
            mean_sentiment: 0.0,
        }
    }

    /// Records one more shared event.
    pub fn record(&mut self, sentiment: f64, event_types: &[String], title: &str) {
        self.weight += 1;
        self.sentiments.push(sentiment);
        self.event_types.extend(event_types.iter().cloned());
        self.event_titles.push(title.to_string());
    }

    /// Recomputes `mean_sentiment` from `sentiments`.
    pub fn finalize(&mut self) {
        self.mean_sentiment = if self.sentiments.is_empty() {
            0.0
        } else {
            self.sentiments.iter().sum::<f64>() / self.sentiments.len() as f64
        };
    }

    /// Distinct event types, sorted.
    pub fn distinct_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.event_types.iter().map(String::as_str).collect();
        types.sort_unstable();
        types.dedup();
        types
    }
}

// ============================================================================
// GraphData
// ============================================================================

/// Core graph data structure.
///
/// Wraps a petgraph `UnGraph` with a name → index lookup. Node indices follow
/// insertion order, which downstream tables rely on for stable ordering.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
    /// The underlying undirected graph.
    pub graph: UnGraph<EntityNode, CooccurrenceEdge>,
    /// Lookup table: entity name → petgraph NodeIndex.
    pub node_indices: HashMap<String, NodeIndex>,
}

impl GraphData {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Gets a node by entity name.
    pub fn get_node(&self, id: &str) -> Option<&EntityNode> {
        self.get_index(id).map(|idx| &self.graph[idx])
    }

    /// Gets the petgraph NodeIndex for an entity name.
    pub fn get_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_indices.get(id).copied()
    }

    /// Checks if a node exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    /// Nodes in insertion order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &EntityNode> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// Edges in insertion order.
    pub fn iter_edges(&self) -> impl Iterator<Item = &CooccurrenceEdge> {
        self.graph.edge_indices().map(move |idx| &self.graph[idx])
    }

    /// Number of distinct neighbours of a node.
    pub fn degree(&self, id: &str) -> usize {
        self.get_index(id)
            .map(|idx| self.graph.edges(idx).count())
            .unwrap_or(0)
    }

    /// Gets the edge between two entities, in either orientation.
    pub fn get_edge(&self, a: &str, b: &str) -> Option<&CooccurrenceEdge> {
        let idx = self.find_edge(a, b)?;
        Some(&self.graph[idx])
    }

    fn find_edge(&self, a: &str, b: &str) -> Option<EdgeIndex> {
        let a = self.get_index(a)?;
        let b = self.get_index(b)?;
        self.graph.find_edge(a, b)
    }

    /// Adds a node, returning the existing index if the name is known.
    pub fn add_node(&mut self, node: EntityNode) -> NodeIndex {
        if let Some(&existing_idx) = self.node_indices.get(&node.id) {
            return existing_idx;
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.node_indices.insert(id, idx);
        idx
    }

    /// Returns the edge between `a` and `b`, creating it if needed.
    ///
    /// Both nodes must already exist.
    pub fn edge_mut(&mut self, a: &str, b: &str) -> evkg_core::Result<&mut CooccurrenceEdge> {
        let a_idx = self
            .get_index(a)
            .ok_or_else(|| evkg_core::Error::not_found("node", a))?;
        let b_idx = self
            .get_index(b)
            .ok_or_else(|| evkg_core::Error::not_found("node", b))?;

        let idx = match self.graph.find_edge(a_idx, b_idx) {
            Some(idx) => idx,
            None => {
                let (source, target) = if a <= b { (a, b) } else { (b, a) };
                self.graph
                    .add_edge(a_idx, b_idx, CooccurrenceEdge::new(source, target))
            }
        };
        Ok(&mut self.graph[idx])
    }

    /// Returns a copy without edges lighter than `min_weight` and without
    /// nodes left isolated.
    ///
    /// Node and edge order is preserved.
    pub fn pruned(&self, min_weight: u32) -> GraphData {
        let mut out = GraphData::new();

        let kept_edges: Vec<EdgeIndex> = self
            .graph
            .edge_indices()
            .filter(|&idx| self.graph[idx].weight >= min_weight)
            .collect();

        let mut connected = vec![false; self.graph.node_count()];
        for &idx in &kept_edges {
            if let Some((a, b)) = self.graph.edge_endpoints(idx) {
                connected[a.index()] = true;
                connected[b.index()] = true;
            }
        }

        for idx in self.graph.node_indices() {
            if connected[idx.index()] {
                out.add_node(self.graph[idx].clone());
            }
        }

        for idx in kept_edges {
            let edge = &self.graph[idx];
            if let (Some(a), Some(b)) = (out.get_index(&edge.source), out.get_index(&edge.target)) {
                out.graph.add_edge(a, b, edge.clone());
            }
        }

        out
    }

    /// Replaces this graph with [`pruned`](Self::pruned).
    pub fn prune(&mut self, min_weight: u32) {
        *self = self.pruned(min_weight);
    }

    /// Neighbour names of an entity, with the connecting edge.
    pub fn neighbors(&self, id: &str) -> Vec<(&EntityNode, &CooccurrenceEdge)> {
        let Some(idx) = self.get_index(id) else {
            return Vec::new();
        };
        self.graph
            .edges(idx)
            .map(|e| {
                let other = if e.source() == idx { e.target() } else { e.source() };
                (&self.graph[other], e.weight())
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
