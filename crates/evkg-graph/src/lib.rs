//! Entity co-occurrence graph for evkg.
//!
//! Two entities are linked when they are named by the same event. Edges
//! accumulate the shared events' sentiments, types and titles; the graph is
//! then pruned, ranked by centrality and rendered as a vis-network page.
//!
//! # Modules
//!
//! - [`types`]: `GraphData`, `EntityNode`, `CooccurrenceEdge`, `GraphConfig`
//! - [`builder`]: Construction from an event table
//! - [`algorithms`]: Degree, betweenness and eigenvector centrality
//! - [`render`]: vis-network JSON and HTML artifacts
//!
//! # Example
//!
//! ```
//! use evkg_content::EventTable;
//! use evkg_graph::{GraphBuilder, top_centralities};
//!
//! let table = EventTable::default();
//! let (graph, _stats) = GraphBuilder::new().build(&table).unwrap();
//! assert!(top_centralities(&graph, 15).is_empty());
//! ```

pub mod algorithms;
pub mod builder;
pub mod render;
pub mod types;

// Re-exports - types
pub use types::{CooccurrenceEdge, EntityNode, GraphConfig, GraphData};

// Re-exports - builder
pub use builder::{BuildStats, GraphBuilder, build_cooccurrence_graph};

// Re-exports - algorithms
pub use algorithms::{
    Centralities, CentralityRow, betweenness_centrality, degree_centrality,
    eigenvector_centrality, eigenvector_centrality_with, top_centralities,
};

// Re-exports - render
pub use render::{
    GraphArtifacts, VisEdge, VisNetwork, VisNode, edge_color, edge_width, node_value,
    render_html, to_vis_network, write_graph_artifacts,
};
