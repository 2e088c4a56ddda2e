//! Centrality analysis for co-occurrence graphs.
//!
//! Provides:
//! - Degree centrality (neighbour count over `n - 1`)
//! - Betweenness centrality (Brandes, unweighted, normalized)
//! - Eigenvector centrality (power iteration)
//! - A ranked table combining all three
//!
//! Score vectors are indexed by petgraph `NodeIndex::index()`, which for a
//! freshly built or pruned [`GraphData`] is node insertion order.

use std::collections::VecDeque;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::GraphData;

/// Iteration cap for eigenvector centrality.
pub const EIGENVECTOR_MAX_ITER: usize = 1000;

/// Per-node convergence tolerance for eigenvector centrality.
pub const EIGENVECTOR_TOLERANCE: f64 = 1.0e-6;

// ============================================================================
// Result types
// ============================================================================

/// One row of the centrality table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CentralityRow {
    /// Entity name.
    pub entity: String,
    /// Degree centrality (0.0 to 1.0).
    pub degree: f64,
    /// Normalized betweenness centrality.
    pub betweenness: f64,
    /// Eigenvector centrality (unit L2 norm across the graph).
    pub eigenvector: f64,
    /// Number of neighbours.
    pub degree_raw: usize,
}

/// All centrality scores of a graph, indexed by node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Centralities {
    /// Degree centrality per node.
    pub degree: Vec<f64>,
    /// Betweenness centrality per node.
    pub betweenness: Vec<f64>,
    /// Eigenvector centrality per node (zeros when iteration did not converge).
    pub eigenvector: Vec<f64>,
}

impl Centralities {
    /// Computes every centrality for `graph`.
    pub fn compute(graph: &GraphData) -> Self {
        Self::compute_with(graph, EIGENVECTOR_MAX_ITER)
    }

    /// Computes every centrality, capping eigenvector iteration at
    /// `max_iter`. A non-converging eigenvector scores zero everywhere.
    pub fn compute_with(graph: &GraphData, max_iter: usize) -> Self {
        let eigenvector = eigenvector_centrality_with(graph, max_iter).unwrap_or_else(|| {
            log::warn!(
                "Eigenvector centrality did not converge in {max_iter} iterations; using zeros"
            );
            vec![0.0; graph.node_count()]
        });

        Self {
            degree: degree_centrality(graph),
            betweenness: betweenness_centrality(graph),
            eigenvector,
        }
    }

    /// Scores of the node at `idx`, as `(degree, betweenness, eigenvector)`.
    pub fn scores(&self, idx: NodeIndex) -> (f64, f64, f64) {
        let i = idx.index();
        (
            self.degree.get(i).copied().unwrap_or(0.0),
            self.betweenness.get(i).copied().unwrap_or(0.0),
            self.eigenvector.get(i).copied().unwrap_or(0.0),
        )
    }
}

// ============================================================================
// Algorithms
// ============================================================================

fn neighbor_lists(graph: &GraphData) -> Vec<Vec<usize>> {
    graph
        .graph
        .node_indices()
        .map(|idx| graph.graph.neighbors(idx).map(|n| n.index()).collect())
        .collect()
}

/// Degree centrality: neighbour count divided by `n - 1`.
///
/// A single-node graph scores 1.0, an empty graph yields an empty vector.
pub fn degree_centrality(graph: &GraphData) -> Vec<f64> {
    let n = graph.node_count();
    if n <= 1 {
        return vec![1.0; n];
    }
    let scale = 1.0 / (n - 1) as f64;
    neighbor_lists(graph)
        .iter()
        .map(|nbrs| nbrs.len() as f64 * scale)
        .collect()
}

/// Betweenness centrality using Brandes' algorithm on the unweighted graph.
///
/// Each unordered pair is counted from both endpoints, and the sum is scaled
/// by `1 / ((n - 1)(n - 2))`, which equals the usual normalization
/// `2 / ((n - 1)(n - 2))` for undirected graphs. Graphs with two or fewer
/// nodes are returned unscaled (all zeros).
pub fn betweenness_centrality(graph: &GraphData) -> Vec<f64> {
    let n = graph.node_count();
    let adj = neighbor_lists(graph);
    let mut centrality = vec![0.0; n];

    for s in 0..n {
        let mut stack: Vec<usize> = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0_f64; n];
        let mut dist: Vec<Option<usize>> = vec![None; n];
        sigma[s] = 1.0;
        dist[s] = Some(0);

        let mut queue = VecDeque::from([s]);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            let dv = dist[v].unwrap_or(0);
            for &w in &adj[v] {
                if dist[w].is_none() {
                    dist[w] = Some(dv + 1);
                    queue.push_back(w);
                }
                if dist[w] == Some(dv + 1) {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        let mut delta = vec![0.0_f64; n];
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != s {
                centrality[w] += delta[w];
            }
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for c in &mut centrality {
            *c *= scale;
        }
    }

    centrality
}

/// Eigenvector centrality by power iteration.
///
/// Iterates `x ← (A + I) x`, normalizing to unit L2 norm, from a uniform
/// start. Converges when the L1 change falls below `n * 1e-6`. Returns
/// `None` if that does not happen within [`EIGENVECTOR_MAX_ITER`] rounds,
/// and an empty vector for an empty graph.
pub fn eigenvector_centrality(graph: &GraphData) -> Option<Vec<f64>> {
    eigenvector_centrality_with(graph, EIGENVECTOR_MAX_ITER)
}

/// [`eigenvector_centrality`] with an explicit iteration cap.
pub fn eigenvector_centrality_with(graph: &GraphData, max_iter: usize) -> Option<Vec<f64>> {
    let n = graph.node_count();
    if n == 0 {
        return Some(Vec::new());
    }

    let adj = neighbor_lists(graph);
    let mut x = vec![1.0 / n as f64; n];

    for _ in 0..max_iter {
        let last = x.clone();
        for (v, nbrs) in adj.iter().enumerate() {
            for &w in nbrs {
                x[w] += last[v];
            }
        }

        let norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
        let norm = if norm == 0.0 { 1.0 } else { norm };
        for v in &mut x {
            *v /= norm;
        }

        let change: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if change < n as f64 * EIGENVECTOR_TOLERANCE {
            return Some(x);
        }
    }

    None
}

/// The `top_n` entities ranked by degree centrality, descending.
///
/// Ties keep node insertion order.
pub fn top_centralities(graph: &GraphData, top_n: usize) -> Vec<CentralityRow> {
    if graph.is_empty() {
        return Vec::new();
    }

    let centralities = Centralities::compute(graph);
    let mut rows: Vec<CentralityRow> = graph
        .graph
        .node_indices()
        .map(|idx| {
            let (degree, betweenness, eigenvector) = centralities.scores(idx);
            CentralityRow {
                entity: graph.graph[idx].id.clone(),
                degree,
                betweenness,
                eigenvector,
                degree_raw: graph.graph.neighbors(idx).count(),
            }
        })
        .collect();

    // sort_by is stable, so equal degrees stay in insertion order.
    rows.sort_by(|a, b| b.degree.total_cmp(&a.degree));
    rows.truncate(top_n);
    rows
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::EntityNode;

    fn graph_from(edges: &[(&str, &str)]) -> GraphData {
        let mut g = GraphData::new();
        for (a, b) in edges {
            g.add_node(EntityNode::new(*a));
            g.add_node(EntityNode::new(*b));
            g.edge_mut(a, b).unwrap().record(0.0, &[], "t");
        }
        g
    }

    fn path3() -> GraphData {
        graph_from(&[("a", "b"), ("b", "c")])
    }

    fn star() -> GraphData {
        graph_from(&[("hub", "x"), ("hub", "y"), ("hub", "z")])
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    // ------------------------------------------------------------------------
    // Degree
    // ------------------------------------------------------------------------

    #[test]
    fn test_degree_path() {
        let d = degree_centrality(&path3());
        assert_eq!(d, vec![0.5, 1.0, 0.5]);
    }

    #[test]
    fn test_degree_trivial_graphs() {
        assert!(degree_centrality(&GraphData::new()).is_empty());

        let mut single = GraphData::new();
        single.add_node(EntityNode::new("only"));
        assert_eq!(degree_centrality(&single), vec![1.0]);
    }

    // ------------------------------------------------------------------------
    // Betweenness
    // ------------------------------------------------------------------------

    #[test]
    fn test_betweenness_path() {
        let b = betweenness_centrality(&path3());
        assert!(approx(b[0], 0.0));
        assert!(approx(b[1], 1.0));
        assert!(approx(b[2], 0.0));
    }

    #[test]
    fn test_betweenness_star() {
        let b = betweenness_centrality(&star());
        // hub lies on all 3 leaf-to-leaf shortest paths; normalization 2/(3*2).
        assert!(approx(b[0], 1.0));
        assert!(b[1..].iter().all(|v| approx(*v, 0.0)));
    }

    #[test]
    fn test_betweenness_split_paths() {
        // Square a-b-d-c-a: between a and d there are two shortest paths.
        let g = graph_from(&[("a", "b"), ("b", "d"), ("d", "c"), ("c", "a")]);
        let b = betweenness_centrality(&g);
        // Each node carries half of one opposite pair: 0.5 * 2/(3*2).
        for v in b {
            assert!(approx(v, 1.0 / 6.0));
        }
    }

    #[test]
    fn test_betweenness_two_nodes() {
        let g = graph_from(&[("a", "b")]);
        assert_eq!(betweenness_centrality(&g), vec![0.0, 0.0]);
    }

    // ------------------------------------------------------------------------
    // Eigenvector
    // ------------------------------------------------------------------------

    #[test]
    fn test_eigenvector_path() {
        let e = eigenvector_centrality(&path3()).unwrap();
        // Principal eigenvector of a 3-path: (1, sqrt 2, 1) / 2.
        assert!((e[0] - 0.5).abs() < 1e-3);
        assert!((e[1] - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-3);
        assert!((e[2] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_eigenvector_unit_norm() {
        let e = eigenvector_centrality(&star()).unwrap();
        let norm: f64 = e.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!(approx(norm, 1.0));
        assert!(e[0] > e[1]);
    }

    #[test]
    fn test_eigenvector_iteration_cap() {
        assert_eq!(eigenvector_centrality_with(&path3(), 0), None);
        assert!(eigenvector_centrality_with(&path3(), EIGENVECTOR_MAX_ITER).is_some());
    }

    #[test]
    fn test_non_converging_eigenvector_scores_zero() {
        let c = Centralities::compute_with(&path3(), 0);
        assert_eq!(c.eigenvector, vec![0.0; 3]);
        assert_eq!(c.degree, degree_centrality(&path3()));
        assert_eq!(c.betweenness, betweenness_centrality(&path3()));
    }

    #[test]
    fn test_eigenvector_empty() {
        assert_eq!(eigenvector_centrality(&GraphData::new()), Some(Vec::new()));
    }

    // ------------------------------------------------------------------------
    // Table
    // ------------------------------------------------------------------------

    #[test]
    fn test_top_centralities_sorted() {
        let rows = top_centralities(&star(), 15);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].entity, "hub");
        assert_eq!(rows[0].degree_raw, 3);
        assert!(approx(rows[0].degree, 1.0));
        // Leaves tie on degree and keep insertion order.
        let leaves: Vec<&str> = rows[1..].iter().map(|r| r.entity.as_str()).collect();
        assert_eq!(leaves, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_top_centralities_truncates() {
        assert_eq!(top_centralities(&star(), 2).len(), 2);
        assert!(top_centralities(&GraphData::new(), 5).is_empty());
    }

    #[test]
    fn test_centralities_scores_out_of_range() {
        let c = Centralities::default();
        assert_eq!(c.scores(NodeIndex::new(7)), (0.0, 0.0, 0.0));
    }
}
