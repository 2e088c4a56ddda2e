//! GraphBuilder for constructing co-occurrence graphs.
//!
//! The builder walks the event table once:
//!
//! 1. Skip events naming fewer than two entities
//! 2. Add every distinct entity of the event as a node (first-seen order)
//! 3. Record the event on the edge of every unordered pair of distinct
//!    entities, pairs taken in lexicographic order
//! 4. Finalize mean sentiments, then prune edges below the weight threshold
//!    together with the nodes they leave isolated

use std::collections::BTreeSet;

use evkg_content::EventTable;
use evkg_core::Result;

use crate::{EntityNode, GraphData};

/// Statistics from a graph build operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Events that contributed to the graph.
    pub events_used: usize,
    /// Events skipped for naming fewer than two entities.
    pub events_skipped: usize,
    /// Nodes before pruning.
    pub nodes_created: usize,
    /// Edges before pruning.
    pub edges_created: usize,
    /// Nodes removed by pruning.
    pub nodes_pruned: usize,
    /// Edges removed by pruning.
    pub edges_pruned: usize,
}

/// Builder for co-occurrence graphs.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    min_edge_weight: u32,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self { min_edge_weight: 1 }
    }
}

impl GraphBuilder {
    /// Creates a builder with a minimum edge weight of 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum edge weight kept after building.
    pub fn with_min_edge_weight(mut self, min_edge_weight: u32) -> Self {
        self.min_edge_weight = min_edge_weight;
        self
    }

    /// Builds the graph from the rows of `table`, then prunes it.
    ///
    /// Pruning always runs, so even with the default threshold of 1 entities
    /// without any co-occurrence are dropped.
    pub fn build(&self, table: &EventTable) -> Result<(GraphData, BuildStats)> {
        let (mut graph, mut stats) = build_unpruned(table)?;

        graph.prune(self.min_edge_weight);
        stats.nodes_pruned = stats.nodes_created - graph.node_count();
        stats.edges_pruned = stats.edges_created - graph.edge_count();

        log::info!(
            "Built co-occurrence graph: {} nodes, {} edges ({} events used, {} skipped, {} edges pruned)",
            graph.node_count(),
            graph.edge_count(),
            stats.events_used,
            stats.events_skipped,
            stats.edges_pruned
        );

        Ok((graph, stats))
    }
}

/// Builds a graph from `table` keeping every node and edge.
pub fn build_cooccurrence_graph(table: &EventTable) -> Result<GraphData> {
    build_unpruned(table).map(|(graph, _)| graph)
}

fn build_unpruned(table: &EventTable) -> Result<(GraphData, BuildStats)> {
    let mut graph = GraphData::new();
    let mut stats = BuildStats::default();

    for record in table {
        if record.entity_names.len() < 2 {
            stats.events_skipped += 1;
            continue;
        }
        stats.events_used += 1;

        let mut seen = BTreeSet::new();
        for name in &record.entity_names {
            if seen.insert(name.as_str()) {
                let idx = graph.add_node(EntityNode::new(name.as_str()));
                graph.graph[idx].mentions += 1;
            }
        }

        // BTreeSet iteration is already sorted, so (a, b) has a < b.
        let distinct: Vec<&str> = seen.into_iter().collect();
        for (i, a) in distinct.iter().enumerate() {
            for b in &distinct[i + 1..] {
                graph
                    .edge_mut(a, b)?
                    .record(record.sentiment, &record.event_types, &record.title);
            }
        }
    }

    for edge in graph.graph.edge_weights_mut() {
        edge.finalize();
    }

    stats.nodes_created = graph.node_count();
    stats.edges_created = graph.edge_count();

    Ok((graph, stats))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use evkg_content::{EventRecord, Granularity};

    fn record(title: &str, names: &[&str], sentiment: f64, types: &[&str]) -> EventRecord {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        EventRecord {
            id: 0,
            title: title.into(),
            location: String::new(),
            date,
            month: Granularity::Month.period_start(date),
            week: Granularity::Week.period_start(date),
            entity_names: names.iter().map(|s| s.to_string()).collect(),
            entity_tags: Vec::new(),
            sentiment,
            event_types: types.iter().map(|s| s.to_string()).collect(),
            coordinates: None,
            raw: serde_json::Value::Null,
        }
    }

    fn table() -> EventTable {
        EventTable::from_records(vec![
            record("e1", &["UN", "EU", "NATO"], 2.0, &["Treaty"]),
            record("e2", &["EU", "UN"], -1.0, &["Sanctions"]),
            record("e3", &["Solo"], 5.0, &["Aid"]),
            record("e4", &["Russia", "Russia"], 0.0, &[]),
            record("e5", &[], 0.0, &[]),
        ])
    }

    #[test]
    fn test_build_counts() {
        let (graph, stats) = GraphBuilder::new().build(&table()).unwrap();

        assert_eq!(stats.events_used, 3);
        assert_eq!(stats.events_skipped, 2);
        // Russia repeats itself: a node but no edge, so pruning drops it.
        assert_eq!(stats.nodes_created, 4);
        assert_eq!(stats.nodes_pruned, 1);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert!(!graph.contains_node("Russia"));
    }

    #[test]
    fn test_first_seen_node_order() {
        let graph = build_cooccurrence_graph(&table()).unwrap();
        let ids: Vec<&str> = graph.iter_nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["UN", "EU", "NATO", "Russia"]);
    }

    #[test]
    fn test_edge_accumulation() {
        let graph = build_cooccurrence_graph(&table()).unwrap();
        let edge = graph.get_edge("UN", "EU").unwrap();

        assert_eq!(edge.source, "EU");
        assert_eq!(edge.target, "UN");
        assert_eq!(edge.weight, 2);
        assert_eq!(edge.sentiments, vec![2.0, -1.0]);
        assert_eq!(edge.mean_sentiment, 0.5);
        assert_eq!(edge.event_types, vec!["Treaty", "Sanctions"]);
        assert_eq!(edge.event_titles, vec!["e1", "e2"]);
        assert_eq!(graph.get_node("UN").unwrap().mentions, 2);
    }

    #[test]
    fn test_min_edge_weight_prunes() {
        let (graph, stats) = GraphBuilder::new()
            .with_min_edge_weight(2)
            .build(&table())
            .unwrap();

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(stats.edges_pruned, 2);
        assert_eq!(stats.nodes_pruned, 2);
        assert!(graph.contains_node("UN"));
        assert!(graph.contains_node("EU"));
    }

    #[test]
    fn test_empty_table() {
        let (graph, stats) = GraphBuilder::new().build(&EventTable::default()).unwrap();
        assert!(graph.is_empty());
        assert_eq!(stats, BuildStats::default());
    }
}
