//! vis-network artifacts for the co-occurrence graph.
//!
//! [`to_vis_network`] turns a [`GraphData`] into the `{ nodes, edges, options }`
//! document vis-network consumes, and [`render_html`] wraps it in a standalone
//! dark-themed page that loads vis-network from a CDN.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use evkg_core::{Result, escape_html, script_json, write_artifact};

use crate::algorithms::Centralities;
use crate::{CooccurrenceEdge, GraphConfig, GraphData};

/// Page background.
pub const BACKGROUND_COLOR: &str = "#0b0f19";
/// Edge colour when mean sentiment is above [`SENTIMENT_THRESHOLD`].
pub const POSITIVE_COLOR: &str = "#2ecc71";
/// Edge colour when mean sentiment is below `-SENTIMENT_THRESHOLD`.
pub const NEGATIVE_COLOR: &str = "#e74c3c";
/// Edge colour otherwise.
pub const NEUTRAL_COLOR: &str = "#95a5a6";
/// Mean sentiment beyond which an edge is coloured.
pub const SENTIMENT_THRESHOLD: f64 = 1.0;

/// File name of the vis-network JSON document.
pub const GRAPH_JSON_FILE: &str = "graph.json";
/// File name of the graph HTML page.
pub const GRAPH_HTML_FILE: &str = "graph.html";

const VIS_NETWORK_CDN: &str =
    "https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js";

/// A node as vis-network expects it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisNode {
    /// Entity name.
    pub id: String,
    /// Displayed label.
    pub label: String,
    /// HTML tooltip.
    pub title: String,
    /// Size driver, `12 + degree * 70`.
    pub value: f64,
}

/// An edge as vis-network expects it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisEdge {
    /// Source entity.
    pub from: String,
    /// Target entity.
    pub to: String,
    /// Co-occurrence count.
    pub value: u32,
    /// Line width.
    pub width: u32,
    /// Line colour.
    pub color: String,
    /// HTML tooltip.
    pub title: String,
}

/// A complete vis-network document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisNetwork {
    /// Nodes in graph insertion order.
    pub nodes: Vec<VisNode>,
    /// Edges in graph insertion order.
    pub edges: Vec<VisEdge>,
    /// Network options (physics, fonts).
    pub options: Value,
}

/// Paths of the written graph artifacts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphArtifacts {
    /// vis-network JSON document.
    pub json: PathBuf,
    /// Standalone HTML page.
    pub html: PathBuf,
}

/// Colour for an edge with the given mean sentiment.
pub fn edge_color(mean_sentiment: f64) -> &'static str {
    if mean_sentiment > SENTIMENT_THRESHOLD {
        POSITIVE_COLOR
    } else if mean_sentiment < -SENTIMENT_THRESHOLD {
        NEGATIVE_COLOR
    } else {
        NEUTRAL_COLOR
    }
}

/// Line width for an edge of the given weight, capped at 11.
pub fn edge_width(weight: u32) -> u32 {
    1 + weight.min(10)
}

/// Node size for the given degree centrality.
pub fn node_value(degree: f64) -> f64 {
    12.0 + degree * 70.0
}

fn physics_options() -> Value {
    json!({
        "nodes": { "font": { "color": "white" } },
        "physics": {
            "solver": "barnesHut",
            "barnesHut": {
                "gravitationalConstant": -20000,
                "centralGravity": 0.1,
                "springLength": 150,
                "springConstant": 0.02,
                "damping": 0.09
            }
        }
    })
}

fn edge_tooltip(edge: &CooccurrenceEdge, max_titles: usize) -> String {
    let types = edge
        .distinct_types()
        .iter()
        .map(|t| escape_html(t))
        .collect::<Vec<_>>()
        .join(", ");
    let titles = edge
        .event_titles
        .iter()
        .take(max_titles)
        .map(|t| escape_html(t))
        .collect::<Vec<_>>()
        .join("<br>");

    format!(
        "Weight: {}<br>Mean sentiment: {:.2}<br>Types: {}<br><br><b>Sample events</b><br>{}",
        edge.weight, edge.mean_sentiment, types, titles
    )
}

/// Builds the vis-network document for `graph`.
pub fn to_vis_network(graph: &GraphData, config: &GraphConfig) -> VisNetwork {
    let centralities = Centralities::compute(graph);

    let nodes = graph
        .graph
        .node_indices()
        .map(|idx| {
            let id = &graph.graph[idx].id;
            let (degree, betweenness, eigenvector) = centralities.scores(idx);
            VisNode {
                id: id.clone(),
                label: id.clone(),
                title: format!(
                    "<b>{}</b><br>Degree: {degree:.3}<br>Betweenness: {betweenness:.3}<br>Eigenvector: {eigenvector:.3}",
                    escape_html(id)
                ),
                value: node_value(degree),
            }
        })
        .collect();

    let edges = graph
        .iter_edges()
        .map(|edge| VisEdge {
            from: edge.source.clone(),
            to: edge.target.clone(),
            value: edge.weight,
            width: edge_width(edge.weight),
            color: edge_color(edge.mean_sentiment).to_string(),
            title: edge_tooltip(edge, config.max_titles),
        })
        .collect();

    VisNetwork {
        nodes,
        edges,
        options: physics_options(),
    }
}

/// Renders a standalone HTML page for `network`.
pub fn render_html(network: &VisNetwork, title: &str) -> Result<String> {
    let data = script_json(network)?;
    let mut output = String::new();

    output.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    output.push_str("<meta charset=\"UTF-8\">\n");
    output.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    output.push_str(&format!("<script src=\"{VIS_NETWORK_CDN}\"></script>\n"));
    output.push_str("<style>\n");
    output.push_str(&format!(
        "body {{ margin: 0; background: {BACKGROUND_COLOR}; color: white; font-family: sans-serif; }}\n"
    ));
    output.push_str("h1 { font-size: 1.2em; padding: 8px 16px; margin: 0; }\n");
    output.push_str("#network { width: 100%; height: 650px; }\n");
    output.push_str("</style>\n</head>\n<body>\n");
    output.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));

    if network.nodes.is_empty() {
        output.push_str("<p style=\"padding: 0 16px\">No entity co-occurrences for the current selection.</p>\n");
    }

    output.push_str("<div id=\"network\"></div>\n");
    output.push_str("<script>\n");
    output.push_str(&format!("const data = {data};\n"));
    // vis-network renders string titles as plain text; HTML needs an element.
    output.push_str("const asElement = (html) => { const d = document.createElement('div'); d.innerHTML = html; return d; };\n");
    output.push_str("data.nodes.forEach((n) => { n.title = asElement(n.title); });\n");
    output.push_str("data.edges.forEach((e) => { e.title = asElement(e.title); });\n");
    output.push_str("new vis.Network(document.getElementById('network'), { nodes: new vis.DataSet(data.nodes), edges: new vis.DataSet(data.edges) }, data.options);\n");
    output.push_str("</script>\n</body>\n</html>\n");

    Ok(output)
}

/// Writes `graph.json` and `graph.html` into `dir`.
pub fn write_graph_artifacts(
    graph: &GraphData,
    config: &GraphConfig,
    dir: &Path,
) -> Result<GraphArtifacts> {
    let network = to_vis_network(graph, config);

    let json = dir.join(GRAPH_JSON_FILE);
    write_artifact(&json, &serde_json::to_string_pretty(&network)?)?;

    let html = dir.join(GRAPH_HTML_FILE);
    write_artifact(&html, &render_html(&network, "Entity Co-occurrence Network")?)?;

    log::info!(
        "Wrote graph artifacts ({} nodes, {} edges) to {}",
        network.nodes.len(),
        network.edges.len(),
        dir.display()
    );

    Ok(GraphArtifacts { json, html })
}
