//! Summary statistics over a graph.

use crate::metrics;
use crate::model::Graph;
use indexmap::IndexMap;
use serde::Serialize;

/// How many entries the top-degree rankings keep.
const TOP_N: usize = 5;

/// A structural report produced by [`analyze_graph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphAnalysis {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of edges, dangling ones included.
    pub edge_count: usize,
    /// Node count per `type`, `"unknown"` for untyped nodes, in first-seen order.
    pub node_types: IndexMap<String, usize>,
    /// Edge count per `label`, `"unlabeled"` for unlabeled edges.
    pub edge_types: IndexMap<String, usize>,
    /// Up to five `(id, in-degree)` pairs, highest first, ties in node order.
    pub top_in_degree: Vec<(String, usize)>,
    /// Up to five `(id, out-degree)` pairs, highest first, ties in node order.
    pub top_out_degree: Vec<(String, usize)>,
    /// `edges / (n * (n - 1))`, 0 when there are fewer than two nodes.
    pub density: f64,
    /// Mean in-degree.
    pub average_degree: f64,
    /// Whether every node is reachable from every other, ignoring direction.
    pub is_connected: bool,
    /// Number of undirected connected components.
    pub component_count: usize,
}

fn top(degrees: &metrics::DegreeMap) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> =
        degrees.iter().map(|(id, d)| (id.clone(), *d)).collect();
    // sort_by is stable, so equal degrees keep node order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(TOP_N);
    ranked
}

/// Computes the structural report for a graph.
///
/// # Examples
///
/// ```
/// use aingle_graph_engine::{analyze_graph, EdgeBuilder, Graph, NodeBuilder};
///
/// let mut graph = Graph::new();
/// graph.add_node(NodeBuilder::new("a").node_type("server").build());
/// graph.add_node(NodeBuilder::new("b").build());
/// graph.add_edge(EdgeBuilder::new("a", "b").label("calls").build());
///
/// let report = analyze_graph(&graph);
/// assert_eq!(report.node_types["server"], 1);
/// assert_eq!(report.node_types["unknown"], 1);
/// assert_eq!(report.density, 0.5);
/// assert!(report.is_connected);
/// ```
pub fn analyze_graph(graph: &Graph) -> GraphAnalysis {
    let n = graph.node_count();
    let m = graph.edge_count();

    let mut node_types = IndexMap::new();
    for node in &graph.nodes {
        let key = node.node_type.as_deref().unwrap_or("unknown");
        *node_types.entry(key.to_string()).or_insert(0) += 1;
    }

    let mut edge_types = IndexMap::new();
    for edge in &graph.edges {
        let key = edge.label.as_deref().unwrap_or("unlabeled");
        *edge_types.entry(key.to_string()).or_insert(0) += 1;
    }

    let in_degree = metrics::in_degree(graph);
    let out_degree = metrics::out_degree(graph);

    let density = if n > 1 {
        m as f64 / (n * (n - 1)) as f64
    } else {
        0.0
    };
    let average_degree = if n > 0 {
        in_degree.values().sum::<usize>() as f64 / n as f64
    } else {
        0.0
    };

    log::debug!("analyzed graph with {} nodes, {} edges", n, m);

    GraphAnalysis {
        node_count: n,
        edge_count: m,
        node_types,
        edge_types,
        top_in_degree: top(&in_degree),
        top_out_degree: top(&out_degree),
        density,
        average_degree,
        is_connected: metrics::is_connected(graph),
        component_count: metrics::connected_components(graph),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edge, Node};
    use pretty_assertions::assert_eq;

    fn star(leaves: usize) -> Graph {
        let mut nodes = vec![Node::new("hub")];
        let mut edges = Vec::new();
        for i in 0..leaves {
            let id = format!("leaf{}", i);
            edges.push(Edge::new("hub", id.clone()));
            nodes.push(Node::new(id));
        }
        Graph::from_parts(nodes, edges)
    }

    #[test]
    fn test_empty_graph() {
        let report = analyze_graph(&Graph::new());
        assert_eq!(report.node_count, 0);
        assert_eq!(report.density, 0.0);
        assert_eq!(report.average_degree, 0.0);
        assert!(report.is_connected);
        assert_eq!(report.component_count, 0);
        assert!(report.top_in_degree.is_empty());
    }

    #[test]
    fn test_single_node_density() {
        let report = analyze_graph(&Graph::from_parts(vec![Node::new("a")], Vec::new()));
        assert_eq!(report.density, 0.0);
        assert_eq!(report.component_count, 1);
    }

    #[test]
    fn test_top_degrees_truncated_and_stable() {
        let report = analyze_graph(&star(7));
        assert_eq!(report.top_out_degree[0], ("hub".to_string(), 7));
        assert_eq!(report.top_out_degree.len(), 5);
        assert_eq!(report.top_out_degree[1], ("leaf0".to_string(), 0));

        let ids: Vec<&str> = report.top_in_degree.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["leaf0", "leaf1", "leaf2", "leaf3", "leaf4"]);
    }

    #[test]
    fn test_average_degree_uses_in_degree() {
        let report = analyze_graph(&star(4));
        // 4 edges over 5 nodes
        assert!((report.average_degree - 0.8).abs() < 1e-12);
        assert!((report.density - 4.0 / 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_type_histograms() {
        let mut graph = star(2);
        graph.nodes[1].node_type = Some("leaf".into());
        graph.nodes[2].node_type = Some("leaf".into());
        graph.edges[0].label = Some("owns".into());

        let report = analyze_graph(&graph);
        let node_types: Vec<(&str, usize)> =
            report.node_types.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(node_types, vec![("unknown", 1), ("leaf", 2)]);
        assert_eq!(report.edge_types["owns"], 1);
        assert_eq!(report.edge_types["unlabeled"], 1);
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let value = serde_json::to_value(analyze_graph(&star(1))).unwrap();
        assert_eq!(value["nodeCount"], 2);
        assert_eq!(value["isConnected"], true);
        assert_eq!(value["topOutDegree"][0][0], "hub");
    }
}
