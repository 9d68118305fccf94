//! Structural metrics: degrees and connectivity.
//!
//! These are pure functions consumed by sizing, layout and analysis.
//! Degree maps are total over the graph's nodes, in node order; edge
//! endpoints that do not name a node are ignored.

use crate::model::{Edge, Graph, Node};
use indexmap::IndexMap;
use std::collections::{HashMap, VecDeque};

/// Mapping from node id to a degree count, in node order.
pub type DegreeMap = IndexMap<String, usize>;

fn zeroed(nodes: &[Node]) -> DegreeMap {
    nodes.iter().map(|n| (n.id.clone(), 0)).collect()
}

/// Number of edges whose target is each node.
///
/// ```
/// use aingle_graph_engine::{metrics, Edge, Graph, Node};
///
/// let graph = Graph::from_parts(
///     vec![Node::new("a"), Node::new("b")],
///     vec![Edge::new("a", "b")],
/// );
/// let degrees = metrics::in_degree(&graph);
/// assert_eq!(degrees["a"], 0);
/// assert_eq!(degrees["b"], 1);
/// ```
pub fn in_degree(graph: &Graph) -> DegreeMap {
    let mut degrees = zeroed(&graph.nodes);
    for edge in &graph.edges {
        if let Some(d) = degrees.get_mut(&edge.target) {
            *d += 1;
        }
    }
    degrees
}

/// Number of edges whose source is each node.
pub fn out_degree(graph: &Graph) -> DegreeMap {
    let mut degrees = zeroed(&graph.nodes);
    for edge in &graph.edges {
        if let Some(d) = degrees.get_mut(&edge.source) {
            *d += 1;
        }
    }
    degrees
}

/// Total degree: in-degree plus out-degree.
///
/// A self-loop counts twice.
pub fn degree(graph: &Graph) -> DegreeMap {
    total_degree(&graph.nodes, &graph.edges)
}

/// Total degree over loose node and edge slices, for layout passes that work
/// on an already-cloned node list.
pub(crate) fn total_degree(nodes: &[Node], edges: &[Edge]) -> DegreeMap {
    let mut degrees = zeroed(nodes);
    for edge in edges {
        if let Some(d) = degrees.get_mut(&edge.source) {
            *d += 1;
        }
        if let Some(d) = degrees.get_mut(&edge.target) {
            *d += 1;
        }
    }
    degrees
}

/// Undirected adjacency over node indices.
fn adjacency(graph: &Graph) -> Vec<Vec<usize>> {
    let index: HashMap<&str, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    let mut adj = vec![Vec::new(); graph.nodes.len()];
    for edge in &graph.edges {
        if let (Some(&s), Some(&t)) = (
            index.get(edge.source.as_str()),
            index.get(edge.target.as_str()),
        ) {
            adj[s].push(t);
            adj[t].push(s);
        }
    }
    adj
}

/// Marks every node reachable from `start` and returns how many were newly visited.
fn flood(adj: &[Vec<usize>], start: usize, visited: &mut [bool]) -> usize {
    let mut queue = VecDeque::from([start]);
    visited[start] = true;
    let mut count = 1;

    while let Some(current) = queue.pop_front() {
        for &next in &adj[current] {
            if !visited[next] {
                visited[next] = true;
                count += 1;
                queue.push_back(next);
            }
        }
    }
    count
}

/// Returns `true` if every node is reachable from the first one, ignoring
/// edge direction. An empty graph is vacuously connected.
pub fn is_connected(graph: &Graph) -> bool {
    if graph.nodes.is_empty() {
        return true;
    }
    let adj = adjacency(graph);
    let mut visited = vec![false; graph.nodes.len()];
    flood(&adj, 0, &mut visited) == graph.nodes.len()
}

/// Number of undirected connected components. Zero for an empty graph.
pub fn connected_components(graph: &Graph) -> usize {
    let adj = adjacency(graph);
    let mut visited = vec![false; graph.nodes.len()];
    let mut components = 0;

    for start in 0..graph.nodes.len() {
        if !visited[start] {
            flood(&adj, start, &mut visited);
            components += 1;
        }
    }
    components
}
