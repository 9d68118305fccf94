//! Root-seeded subgraph extraction.
//!
//! [`extract_subgraph`] runs a breadth-first traversal from a set of root
//! nodes, following edges according to a [`TraversalOptions`] policy, and
//! returns the visited neighbourhood as a new graph.
//!
//! # Examples
//!
//! ```
//! use aingle_graph_engine::{
//!     extract_subgraph, Direction, Edge, Graph, Node, SubgraphOptions, TraversalOptions,
//! };
//!
//! let graph = Graph::from_parts(
//!     (1..=5).map(|i| Node::new(format!("n{}", i))).collect(),
//!     (1..5).map(|i| Edge::new(format!("n{}", i), format!("n{}", i + 1))).collect(),
//! );
//!
//! let options = SubgraphOptions::new(["n1"]).traversal(
//!     TraversalOptions::default()
//!         .max_depth(2)
//!         .direction(Direction::Outbound),
//! );
//! let sub = extract_subgraph(&graph, &options);
//!
//! let ids: Vec<&str> = sub.nodes.iter().map(|n| n.id.as_str()).collect();
//! assert_eq!(ids, ["n1", "n2", "n3"]);
//! assert_eq!(sub.edge_count(), 2);
//! ```

use crate::layout::{self, LayoutOptions};
use crate::model::{Edge, Graph, Metadata, Node};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Which edges may be followed relative to the node being expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Only edges whose source is the current node.
    Outbound,
    /// Only edges whose target is the current node.
    Inbound,
    /// Both.
    #[default]
    Any,
}

/// Traversal policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TraversalOptions {
    /// Hops from the nearest root beyond which nodes are not expanded.
    /// `None` is unbounded.
    pub max_depth: Option<usize>,
    /// Follow edges pointing at the current node.
    pub follow_incoming: bool,
    /// Follow edges leaving the current node.
    pub follow_outgoing: bool,
    /// Additional direction restriction.
    pub direction: Direction,
    /// Allow-list of edge labels to follow.
    pub relationship_types: Option<Vec<String>>,
    /// Allow-list of node types for newly discovered neighbours.
    pub node_types: Option<Vec<String>>,
    /// Node ids never entered as neighbours.
    pub exclude_nodes: Vec<String>,
    /// Maximum number of nodes in the result. `None` is unbounded.
    pub limit: Option<usize>,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            follow_incoming: true,
            follow_outgoing: true,
            direction: Direction::Any,
            relationship_types: None,
            node_types: None,
            exclude_nodes: Vec::new(),
            limit: None,
        }
    }
}

impl TraversalOptions {
    /// Sets the depth bound.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Sets the direction restriction.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Enables or disables following incoming edges.
    pub fn follow_incoming(mut self, follow: bool) -> Self {
        self.follow_incoming = follow;
        self
    }

    /// Enables or disables following outgoing edges.
    pub fn follow_outgoing(mut self, follow: bool) -> Self {
        self.follow_outgoing = follow;
        self
    }

    /// Restricts followed edges to the given labels.
    pub fn relationship_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relationship_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Restricts discovered neighbours to the given node types.
    pub fn node_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.node_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Never enters these node ids as neighbours.
    pub fn exclude<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_nodes = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Bounds the number of nodes in the result.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `edge` may be followed from `current`, and towards which node.
    fn follow<'e>(&self, edge: &'e Edge, current: &str) -> Option<&'e str> {
        let outgoing = edge.source == current;
        let incoming = edge.target == current;

        if outgoing && self.follow_outgoing && self.direction != Direction::Inbound {
            return Some(edge.target.as_str());
        }
        if incoming && self.follow_incoming && self.direction != Direction::Outbound {
            return Some(edge.source.as_str());
        }
        None
    }

    fn relationship_allowed(&self, edge: &Edge) -> bool {
        match &self.relationship_types {
            Some(types) => edge.label.as_ref().is_some_and(|l| types.contains(l)),
            None => true,
        }
    }

    fn node_type_allowed(&self, node: &Node) -> bool {
        match &self.node_types {
            Some(types) => node.node_type.as_ref().is_some_and(|t| types.contains(t)),
            None => true,
        }
    }
}

/// Extraction request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubgraphOptions {
    /// Seed node ids. Ids absent from the graph are ignored.
    pub root_nodes: Vec<String>,
    /// Traversal policy.
    pub traversal: TraversalOptions,
    /// Append roots that were never reached, with no edges.
    pub include_orphans: bool,
    /// Run a layout pass over the result.
    pub auto_position: bool,
    /// Layout used when `auto_position` is set.
    pub layout_options: Option<LayoutOptions>,
}

impl SubgraphOptions {
    /// Extraction from the given roots with the default traversal policy.
    pub fn new<I, S>(roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root_nodes: roots.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the traversal policy.
    pub fn traversal(mut self, traversal: TraversalOptions) -> Self {
        self.traversal = traversal;
        self
    }

    /// Keeps unreached roots in the result.
    pub fn include_orphans(mut self, include: bool) -> Self {
        self.include_orphans = include;
        self
    }

    /// Positions the result with the given layout.
    pub fn auto_position(mut self, layout: LayoutOptions) -> Self {
        self.auto_position = true;
        self.layout_options = Some(layout);
        self
    }
}

/// Extracts the neighbourhood of `options.root_nodes`.
///
/// Traversal order is FIFO over the input edge sequence of each node, so
/// the output is stable given identical input ordering. The `limit` bounds
/// nodes added to the result; reaching it halts the traversal. Every
/// returned edge has both endpoints among the returned nodes.
pub fn extract_subgraph(graph: &Graph, options: &SubgraphOptions) -> Graph {
    let traversal = &options.traversal;
    let by_id: HashMap<&str, &Node> = graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    let excluded: HashSet<&str> = traversal.exclude_nodes.iter().map(String::as_str).collect();

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
    for root in &options.root_nodes {
        if by_id.contains_key(root.as_str()) && visited.insert(root.as_str()) {
            queue.push_back((root.as_str(), 0));
        }
    }

    let mut nodes: Vec<Node> = Vec::new();
    let mut edges: Vec<Edge> = Vec::new();
    let mut edge_keys: HashSet<String> = HashSet::new();
    let mut record = |edge: &Edge, edges: &mut Vec<Edge>| {
        if edge_keys.insert(edge.key()) {
            edges.push(edge.clone());
        }
    };

    while let Some((current, depth)) = queue.pop_front() {
        if traversal.limit.is_some_and(|limit| nodes.len() >= limit) {
            log::debug!("subgraph limit of {} nodes reached", nodes.len());
            break;
        }
        if let Some(node) = by_id.get(current) {
            nodes.push((*node).clone());
        }

        if traversal.max_depth.is_some_and(|max| depth >= max) {
            continue;
        }

        for edge in graph.edges.iter().filter(|e| e.touches(current)) {
            let Some(neighbor) = traversal.follow(edge, current) else {
                continue;
            };
            if !traversal.relationship_allowed(edge) || excluded.contains(neighbor) {
                continue;
            }

            if visited.contains(neighbor) {
                record(edge, &mut edges);
                continue;
            }

            let Some(next) = by_id.get(neighbor) else {
                continue;
            };
            if !traversal.node_type_allowed(next) {
                continue;
            }

            visited.insert(next.id.as_str());
            queue.push_back((next.id.as_str(), depth + 1));
            record(edge, &mut edges);
        }
    }

    let included: HashSet<String> = nodes.iter().map(|n| n.id.clone()).collect();
    edges.retain(|e| included.contains(&e.source) && included.contains(&e.target));

    if options.include_orphans {
        let mut included = included;
        for root in &options.root_nodes {
            if let Some(node) = by_id.get(root.as_str()) {
                if included.insert(root.clone()) {
                    nodes.push((*node).clone());
                }
            }
        }
    }

    if options.auto_position {
        if let Some(layout_options) = &options.layout_options {
            layout::layout_nodes(&mut nodes, &edges, layout_options);
        }
    }

    Graph {
        nodes,
        edges,
        metadata: Some(provenance(graph, &options.root_nodes)),
    }
}

fn provenance(graph: &Graph, roots: &[String]) -> Metadata {
    let mut metadata = graph.metadata.clone().unwrap_or_default();
    let source = graph.name().unwrap_or("graph").to_string();
    metadata.insert("source".into(), source.into());
    metadata.insert("extractedFrom".into(), serde_json::json!(roots));
    metadata.insert("type".into(), "subgraph".into());
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeBuilder, NodeBuilder};
    use pretty_assertions::assert_eq;

    fn chain() -> Graph {
        Graph::from_parts(
            (1..=5).map(|i| Node::new(format!("n{}", i))).collect(),
            (1..5)
                .map(|i| Edge::new(format!("n{}", i), format!("n{}", i + 1)))
                .collect(),
        )
    }

    fn ids(graph: &Graph) -> Vec<&str> {
        graph.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    fn edge_keys(graph: &Graph) -> Vec<String> {
        graph.edges.iter().map(Edge::key).collect()
    }

    #[test]
    fn test_outbound_depth_two() {
        let options = SubgraphOptions::new(["n1"]).traversal(
            TraversalOptions::default()
                .max_depth(2)
                .direction(Direction::Outbound),
        );
        let sub = extract_subgraph(&chain(), &options);
        assert_eq!(ids(&sub), vec!["n1", "n2", "n3"]);
        assert_eq!(edge_keys(&sub), vec!["n1-n2", "n2-n3"]);
    }

    #[test]
    fn test_inbound_from_middle() {
        let options = SubgraphOptions::new(["n3"])
            .traversal(TraversalOptions::default().direction(Direction::Inbound));
        let sub = extract_subgraph(&chain(), &options);
        assert_eq!(ids(&sub), vec!["n3", "n2", "n1"]);
    }

    #[test]
    fn test_any_direction_unbounded() {
        let sub = extract_subgraph(&chain(), &SubgraphOptions::new(["n3"]));
        assert_eq!(ids(&sub), vec!["n3", "n2", "n4", "n1", "n5"]);
        assert_eq!(sub.edge_count(), 4);
    }

    #[test]
    fn test_follow_flags() {
        let options = SubgraphOptions::new(["n3"])
            .traversal(TraversalOptions::default().follow_outgoing(false));
        let sub = extract_subgraph(&chain(), &options);
        assert_eq!(ids(&sub), vec!["n3", "n2", "n1"]);
    }

    #[test]
    fn test_depth_zero_returns_roots_only() {
        let options = SubgraphOptions::new(["n2", "n4"])
            .traversal(TraversalOptions::default().max_depth(0));
        let sub = extract_subgraph(&chain(), &options);
        assert_eq!(ids(&sub), vec!["n2", "n4"]);
        assert!(sub.edges.is_empty());
    }

    #[test]
    fn test_relationship_types() {
        let mut graph = Graph::from_parts(
            vec![Node::new("a"), Node::new("b"), Node::new("c")],
            Vec::new(),
        );
        graph.add_edge(EdgeBuilder::new("a", "b").label("knows").build());
        graph.add_edge(EdgeBuilder::new("a", "c").label("blocks").build());

        let options = SubgraphOptions::new(["a"])
            .traversal(TraversalOptions::default().relationship_types(["knows"]));
        let sub = extract_subgraph(&graph, &options);
        assert_eq!(ids(&sub), vec!["a", "b"]);
        assert_eq!(sub.edge_count(), 1);
    }

    #[test]
    fn test_node_types_screen_new_neighbours() {
        let mut graph = Graph::new();
        graph.add_node(NodeBuilder::new("root").node_type("hub").build());
        graph.add_node(NodeBuilder::new("keep").node_type("leaf").build());
        graph.add_node(NodeBuilder::new("drop").node_type("noise").build());
        graph.add_edge(Edge::new("root", "keep"));
        graph.add_edge(Edge::new("root", "drop"));

        let options = SubgraphOptions::new(["root"])
            .traversal(TraversalOptions::default().node_types(["leaf"]));
        let sub = extract_subgraph(&graph, &options);
        assert_eq!(ids(&sub), vec!["root", "keep"]);
    }

    #[test]
    fn test_exclude_and_orphans() {
        let graph = Graph::from_parts(
            vec![Node::new("a"), Node::new("b"), Node::new("lonely")],
            vec![Edge::new("a", "b")],
        );
        let options = SubgraphOptions::new(["a", "lonely", "missing"])
            .traversal(TraversalOptions::default().exclude(["b"]));
        let sub = extract_subgraph(&graph, &options);
        assert_eq!(ids(&sub), vec!["a", "lonely"]);
        assert!(sub.edges.is_empty());
    }

    #[test]
    fn test_orphans_included_after_limit() {
        let graph = Graph::from_parts(
            vec![Node::new("a"), Node::new("b"), Node::new("c")],
            vec![Edge::new("a", "b")],
        );
        let options = SubgraphOptions::new(["a", "c"])
            .traversal(TraversalOptions::default().limit(1))
            .include_orphans(true);
        let sub = extract_subgraph(&graph, &options);
        assert_eq!(ids(&sub), vec!["a", "c"]);
        assert!(sub.edges.is_empty());
    }

    #[test]
    fn test_limit_bounds_result_and_drops_dangling_edges() {
        let options =
            SubgraphOptions::new(["n1"]).traversal(TraversalOptions::default().limit(2));
        let sub = extract_subgraph(&chain(), &options);
        assert_eq!(ids(&sub), vec!["n1", "n2"]);
        assert_eq!(edge_keys(&sub), vec!["n1-n2"]);
    }

    #[test]
    fn test_edges_between_visited_nodes_are_kept() {
        // Triangle: the a-c edge is only seen once both ends are visited
        let graph = Graph::from_parts(
            vec![Node::new("a"), Node::new("b"), Node::new("c")],
            vec![Edge::new("a", "b"), Edge::new("b", "c"), Edge::new("c", "a")],
        );
        let sub = extract_subgraph(&graph, &SubgraphOptions::new(["a"]));
        assert_eq!(sub.edge_count(), 3);
    }

    #[test]
    fn test_provenance_metadata() {
        let mut graph = chain();
        let mut meta = Metadata::new();
        meta.insert("name".into(), "pipeline".into());
        meta.insert("owner".into(), "ops".into());
        graph.metadata = Some(meta);

        let sub = extract_subgraph(&graph, &SubgraphOptions::new(["n1"]));
        let meta = sub.metadata.unwrap();
        assert_eq!(meta["source"], "pipeline");
        assert_eq!(meta["owner"], "ops");
        assert_eq!(meta["extractedFrom"], serde_json::json!(["n1"]));
        assert_eq!(meta["type"], "subgraph");
    }

    #[test]
    fn test_auto_position() {
        let options = SubgraphOptions::new(["n1"])
            .auto_position(LayoutOptions::new(crate::layout::LayoutAlgorithm::Circular));
        let sub = extract_subgraph(&chain(), &options);
        assert!(sub.nodes.iter().all(|n| n.position.is_some()));
    }

    #[test]
    fn test_options_from_json() {
        let options: SubgraphOptions = serde_json::from_str(
            r#"{"rootNodes":["n5"],"traversal":{"maxDepth":1,"direction":"inbound"}}"#,
        )
        .unwrap();
        assert!(options.traversal.follow_outgoing);
        let sub = extract_subgraph(&chain(), &options);
        assert_eq!(ids(&sub), vec!["n5", "n4"]);
    }
}
