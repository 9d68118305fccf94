//! Predicate-based graph filtering.
//!
//! [`filter_graph`] narrows a graph by node type, exact property values and an
//! optional code-level predicate, then keeps only the edges whose endpoints
//! both survived.
//!
//! # Examples
//!
//! ```
//! use aingle_graph_engine::{filter_graph, EdgeBuilder, Graph, GraphFilter, NodeBuilder};
//!
//! let mut graph = Graph::new();
//! graph.add_node(NodeBuilder::new("api").node_type("service").build());
//! graph.add_node(NodeBuilder::new("db").node_type("database").build());
//! graph.add_node(NodeBuilder::new("web").node_type("service").build());
//! graph.add_edge(EdgeBuilder::new("web", "api").build());
//! graph.add_edge(EdgeBuilder::new("api", "db").build());
//!
//! let services = filter_graph(&graph, &GraphFilter::new().node_types(["service"]));
//!
//! assert_eq!(services.node_count(), 2);
//! assert_eq!(services.edge_count(), 1); // api -> db lost its target
//! ```

use crate::model::{Edge, Graph, Node, Properties};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// An element handed to a custom filter predicate.
#[derive(Debug, Clone, Copy)]
pub enum Element<'a> {
    /// A node being screened.
    Node(&'a Node),
    /// An edge being screened (its endpoints already survived).
    Edge(&'a Edge),
}

/// A code-level predicate over nodes and edges.
pub type ElementPredicate = Arc<dyn Fn(Element<'_>) -> bool + Send + Sync>;

/// Filter criteria. Absent criteria are no-ops.
///
/// The custom predicate cannot travel over JSON and is skipped by serde.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphFilter {
    /// Allow-list of node types. Untyped nodes are dropped while active.
    pub node_types: Option<Vec<String>>,

    /// Allow-list of edge labels. Unlabeled edges are dropped while active.
    pub edge_types: Option<Vec<String>>,

    /// Exact-match property values, applied to nodes and edges.
    pub properties: Option<Properties>,

    /// Additional predicate applied last.
    #[serde(skip)]
    pub custom_filter: Option<ElementPredicate>,
}

impl fmt::Debug for GraphFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphFilter")
            .field("node_types", &self.node_types)
            .field("edge_types", &self.edge_types)
            .field("properties", &self.properties)
            .field("custom_filter", &self.custom_filter.as_ref().map(|_| ".."))
            .finish()
    }
}

impl GraphFilter {
    /// Creates a filter with no criteria.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts nodes to the given types.
    pub fn node_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.node_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Restricts edges to the given labels.
    pub fn edge_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edge_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Requires a property to have exactly the given value.
    pub fn property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties
            .get_or_insert_with(Properties::new)
            .insert(key.into(), value);
        self
    }

    /// Sets the custom predicate.
    pub fn custom<F>(mut self, predicate: F) -> Self
    where
        F: Fn(Element<'_>) -> bool + Send + Sync + 'static,
    {
        self.custom_filter = Some(Arc::new(predicate));
        self
    }

    fn custom_accepts(&self, element: Element<'_>) -> bool {
        self.custom_filter.as_ref().is_none_or(|f| f(element))
    }
}

/// Returns `true` if `actual` carries every required key with an equal value.
///
/// An empty requirement accepts everything, including elements without
/// properties.
fn properties_match(required: &Properties, actual: Option<&Properties>) -> bool {
    if required.is_empty() {
        return true;
    }
    match actual {
        Some(props) => required.iter().all(|(k, v)| props.get(k) == Some(v)),
        None => false,
    }
}

fn allowed(allow_list: &Option<Vec<String>>, value: Option<&String>) -> bool {
    match allow_list {
        Some(list) => value.is_some_and(|v| list.contains(v)),
        None => true,
    }
}

/// Applies the filter and returns a new graph.
///
/// Nodes pass the type filter, then the property filter, then the custom
/// predicate. Edges are kept when both endpoints survived and the edge
/// passes the label, property and custom checks. Relative order and the
/// input metadata are preserved.
pub fn filter_graph(graph: &Graph, filter: &GraphFilter) -> Graph {
    let nodes: Vec<Node> = graph
        .nodes
        .iter()
        .filter(|n| allowed(&filter.node_types, n.node_type.as_ref()))
        .filter(|n| {
            filter
                .properties
                .as_ref()
                .is_none_or(|req| properties_match(req, n.properties.as_ref()))
        })
        .filter(|n| filter.custom_accepts(Element::Node(*n)))
        .cloned()
        .collect();

    let kept: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

    let edges: Vec<Edge> = graph
        .edges
        .iter()
        .filter(|e| kept.contains(e.source.as_str()) && kept.contains(e.target.as_str()))
        .filter(|e| allowed(&filter.edge_types, e.label.as_ref()))
        .filter(|e| {
            filter
                .properties
                .as_ref()
                .is_none_or(|req| properties_match(req, e.properties.as_ref()))
        })
        .filter(|e| filter.custom_accepts(Element::Edge(*e)))
        .cloned()
        .collect();

    log::debug!(
        "filter kept {}/{} nodes and {}/{} edges",
        nodes.len(),
        graph.nodes.len(),
        edges.len(),
        graph.edges.len()
    );

    Graph {
        nodes,
        edges,
        metadata: graph.metadata.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EdgeBuilder, NodeBuilder};
    use serde_json::json;

    fn sample() -> Graph {
        let mut graph = Graph::new();
        graph.add_node(
            NodeBuilder::new("a")
                .node_type("person")
                .property("team", json!("core"))
                .build(),
        );
        graph.add_node(
            NodeBuilder::new("b")
                .node_type("person")
                .property("team", json!("ops"))
                .build(),
        );
        graph.add_node(NodeBuilder::new("c").node_type("project").build());
        graph.add_node(NodeBuilder::new("d").build());
        graph.add_edge(EdgeBuilder::new("a", "b").label("knows").build());
        graph.add_edge(EdgeBuilder::new("a", "c").label("owns").build());
        graph.add_edge(EdgeBuilder::new("b", "c").build());
        graph
    }

    fn ids(graph: &Graph) -> Vec<&str> {
        graph.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let graph = sample();
        assert_eq!(filter_graph(&graph, &GraphFilter::new()), graph);
    }

    #[test]
    fn test_node_type_filter_drops_untyped() {
        let graph = sample();
        let result = filter_graph(&graph, &GraphFilter::new().node_types(["person", "project"]));
        assert_eq!(ids(&result), vec!["a", "b", "c"]);
        assert_eq!(result.edge_count(), 3);
    }

    #[test]
    fn test_property_filter_requires_properties() {
        let graph = sample();
        let result = filter_graph(&graph, &GraphFilter::new().property("team", json!("core")));
        assert_eq!(ids(&result), vec!["a"]);
        assert!(result.edges.is_empty());
    }

    #[test]
    fn test_edge_type_filter() {
        let graph = sample();
        let result = filter_graph(&graph, &GraphFilter::new().edge_types(["owns"]));
        assert_eq!(result.node_count(), 4);
        assert_eq!(result.edge_count(), 1);
        assert_eq!(result.edges[0].target, "c");
    }

    #[test]
    fn test_custom_filter_applies_to_nodes_and_edges() {
        let graph = sample();
        let filter = GraphFilter::new().custom(|element| match element {
            Element::Node(n) => n.id != "d",
            Element::Edge(e) => e.label.is_some(),
        });
        let result = filter_graph(&graph, &filter);
        assert_eq!(ids(&result), vec!["a", "b", "c"]);
        assert_eq!(result.edge_count(), 2);
    }

    #[test]
    fn test_metadata_is_carried() {
        let mut graph = sample();
        let mut meta = crate::model::Metadata::new();
        meta.insert("name".into(), json!("people"));
        graph.metadata = Some(meta);

        let result = filter_graph(&graph, &GraphFilter::new().node_types(["person"]));
        assert_eq!(result.name(), Some("people"));
    }

    #[test]
    fn test_filter_from_json() {
        let filter: GraphFilter =
            serde_json::from_str(r#"{"nodeTypes":["project"],"edgeTypes":["owns"]}"#).unwrap();
        let result = filter_graph(&sample(), &filter);
        assert_eq!(ids(&result), vec!["c"]);
        assert!(filter.custom_filter.is_none());
    }
}
