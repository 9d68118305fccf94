//! The graph data model shared by every transform in this crate.
//!
//! A [`Graph`] is an ordered list of [`Node`]s and [`Edge`]s with optional
//! free-form metadata. Graphs are treated as immutable inputs: every
//! operation in the engine takes `&Graph` and returns a fresh value.
//!
//! # Quick Start
//!
//! ```
//! use aingle_graph_engine::{EdgeBuilder, Graph, NodeBuilder};
//!
//! let mut graph = Graph::new();
//! graph.add_node(NodeBuilder::new("alice").label("Alice").node_type("person").build());
//! graph.add_node(NodeBuilder::new("bob").label("Bob").node_type("person").build());
//! graph.add_edge(EdgeBuilder::new("alice", "bob").label("knows").build());
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edges[0].key(), "alice-bob");
//! assert!(graph.validate().is_ok());
//! ```

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered property bag attached to nodes and edges.
pub type Properties = IndexMap<String, serde_json::Value>;

/// Free-form graph metadata (name, description, lineage, ...).
pub type Metadata = IndexMap<String, serde_json::Value>;

/// An absolute 2-D coordinate on the layout canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Creates a new position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Visual overrides for a node.
///
/// Written by attribute derivation or by the caller, never by traversal or
/// analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    /// Rendered size (radius or side length, depending on the renderer).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Fill color, usually a hex code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Shape name understood by the renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
}

/// Visual overrides for an edge.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
    /// Stroke width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Stroke color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A vertex of the graph.
///
/// # Examples
///
/// ```
/// use aingle_graph_engine::NodeBuilder;
///
/// let node = NodeBuilder::new("server-1")
///     .label("Server 1")
///     .node_type("server")
///     .property("cpu", serde_json::json!(8))
///     .build();
///
/// assert_eq!(node.node_type.as_deref(), Some("server"));
/// assert_eq!(node.property("cpu"), Some(&serde_json::json!(8)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Identity of the node, unique within a graph.
    pub id: String,

    /// Human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Open category tag.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,

    /// Layout position, present only after a layout pass or when supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    /// Property bag used for property-based sizing and coloring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,

    /// Visual overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<NodeStyle>,
}

impl Node {
    /// Creates a bare node with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            node_type: None,
            position: None,
            properties: None,
            style: None,
        }
    }

    /// Looks up a property value.
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.as_ref().and_then(|p| p.get(key))
    }

    /// Returns the derived size, if a sizing pass has run.
    pub fn size(&self) -> Option<f64> {
        self.style.as_ref().and_then(|s| s.size)
    }

    /// Mutable access to the style, creating an empty one if absent.
    pub fn style_mut(&mut self) -> &mut NodeStyle {
        self.style.get_or_insert_with(NodeStyle::default)
    }
}

/// A relationship between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Id of the source node.
    pub source: String,

    /// Id of the target node.
    pub target: String,

    /// Explicit identity. When absent the identity is `source-target`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Relationship type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Numeric weight, assigned by attribute derivation or supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Whether the renderer should draw an arrow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directed: Option<bool>,

    /// Property bag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,

    /// Visual overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<EdgeStyle>,
}

impl Edge {
    /// Creates a bare edge between two node ids.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            id: None,
            label: None,
            weight: None,
            directed: None,
            properties: None,
            style: None,
        }
    }

    /// The de-duplication identity of this edge.
    ///
    /// Two edges between the same ordered pair collapse to one identity unless
    /// both carry explicit, distinct ids.
    ///
    /// ```
    /// use aingle_graph_engine::EdgeBuilder;
    ///
    /// assert_eq!(EdgeBuilder::new("a", "b").build().key(), "a-b");
    /// assert_eq!(EdgeBuilder::new("a", "b").id("e1").build().key(), "e1");
    /// ```
    pub fn key(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("{}-{}", self.source, self.target),
        }
    }

    /// Returns `true` if the edge touches the given node.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// Looks up a property value.
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.as_ref().and_then(|p| p.get(key))
    }

    /// Mutable access to the style, creating an empty one if absent.
    pub fn style_mut(&mut self) -> &mut EdgeStyle {
        self.style.get_or_insert_with(EdgeStyle::default)
    }
}

/// An ordered collection of nodes and edges.
///
/// # Examples
///
/// ```
/// use aingle_graph_engine::{EdgeBuilder, Graph, NodeBuilder};
///
/// let json = r#"{
///     "nodes": [{"id": "a", "type": "service"}, {"id": "b"}],
///     "edges": [{"source": "a", "target": "b", "label": "calls"}],
///     "metadata": {"name": "services"}
/// }"#;
///
/// let graph = Graph::from_json(json).unwrap();
/// assert_eq!(graph.node("a").unwrap().node_type.as_deref(), Some("service"));
/// assert_eq!(graph.name(), Some("services"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Graph {
    /// Vertices, in caller order.
    #[serde(default)]
    pub nodes: Vec<Node>,

    /// Relationships, in caller order.
    #[serde(default)]
    pub edges: Vec<Edge>,

    /// Free-form metadata carried through transforms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Graph {
    /// Creates a new, empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph carrying the given metadata.
    pub fn with_metadata(metadata: Metadata) -> Self {
        Self {
            metadata: Some(metadata),
            ..Self::default()
        }
    }

    /// Builds a graph from node and edge lists.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            nodes,
            edges,
            metadata: None,
        }
    }

    /// Parses a graph from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the graph to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Appends a node.
    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Appends an edge.
    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the graph has no nodes and no edges.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Gets a node by its id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Returns `true` if a node with the given id exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// All edges where the node is either the source or the target.
    pub fn edges_for_node(&self, node_id: &str) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.touches(node_id)).collect()
    }

    /// The `name` metadata entry, when it is a string.
    pub fn name(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("name"))
            .and_then(|v| v.as_str())
    }

    /// Checks the structural invariants of the graph.
    ///
    /// Transforms never call this; they drop dangling edges on their own.
    /// It is offered to callers that want to reject malformed input early.
    ///
    /// ```
    /// use aingle_graph_engine::{EdgeBuilder, Error, Graph, NodeBuilder};
    ///
    /// let mut graph = Graph::new();
    /// graph.add_node(NodeBuilder::new("a").build());
    /// graph.add_edge(EdgeBuilder::new("a", "ghost").build());
    ///
    /// assert!(matches!(graph.validate(), Err(Error::DanglingEdge { .. })));
    /// ```
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(Error::DuplicateNode(node.id.clone()));
            }
        }

        for edge in &self.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !seen.contains(endpoint.as_str()) {
                    return Err(Error::DanglingEdge {
                        edge: edge.key(),
                        node: endpoint.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Converts the graph into the `nodes`/`links` JSON shape used by D3.js.
    ///
    /// ```
    /// use aingle_graph_engine::{EdgeBuilder, Graph, NodeBuilder};
    ///
    /// let mut graph = Graph::new();
    /// graph.add_node(NodeBuilder::new("a").position(10.0, 20.0).build());
    /// graph.add_node(NodeBuilder::new("b").build());
    /// graph.add_edge(EdgeBuilder::new("a", "b").build());
    ///
    /// let d3 = graph.to_d3_json();
    /// assert_eq!(d3["nodes"][0]["x"], 10.0);
    /// assert_eq!(d3["links"][0]["source"], "a");
    /// ```
    pub fn to_d3_json(&self) -> serde_json::Value {
        serde_json::json!({
            "nodes": self.nodes.iter().map(|n| {
                serde_json::json!({
                    "id": n.id,
                    "label": n.label.as_deref().unwrap_or(&n.id),
                    "group": n.node_type,
                    "x": n.position.map(|p| p.x),
                    "y": n.position.map(|p| p.y),
                    "size": n.style.as_ref().and_then(|s| s.size),
                    "color": n.style.as_ref().and_then(|s| s.color.clone()),
                })
            }).collect::<Vec<_>>(),
            "links": self.edges.iter().map(|e| {
                serde_json::json!({
                    "source": e.source,
                    "target": e.target,
                    "label": e.label,
                    "weight": e.weight,
                    "width": e.style.as_ref().and_then(|s| s.width),
                })
            }).collect::<Vec<_>>(),
        })
    }
}

/// A builder for creating [`Node`] instances using a fluent API.
pub struct NodeBuilder {
    node: Node,
}

impl NodeBuilder {
    /// Starts building a node with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self { node: Node::new(id) }
    }

    /// Sets the display label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.node.label = Some(label.into());
        self
    }

    /// Sets the category tag.
    pub fn node_type(mut self, node_type: impl Into<String>) -> Self {
        self.node.node_type = Some(node_type.into());
        self
    }

    /// Sets an initial position.
    pub fn position(mut self, x: f64, y: f64) -> Self {
        self.node.position = Some(Position::new(x, y));
        self
    }

    /// Adds a property. Can be called multiple times.
    pub fn property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.node
            .properties
            .get_or_insert_with(Properties::new)
            .insert(key.into(), value);
        self
    }

    /// Sets an explicit size override.
    pub fn size(mut self, size: f64) -> Self {
        self.node.style_mut().size = Some(size);
        self
    }

    /// Sets an explicit color override.
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.node.style_mut().color = Some(color.into());
        self
    }

    /// Builds and returns the [`Node`].
    pub fn build(self) -> Node {
        self.node
    }
}

/// A builder for creating [`Edge`] instances using a fluent API.
pub struct EdgeBuilder {
    edge: Edge,
}

impl EdgeBuilder {
    /// Starts building an edge between two node ids.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            edge: Edge::new(source, target),
        }
    }

    /// Sets an explicit identity.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.edge.id = Some(id.into());
        self
    }

    /// Sets the relationship type.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.edge.label = Some(label.into());
        self
    }

    /// Sets the weight.
    pub fn weight(mut self, weight: f64) -> Self {
        self.edge.weight = Some(weight);
        self
    }

    /// Marks the edge as directed or undirected.
    pub fn directed(mut self, directed: bool) -> Self {
        self.edge.directed = Some(directed);
        self
    }

    /// Adds a property. Can be called multiple times.
    pub fn property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.edge
            .properties
            .get_or_insert_with(Properties::new)
            .insert(key.into(), value);
        self
    }

    /// Builds and returns the [`Edge`].
    pub fn build(self) -> Edge {
        self.edge
    }
}
