//! Two-graph merge with conflict resolution.
//!
//! [`merge_graphs`] seeds the result with every node and edge of the first
//! graph, then folds in the second graph. Collisions are resolved per
//! [`MergeStrategy`]; ids from the second graph can be namespaced with a
//! prefix to avoid accidental collisions.
//!
//! # Examples
//!
//! ```
//! use aingle_graph_engine::{merge_graphs, Graph, MergeOptions, NodeBuilder};
//! use serde_json::json;
//!
//! let mut g1 = Graph::new();
//! g1.add_node(NodeBuilder::new("a").property("x", json!(1)).build());
//! let mut g2 = Graph::new();
//! g2.add_node(NodeBuilder::new("a").property("y", json!(2)).build());
//!
//! let merged = merge_graphs(&g1, &g2, &MergeOptions::default());
//! let props = merged.nodes[0].properties.as_ref().unwrap();
//! assert_eq!(props["x"], 1);
//! assert_eq!(props["y"], 2);
//! ```

use crate::model::{Edge, Graph, Metadata, Node, Properties};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// How a collision between an existing and an incoming element is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// Keep the element from the first graph.
    KeepFirst,
    /// Replace it with the element from the second graph.
    KeepSecond,
    /// Union properties into the existing element, second graph winning per key.
    #[default]
    Merge,
}

/// Merge configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MergeOptions {
    /// Strategy for node id collisions.
    pub node_strategy: MergeStrategy,
    /// Strategy for edge identity collisions.
    pub edge_strategy: MergeStrategy,
    /// Prepended to every node id (and edge endpoint) of the second graph.
    pub node_prefix: Option<String>,
    /// Prepended to every explicit edge id of the second graph.
    pub edge_prefix: Option<String>,
    /// Gates property union for [`MergeStrategy::Merge`] on nodes.
    pub merge_node_properties: bool,
    /// Gates property union for [`MergeStrategy::Merge`] on edges.
    pub merge_edge_properties: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            node_strategy: MergeStrategy::Merge,
            edge_strategy: MergeStrategy::Merge,
            node_prefix: None,
            edge_prefix: None,
            merge_node_properties: true,
            merge_edge_properties: true,
        }
    }
}

impl MergeOptions {
    /// Uses the same strategy for nodes and edges.
    pub fn with_strategy(strategy: MergeStrategy) -> Self {
        Self {
            node_strategy: strategy,
            edge_strategy: strategy,
            ..Self::default()
        }
    }

    /// Namespaces the second graph's node ids.
    pub fn node_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.node_prefix = Some(prefix.into());
        self
    }

    /// Namespaces the second graph's explicit edge ids.
    pub fn edge_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.edge_prefix = Some(prefix.into());
        self
    }
}

fn prefixed(prefix: &Option<String>, id: &str) -> String {
    match prefix {
        Some(p) => format!("{}{}", p, id),
        None => id.to_string(),
    }
}

/// Conflict identity of an edge: explicit id, else `source-target-label`.
fn merge_key(edge: &Edge) -> String {
    match &edge.id {
        Some(id) => id.clone(),
        None => format!(
            "{}-{}-{}",
            edge.source,
            edge.target,
            edge.label.as_deref().unwrap_or("")
        ),
    }
}

/// Unions `incoming` into `existing`, incoming values winning per key.
fn union_properties(existing: &mut Option<Properties>, incoming: &Option<Properties>) {
    if let Some(incoming) = incoming {
        let target = existing.get_or_insert_with(Properties::new);
        for (k, v) in incoming {
            target.insert(k.clone(), v.clone());
        }
    }
}

/// Merges `g2` into a copy of `g1`.
///
/// Edges of `g2` whose endpoints are missing from the merged node set are
/// dropped.
pub fn merge_graphs(g1: &Graph, g2: &Graph, options: &MergeOptions) -> Graph {
    let mut nodes: Vec<Node> = g1.nodes.clone();
    let mut node_index: HashMap<String, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.clone(), i))
        .collect();

    for node in &g2.nodes {
        let mut incoming = node.clone();
        incoming.id = prefixed(&options.node_prefix, &node.id);

        match node_index.get(&incoming.id) {
            None => {
                node_index.insert(incoming.id.clone(), nodes.len());
                nodes.push(incoming);
            }
            Some(&i) => match options.node_strategy {
                MergeStrategy::KeepFirst => {}
                MergeStrategy::KeepSecond => nodes[i] = incoming,
                MergeStrategy::Merge => {
                    if options.merge_node_properties {
                        union_properties(&mut nodes[i].properties, &incoming.properties);
                    }
                }
            },
        }
    }

    let node_ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

    let mut edges: Vec<Edge> = g1.edges.clone();
    let mut edge_index: HashMap<String, usize> = edges
        .iter()
        .enumerate()
        .map(|(i, e)| (merge_key(e), i))
        .collect();
    let mut dropped = 0;

    for edge in &g2.edges {
        let mut incoming = edge.clone();
        incoming.source = prefixed(&options.node_prefix, &edge.source);
        incoming.target = prefixed(&options.node_prefix, &edge.target);
        incoming.id = edge.id.as_deref().map(|id| prefixed(&options.edge_prefix, id));

        if !node_ids.contains(incoming.source.as_str())
            || !node_ids.contains(incoming.target.as_str())
        {
            dropped += 1;
            continue;
        }

        let key = merge_key(&incoming);
        match edge_index.get(&key) {
            None => {
                edge_index.insert(key, edges.len());
                edges.push(incoming);
            }
            Some(&i) => match options.edge_strategy {
                MergeStrategy::KeepFirst => {}
                MergeStrategy::KeepSecond => edges[i] = incoming,
                MergeStrategy::Merge => {
                    if options.merge_edge_properties {
                        union_properties(&mut edges[i].properties, &incoming.properties);
                    }
                }
            },
        }
    }

    if dropped > 0 {
        log::debug!("merge dropped {} edges with unresolved endpoints", dropped);
    }

    Graph {
        nodes,
        edges,
        metadata: merge_metadata(g1, g2),
    }
}

fn merge_metadata(g1: &Graph, g2: &Graph) -> Option<Metadata> {
    if g1.metadata.is_none() && g2.metadata.is_none() {
        return None;
    }

    let mut metadata = g1.metadata.clone().unwrap_or_default();
    if let Some(second) = &g2.metadata {
        for (k, v) in second {
            metadata.insert(k.clone(), v.clone());
        }
    }

    let describe = |g: &Graph| -> Option<String> {
        g.metadata
            .as_ref()
            .and_then(|m| m.get("description"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };
    if let (Some(d1), Some(d2)) = (describe(g1), describe(g2)) {
        metadata.insert("description".into(), format!("{}; {}", d1, d2).into());
    }

    if let (Some(n1), Some(n2)) = (g1.name(), g2.name()) {
        metadata.insert("name".into(), format!("{} + {}", n1, n2).into());
        metadata.insert("mergedFrom".into(), serde_json::json!([n1, n2]));
    }

    Some(metadata)
}
