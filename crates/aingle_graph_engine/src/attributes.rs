//! Visual attribute derivation.
//!
//! Maps structural or property values onto node sizes, edge weights and node
//! colors. Every function returns a new graph; only `style` (and, for edges,
//! `weight`) fields are written.
//!
//! Sizing and weighting share one post-processing chain: raw value, optional
//! `ln(value + 1)`, min-max normalization into `[0, 1]`, then rescaling into
//! the requested range.
//!
//! # Examples
//!
//! ```
//! use aingle_graph_engine::{
//!     calculate_node_sizes, Edge, Graph, Node, NodeSizeOptions, NodeSizeStrategy,
//! };
//!
//! let graph = Graph::from_parts(
//!     vec![Node::new("hub"), Node::new("a"), Node::new("b")],
//!     vec![Edge::new("hub", "a"), Edge::new("hub", "b")],
//! );
//!
//! let sized = calculate_node_sizes(&graph, &NodeSizeOptions::new(NodeSizeStrategy::Degree));
//! assert_eq!(sized.nodes[0].size(), Some(30.0));
//! assert_eq!(sized.nodes[1].size(), Some(5.0));
//! ```

use crate::metrics;
use crate::model::{Graph, Properties};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The ten-color categorical palette used by default for node coloring.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Source of the raw value behind a node's size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeSizeStrategy {
    /// Every node gets the same raw value.
    Fixed,
    /// Total degree.
    #[default]
    Degree,
    /// Incoming edge count.
    InDegree,
    /// Outgoing edge count.
    OutDegree,
    /// Numeric value of the configured property.
    Property,
    /// Approximated by degree.
    Betweenness,
    /// Approximated by degree.
    Closeness,
    /// Approximated by degree.
    PageRank,
}

impl NodeSizeStrategy {
    fn is_approximated(&self) -> bool {
        matches!(self, Self::Betweenness | Self::Closeness | Self::PageRank)
    }
}

/// Node sizing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeSizeOptions {
    /// Source of the raw value.
    pub strategy: NodeSizeStrategy,
    /// Size given to the smallest raw value.
    pub min_size: f64,
    /// Size given to the largest raw value.
    pub max_size: f64,
    /// Property read by [`NodeSizeStrategy::Property`].
    pub property_name: Option<String>,
    /// Apply `ln(value + 1)` before normalizing.
    pub logarithmic: bool,
}

impl Default for NodeSizeOptions {
    fn default() -> Self {
        Self {
            strategy: NodeSizeStrategy::Degree,
            min_size: 5.0,
            max_size: 30.0,
            property_name: None,
            logarithmic: false,
        }
    }
}

impl NodeSizeOptions {
    /// Default options for the given strategy.
    pub fn new(strategy: NodeSizeStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Sizes by the numeric value of `name`.
    pub fn by_property(name: impl Into<String>) -> Self {
        Self {
            strategy: NodeSizeStrategy::Property,
            property_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the output size range.
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }

    /// Enables the `ln(value + 1)` transform.
    pub fn logarithmic(mut self, logarithmic: bool) -> Self {
        self.logarithmic = logarithmic;
        self
    }
}

/// Source of the raw value behind an edge's weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeWeightStrategy {
    /// Every edge gets the same raw value.
    #[default]
    Fixed,
    /// Number of edges sharing the same ordered source-target pair.
    Count,
    /// Numeric value of the configured property.
    Property,
}

/// Edge weighting configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EdgeWeightOptions {
    /// Source of the raw value.
    pub strategy: EdgeWeightStrategy,
    /// Weight given to the smallest raw value.
    pub min_weight: f64,
    /// Weight given to the largest raw value.
    pub max_weight: f64,
    /// Property read by [`EdgeWeightStrategy::Property`].
    pub property_name: Option<String>,
    /// Apply `ln(value + 1)` before normalizing.
    pub logarithmic: bool,
}

impl Default for EdgeWeightOptions {
    fn default() -> Self {
        Self {
            strategy: EdgeWeightStrategy::Fixed,
            min_weight: 1.0,
            max_weight: 5.0,
            property_name: None,
            logarithmic: false,
        }
    }
}

impl EdgeWeightOptions {
    /// Default options for the given strategy.
    pub fn new(strategy: EdgeWeightStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Weights by the numeric value of `name`.
    pub fn by_property(name: impl Into<String>) -> Self {
        Self {
            strategy: EdgeWeightStrategy::Property,
            property_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the output weight range.
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min_weight = min;
        self.max_weight = max;
        self
    }

    /// Enables the `ln(value + 1)` transform.
    pub fn logarithmic(mut self, logarithmic: bool) -> Self {
        self.logarithmic = logarithmic;
        self
    }
}

/// Which value assigns a node to a color category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorStrategy {
    /// The node's `type`.
    #[default]
    ByType,
    /// The value of the named property.
    ByProperty(String),
}

/// Node coloring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeColorOptions {
    /// How nodes are grouped into categories.
    pub strategy: ColorStrategy,
    /// Colors assigned to categories in first-seen order, wrapping around.
    pub palette: Vec<String>,
    /// Color for nodes with no category.
    pub fallback_color: String,
}

impl Default for NodeColorOptions {
    fn default() -> Self {
        Self {
            strategy: ColorStrategy::ByType,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            fallback_color: "#999999".to_string(),
        }
    }
}

impl NodeColorOptions {
    /// Default palette and fallback for the given strategy.
    pub fn new(strategy: ColorStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Replaces the palette.
    pub fn palette<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.palette = colors.into_iter().map(Into::into).collect();
        self
    }
}

/// Reads a numeric property. Finite numbers and numeric strings count,
/// anything else (including a missing key, `"NaN"` or `"inf"`) is 0.
fn numeric_property(properties: Option<&Properties>, name: Option<&str>) -> f64 {
    let value = match (properties, name) {
        (Some(props), Some(name)) => props.get(name),
        _ => None,
    };
    let parsed = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Min-max normalizes `values` into `[0, 1]`, optionally through
/// `ln(value + 1)` first. When every value is equal all results are 0.
///
/// The log transform floors its input at 0. Non-finite inputs count as 0,
/// so the output never contains NaN or infinity.
///
/// ```
/// use aingle_graph_engine::attributes::normalize;
///
/// assert_eq!(normalize(&[2.0, 4.0, 6.0], false), vec![0.0, 0.5, 1.0]);
/// assert_eq!(normalize(&[3.0, 3.0], false), vec![0.0, 0.0]);
/// assert_eq!(normalize(&[-5.0, 0.0], true), vec![0.0, 0.0]);
/// ```
pub fn normalize(values: &[f64], logarithmic: bool) -> Vec<f64> {
    let values: Vec<f64> = values
        .iter()
        .map(|&v| if logarithmic { (v.max(0.0) + 1.0).ln() } else { v })
        .map(|v| if v.is_finite() { v } else { 0.0 })
        .collect();

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    // finite inputs far apart can still overflow the span
    let usable = span > 0.0 && span.is_finite();

    values
        .iter()
        .map(|v| if usable { ((v - min) / span).clamp(0.0, 1.0) } else { 0.0 })
        .collect()
}

fn rescale(values: &[f64], logarithmic: bool, min: f64, max: f64) -> Vec<f64> {
    normalize(values, logarithmic)
        .into_iter()
        .map(|t| min + t * (max - min))
        .collect()
}

/// Writes `style.size` onto every node of a copy of the graph.
pub fn calculate_node_sizes(graph: &Graph, options: &NodeSizeOptions) -> Graph {
    if options.strategy.is_approximated() {
        log::warn!("{:?} centrality is approximated by degree", options.strategy);
    }

    let raw: Vec<f64> = match options.strategy {
        NodeSizeStrategy::Fixed => vec![1.0; graph.nodes.len()],
        NodeSizeStrategy::InDegree => as_values(metrics::in_degree(graph)),
        NodeSizeStrategy::OutDegree => as_values(metrics::out_degree(graph)),
        NodeSizeStrategy::Property => graph
            .nodes
            .iter()
            .map(|n| numeric_property(n.properties.as_ref(), options.property_name.as_deref()))
            .collect(),
        NodeSizeStrategy::Degree
        | NodeSizeStrategy::Betweenness
        | NodeSizeStrategy::Closeness
        | NodeSizeStrategy::PageRank => as_values(metrics::degree(graph)),
    };

    let sizes = rescale(&raw, options.logarithmic, options.min_size, options.max_size);
    let mut result = graph.clone();
    for (node, size) in result.nodes.iter_mut().zip(sizes) {
        node.style_mut().size = Some(size);
    }
    result
}

fn as_values(degrees: metrics::DegreeMap) -> Vec<f64> {
    degrees.into_values().map(|d| d as f64).collect()
}

/// Writes `weight` and `style.width` onto every edge of a copy of the graph.
pub fn calculate_edge_weights(graph: &Graph, options: &EdgeWeightOptions) -> Graph {
    let raw: Vec<f64> = match options.strategy {
        EdgeWeightStrategy::Fixed => vec![1.0; graph.edges.len()],
        EdgeWeightStrategy::Count => {
            let mut counts: IndexMap<(&str, &str), usize> = IndexMap::new();
            for edge in &graph.edges {
                *counts
                    .entry((edge.source.as_str(), edge.target.as_str()))
                    .or_insert(0) += 1;
            }
            graph
                .edges
                .iter()
                .map(|e| counts[&(e.source.as_str(), e.target.as_str())] as f64)
                .collect()
        }
        EdgeWeightStrategy::Property => graph
            .edges
            .iter()
            .map(|e| numeric_property(e.properties.as_ref(), options.property_name.as_deref()))
            .collect(),
    };

    let weights = rescale(
        &raw,
        options.logarithmic,
        options.min_weight,
        options.max_weight,
    );
    let mut result = graph.clone();
    for (edge, weight) in result.edges.iter_mut().zip(weights) {
        edge.weight = Some(weight);
        edge.style_mut().width = Some(weight);
    }
    result
}

/// Writes `style.color` onto every node of a copy of the graph.
///
/// ```
/// use aingle_graph_engine::{calculate_node_colors, Graph, NodeBuilder, NodeColorOptions};
///
/// let mut graph = Graph::new();
/// graph.add_node(NodeBuilder::new("a").node_type("server").build());
/// graph.add_node(NodeBuilder::new("b").node_type("client").build());
/// graph.add_node(NodeBuilder::new("c").node_type("server").build());
///
/// let colored = calculate_node_colors(&graph, &NodeColorOptions::default());
/// let colors: Vec<_> = colored
///     .nodes
///     .iter()
///     .map(|n| n.style.as_ref().unwrap().color.clone().unwrap())
///     .collect();
/// assert_eq!(colors, vec!["#1f77b4", "#ff7f0e", "#1f77b4"]);
/// ```
pub fn calculate_node_colors(graph: &Graph, options: &NodeColorOptions) -> Graph {
    let mut categories: IndexMap<String, usize> = IndexMap::new();
    let mut result = graph.clone();

    for node in result.nodes.iter_mut() {
        let category = match &options.strategy {
            ColorStrategy::ByType => node.node_type.clone(),
            ColorStrategy::ByProperty(name) => match node.property(name) {
                None | Some(serde_json::Value::Null) => None,
                Some(serde_json::Value::String(s)) => Some(s.clone()),
                Some(other) => Some(other.to_string()),
            },
        };

        let color = match category {
            Some(category) if !options.palette.is_empty() => {
                let next = categories.len();
                let slot = *categories.entry(category).or_insert(next);
                options.palette[slot % options.palette.len()].clone()
            }
            _ => options.fallback_color.clone(),
        };
        node.style_mut().color = Some(color);
    }

    log::debug!("assigned colors to {} categories", categories.len());
    result
}
