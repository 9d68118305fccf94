//! A configurable chain of transforms for rendering one view of a graph.
//!
//! Stages run in a fixed order, each one optional:
//!
//! ```text
//! filter -> extract subgraph -> node sizes -> node colors -> edge weights -> layout
//! ```

use crate::attributes::{
    calculate_edge_weights, calculate_node_colors, calculate_node_sizes, EdgeWeightOptions,
    NodeColorOptions, NodeSizeOptions,
};
use crate::error::{Error, Result};
use crate::filter::{filter_graph, GraphFilter};
use crate::layout::{apply_layout, LayoutOptions};
use crate::model::Graph;
use crate::subgraph::{extract_subgraph, SubgraphOptions};
use serde::{Deserialize, Serialize};

/// Stage configuration for [`RenderPipeline::run`].
///
/// # Examples
///
/// ```
/// use aingle_graph_engine::{Edge, Graph, Node, RenderPipeline};
///
/// let pipeline = RenderPipeline::from_json(r#"{
///     "nodeSizes": { "strategy": "degree" },
///     "layout": { "algorithm": "circular", "width": 400, "height": 400 }
/// }"#).unwrap();
///
/// let graph = Graph::from_parts(
///     vec![Node::new("a"), Node::new("b")],
///     vec![Edge::new("a", "b")],
/// );
/// let view = pipeline.run(&graph);
/// assert!(view.nodes.iter().all(|n| n.position.is_some() && n.size().is_some()));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderPipeline {
    /// Narrows the graph first.
    pub filter: Option<GraphFilter>,
    /// Extracts a neighbourhood from the filtered graph.
    pub subgraph: Option<SubgraphOptions>,
    /// Writes `style.size` onto nodes.
    pub node_sizes: Option<NodeSizeOptions>,
    /// Writes `style.color` onto nodes.
    pub node_colors: Option<NodeColorOptions>,
    /// Writes `weight` and `style.width` onto edges.
    pub edge_weights: Option<EdgeWeightOptions>,
    /// Positions nodes last.
    pub layout: Option<LayoutOptions>,
}

impl RenderPipeline {
    /// An empty pipeline; [`run`](Self::run) returns a copy of its input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a pipeline from camelCase JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("invalid pipeline: {}", e)))
    }

    /// Sets the filter stage.
    pub fn filter(mut self, filter: GraphFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the extraction stage.
    pub fn subgraph(mut self, options: SubgraphOptions) -> Self {
        self.subgraph = Some(options);
        self
    }

    /// Sets the node sizing stage.
    pub fn node_sizes(mut self, options: NodeSizeOptions) -> Self {
        self.node_sizes = Some(options);
        self
    }

    /// Sets the node coloring stage.
    pub fn node_colors(mut self, options: NodeColorOptions) -> Self {
        self.node_colors = Some(options);
        self
    }

    /// Sets the edge weighting stage.
    pub fn edge_weights(mut self, options: EdgeWeightOptions) -> Self {
        self.edge_weights = Some(options);
        self
    }

    /// Sets the layout stage.
    pub fn layout(mut self, options: LayoutOptions) -> Self {
        self.layout = Some(options);
        self
    }

    /// Applies every configured stage in order to a copy of `graph`.
    pub fn run(&self, graph: &Graph) -> Graph {
        let mut current = graph.clone();

        if let Some(filter) = &self.filter {
            current = filter_graph(&current, filter);
            log::debug!("pipeline filter: {} nodes remain", current.node_count());
        }
        if let Some(options) = &self.subgraph {
            current = extract_subgraph(&current, options);
            log::debug!("pipeline subgraph: {} nodes extracted", current.node_count());
        }
        if let Some(options) = &self.node_sizes {
            current = calculate_node_sizes(&current, options);
            log::debug!("pipeline sizes: {:?}", options.strategy);
        }
        if let Some(options) = &self.node_colors {
            current = calculate_node_colors(&current, options);
            log::debug!("pipeline colors: {:?}", options.strategy);
        }
        if let Some(options) = &self.edge_weights {
            current = calculate_edge_weights(&current, options);
            log::debug!("pipeline weights: {:?}", options.strategy);
        }
        if let Some(options) = &self.layout {
            current = apply_layout(&current, options);
            log::debug!("pipeline layout: {}", options.algorithm);
        }

        current
    }
}
