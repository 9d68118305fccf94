//! Layout engine: writes a `position` onto every node.
//!
//! Five algorithms share one contract: they receive an already-cloned node
//! slice plus the edge list and assign positions in place. [`apply_layout`]
//! wraps that contract for whole graphs and returns a new [`Graph`].
//!
//! | Algorithm | Placement |
//! |---|---|
//! | [`LayoutAlgorithm::Grid`] | row-major cells, `ceil(sqrt(n))` columns |
//! | [`LayoutAlgorithm::Circular`] | evenly spaced around one circle |
//! | [`LayoutAlgorithm::Random`] | uniform inside the padded canvas |
//! | [`LayoutAlgorithm::Concentric`] | rings by descending degree |
//! | [`LayoutAlgorithm::ForceDirected`] | Fruchterman–Reingold simulation |
//!
//! # Examples
//!
//! ```
//! use aingle_graph_engine::{apply_layout, EdgeBuilder, Graph, LayoutAlgorithm, LayoutOptions, NodeBuilder};
//!
//! let mut graph = Graph::new();
//! for id in ["a", "b", "c", "d"] {
//!     graph.add_node(NodeBuilder::new(id).build());
//! }
//! graph.add_edge(EdgeBuilder::new("a", "b").build());
//!
//! let options = LayoutOptions::new(LayoutAlgorithm::Circular).size(400.0, 400.0);
//! let placed = apply_layout(&graph, &options);
//!
//! assert!(placed.nodes.iter().all(|n| n.position.is_some()));
//! assert!(graph.nodes.iter().all(|n| n.position.is_none()));
//! ```

mod circular;
mod concentric;
mod force;
mod grid;
mod random;

pub use force::ForceSimulation;

use crate::model::{Edge, Graph, Node};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The positioning algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutAlgorithm {
    /// Row-major grid.
    #[default]
    Grid,
    /// Single circle.
    Circular,
    /// Uniform random placement.
    Random,
    /// Degree-ordered concentric rings.
    Concentric,
    /// Iterative force simulation.
    ForceDirected,
}

impl LayoutAlgorithm {
    /// Parses an algorithm name. Unknown names fall back to [`LayoutAlgorithm::Grid`].
    ///
    /// ```
    /// use aingle_graph_engine::LayoutAlgorithm;
    ///
    /// assert_eq!(LayoutAlgorithm::from_name("force"), LayoutAlgorithm::ForceDirected);
    /// assert_eq!(LayoutAlgorithm::from_name("Concentric"), LayoutAlgorithm::Concentric);
    /// assert_eq!(LayoutAlgorithm::from_name("spiral"), LayoutAlgorithm::Grid);
    /// ```
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "grid" => Self::Grid,
            "circular" | "circle" => Self::Circular,
            "random" => Self::Random,
            "concentric" => Self::Concentric,
            "force" | "force-directed" | "forcedirected" => Self::ForceDirected,
            other => {
                log::warn!("unknown layout algorithm '{}', falling back to grid", other);
                Self::Grid
            }
        }
    }

    /// Canonical name, accepted back by [`from_name`](Self::from_name).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Circular => "circular",
            Self::Random => "random",
            Self::Concentric => "concentric",
            Self::ForceDirected => "force",
        }
    }
}

impl fmt::Display for LayoutAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LayoutAlgorithm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LayoutAlgorithm {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

/// Canvas and simulation parameters for a layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    /// Algorithm to run.
    pub algorithm: LayoutAlgorithm,
    /// Canvas width.
    pub width: f64,
    /// Canvas height.
    pub height: f64,
    /// Margin kept free on every side by grid, circular, random and concentric.
    pub padding: f64,
    /// Force simulation iteration budget.
    pub iterations: usize,
    /// Ideal edge length. Defaults to `sqrt(width * height / n)`.
    pub k: Option<f64>,
    /// Force simulation clamp margin.
    pub node_spacing: f64,
    /// Seed for random placement. `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            algorithm: LayoutAlgorithm::Grid,
            width: 800.0,
            height: 600.0,
            padding: 50.0,
            iterations: 100,
            k: None,
            node_spacing: 10.0,
            seed: None,
        }
    }
}

impl LayoutOptions {
    /// Default options for the given algorithm.
    pub fn new(algorithm: LayoutAlgorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    /// Sets the canvas size.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the padding.
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the force simulation iteration budget.
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the ideal edge length.
    pub fn ideal_length(mut self, k: f64) -> Self {
        self.k = Some(k);
        self
    }

    /// Sets the force simulation clamp margin.
    pub fn node_spacing(mut self, spacing: f64) -> Self {
        self.node_spacing = spacing;
        self
    }

    /// Fixes the random seed, making random and force layouts reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Center of the canvas.
    pub(crate) fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Largest radius that keeps the padding on the shorter side.
    pub(crate) fn max_radius(&self) -> f64 {
        (self.width.min(self.height) / 2.0 - self.padding).max(0.0)
    }
}

/// Positions the nodes in place according to `options.algorithm`.
pub fn layout_nodes(nodes: &mut [Node], edges: &[Edge], options: &LayoutOptions) {
    if nodes.is_empty() {
        return;
    }
    log::debug!(
        "running {} layout over {} nodes",
        options.algorithm,
        nodes.len()
    );

    match options.algorithm {
        LayoutAlgorithm::Grid => grid::layout(nodes, options),
        LayoutAlgorithm::Circular => circular::layout(nodes, options),
        LayoutAlgorithm::Random => random::layout(nodes, options, &mut options.rng()),
        LayoutAlgorithm::Concentric => concentric::layout(nodes, edges, options),
        LayoutAlgorithm::ForceDirected => {
            let mut simulation = ForceSimulation::new(nodes, edges, options);
            simulation.run(options.iterations);
            simulation.write_positions(nodes);
        }
    }
}

/// Runs a layout pass over a copy of the graph.
pub fn apply_layout(graph: &Graph, options: &LayoutOptions) -> Graph {
    let mut result = graph.clone();
    layout_nodes(&mut result.nodes, &result.edges, options);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EdgeBuilder;

    fn nodes(n: usize) -> Vec<Node> {
        (0..n).map(|i| Node::new(format!("n{}", i))).collect()
    }

    #[test]
    fn test_algorithm_names_round_trip() {
        for algorithm in [
            LayoutAlgorithm::Grid,
            LayoutAlgorithm::Circular,
            LayoutAlgorithm::Random,
            LayoutAlgorithm::Concentric,
            LayoutAlgorithm::ForceDirected,
        ] {
            assert_eq!(LayoutAlgorithm::from_name(algorithm.as_str()), algorithm);
        }
    }

    #[test]
    fn test_unknown_algorithm_deserializes_to_grid() {
        let options: LayoutOptions =
            serde_json::from_str(r#"{"algorithm":"hexagonal","width":100}"#).unwrap();
        assert_eq!(options.algorithm, LayoutAlgorithm::Grid);
        assert_eq!(options.width, 100.0);
        assert_eq!(options.height, 600.0);
    }

    #[test]
    fn test_every_algorithm_positions_every_node() {
        let mut graph = Graph::from_parts(nodes(7), Vec::new());
        graph.add_edge(EdgeBuilder::new("n0", "n1").build());
        graph.add_edge(EdgeBuilder::new("n1", "n2").build());

        for algorithm in [
            LayoutAlgorithm::Grid,
            LayoutAlgorithm::Circular,
            LayoutAlgorithm::Random,
            LayoutAlgorithm::Concentric,
            LayoutAlgorithm::ForceDirected,
        ] {
            let options = LayoutOptions::new(algorithm).seed(7).iterations(20);
            let placed = apply_layout(&graph, &options);
            for node in &placed.nodes {
                let p = node.position.expect("position assigned");
                assert!(p.x.is_finite() && p.y.is_finite(), "{} produced {:?}", algorithm, p);
                assert!((0.0..=options.width).contains(&p.x));
                assert!((0.0..=options.height).contains(&p.y));
            }
        }
    }

    #[test]
    fn test_empty_graph_layout() {
        let placed = apply_layout(
            &Graph::new(),
            &LayoutOptions::new(LayoutAlgorithm::ForceDirected),
        );
        assert!(placed.nodes.is_empty());
    }

    #[test]
    fn test_apply_layout_does_not_touch_input() {
        let graph = Graph::from_parts(nodes(3), Vec::new());
        let _ = apply_layout(&graph, &LayoutOptions::default());
        assert!(graph.nodes.iter().all(|n| n.position.is_none()));
    }
}
