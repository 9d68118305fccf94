//! AIngle Graph Engine - Graph Transforms for Visualization
//!
//! A pure, in-memory engine that turns a typed node/edge graph into a view
//! ready for rendering: narrow it, extract neighbourhoods, merge sources,
//! derive visual attributes, position nodes and summarize structure.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   AIngle Graph Engine                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │                  Render Pipeline                      │   │
//! │  │  filter → subgraph → sizes → colors → weights → layout│   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                           │                                  │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │                    Transforms                         │   │
//! │  │  Filter │ Subgraph │ Merge │ Attributes │ Layout     │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                           │                                  │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │              Metrics & Analysis                       │   │
//! │  │  Degrees │ Connectivity │ Histograms │ Density       │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                           │                                  │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │                  Graph Model                          │   │
//! │  │  Node │ Edge │ Style │ Properties │ Metadata         │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every transform takes `&Graph` and returns a new [`Graph`]. Malformed
//! references never fail a transform: edges pointing at missing nodes are
//! dropped or ignored.
//!
//! # Quick Start
//!
//! ```
//! use aingle_graph_engine::{
//!     analyze_graph, apply_layout, filter_graph, EdgeBuilder, Graph, GraphFilter,
//!     LayoutAlgorithm, LayoutOptions, NodeBuilder,
//! };
//!
//! let mut graph = Graph::new();
//! graph.add_node(NodeBuilder::new("web").node_type("service").build());
//! graph.add_node(NodeBuilder::new("api").node_type("service").build());
//! graph.add_node(NodeBuilder::new("cache").node_type("store").build());
//! graph.add_edge(EdgeBuilder::new("web", "api").label("calls").build());
//! graph.add_edge(EdgeBuilder::new("api", "cache").label("reads").build());
//!
//! let services = filter_graph(&graph, &GraphFilter::new().node_types(["service"]));
//! let placed = apply_layout(
//!     &services,
//!     &LayoutOptions::new(LayoutAlgorithm::ForceDirected).seed(42),
//! );
//!
//! let report = analyze_graph(&placed);
//! assert_eq!(report.node_count, 2);
//! assert!(report.is_connected);
//! ```

pub mod analysis;
pub mod attributes;
pub mod error;
pub mod filter;
pub mod layout;
pub mod merge;
pub mod metrics;
pub mod model;
pub mod pipeline;
pub mod subgraph;

// Re-exports
pub use analysis::{analyze_graph, GraphAnalysis};
pub use attributes::{
    calculate_edge_weights, calculate_node_colors, calculate_node_sizes, ColorStrategy,
    EdgeWeightOptions, EdgeWeightStrategy, NodeColorOptions, NodeSizeOptions, NodeSizeStrategy,
};
pub use error::{Error, Result};
pub use filter::{filter_graph, Element, ElementPredicate, GraphFilter};
pub use layout::{apply_layout, layout_nodes, ForceSimulation, LayoutAlgorithm, LayoutOptions};
pub use merge::{merge_graphs, MergeOptions, MergeStrategy};
pub use metrics::DegreeMap;
pub use model::{
    Edge, EdgeBuilder, EdgeStyle, Graph, Metadata, Node, NodeBuilder, NodeStyle, Position,
    Properties,
};
pub use pipeline::RenderPipeline;
pub use subgraph::{extract_subgraph, Direction, SubgraphOptions, TraversalOptions};
