//! Fruchterman–Reingold force simulation.
//!
//! Every pair of nodes repels with magnitude `k² / d`, every edge attracts its
//! endpoints with magnitude `d² / k`. Displacements are damped and capped by a
//! temperature that cools linearly to zero over the iteration budget:
//!
//! ```text
//! temperature(i) = k * (1 - i / iterations)
//! damping(i)     =      1 - i / iterations
//! ```
//!
//! Both are computed at the start of each iteration, before any node moves.
//! The simulation runs a fixed budget with no convergence test.
//!
//! [`ForceSimulation`] can be stepped in chunks so callers laying out large
//! graphs can interleave iterations with other work.

use super::{random, LayoutOptions};
use crate::model::{Edge, Node, Position};
use std::collections::HashMap;

/// Distances are floored here to avoid the `k² / d` singularity.
const MIN_DISTANCE: f64 = 0.1;

/// An in-progress force-directed layout.
///
/// # Examples
///
/// ```
/// use aingle_graph_engine::{Edge, ForceSimulation, LayoutAlgorithm, LayoutOptions, Node};
///
/// let mut nodes = vec![Node::new("a"), Node::new("b"), Node::new("c")];
/// let edges = vec![Edge::new("a", "b"), Edge::new("b", "c")];
/// let options = LayoutOptions::new(LayoutAlgorithm::ForceDirected)
///     .iterations(50)
///     .seed(1);
///
/// let mut simulation = ForceSimulation::new(&nodes, &edges, &options);
/// while !simulation.is_finished() {
///     simulation.run(10);
/// }
/// simulation.write_positions(&mut nodes);
///
/// assert_eq!(simulation.iteration(), 50);
/// assert!(nodes.iter().all(|n| n.position.is_some()));
/// ```
#[derive(Debug, Clone)]
pub struct ForceSimulation {
    ids: Vec<String>,
    positions: Vec<Position>,
    links: Vec<(usize, usize)>,
    k: f64,
    iterations: usize,
    iteration: usize,
    width: f64,
    height: f64,
    node_spacing: f64,
}

impl ForceSimulation {
    /// Prepares a simulation over the given nodes.
    ///
    /// Existing positions are kept as the starting state. If no node has a
    /// position, every node is seeded randomly; otherwise only the nodes
    /// lacking one are. Edges whose endpoints are not among `nodes` are
    /// ignored.
    pub fn new(nodes: &[Node], edges: &[Edge], options: &LayoutOptions) -> Self {
        let mut rng = options.rng();
        let positions = nodes
            .iter()
            .map(|n| n.position.unwrap_or_else(|| random::sample(options, &mut rng)))
            .collect();

        let index: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();
        let links = edges
            .iter()
            .filter_map(|e| {
                let s = *index.get(e.source.as_str())?;
                let t = *index.get(e.target.as_str())?;
                (s != t).then_some((s, t))
            })
            .collect();

        let k = match options.k {
            Some(k) => k,
            None if nodes.is_empty() => 0.0,
            None => (options.width * options.height / nodes.len() as f64).sqrt(),
        };

        Self {
            ids: nodes.iter().map(|n| n.id.clone()).collect(),
            positions,
            links,
            k,
            iterations: options.iterations,
            iteration: 0,
            width: options.width,
            height: options.height,
            node_spacing: options.node_spacing,
        }
    }

    /// Ideal edge length in use.
    pub fn ideal_length(&self) -> f64 {
        self.k
    }

    /// Number of iterations already run.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Returns `true` once the iteration budget is spent.
    pub fn is_finished(&self) -> bool {
        self.iteration >= self.iterations
    }

    /// Cap on per-node displacement for iteration `i`.
    pub fn temperature(&self, i: usize) -> f64 {
        self.k * self.cooling(i)
    }

    fn cooling(&self, i: usize) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        (1.0 - i as f64 / self.iterations as f64).max(0.0)
    }

    /// Current positions, in node order.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Current position of a node by id.
    pub fn position(&self, id: &str) -> Option<Position> {
        self.ids
            .iter()
            .position(|n| n == id)
            .map(|i| self.positions[i])
    }

    /// Runs one iteration. Returns `false` if the budget was already spent.
    pub fn step(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }

        let temperature = self.temperature(self.iteration);
        let damping = self.cooling(self.iteration);
        let n = self.positions.len();
        let k_squared = self.k * self.k;
        let mut forces = vec![(0.0_f64, 0.0_f64); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let (ux, uy, dist) = direction(self.positions[i], self.positions[j]);
                let repulse = k_squared / dist;
                forces[i].0 += ux * repulse;
                forces[i].1 += uy * repulse;
                forces[j].0 -= ux * repulse;
                forces[j].1 -= uy * repulse;
            }
        }

        if self.k > 0.0 {
            for &(s, t) in &self.links {
                let (ux, uy, dist) = direction(self.positions[s], self.positions[t]);
                let attract = dist * dist / self.k;
                forces[s].0 -= ux * attract;
                forces[s].1 -= uy * attract;
                forces[t].0 += ux * attract;
                forces[t].1 += uy * attract;
            }
        }

        let max_x = (self.width - self.node_spacing).max(self.node_spacing);
        let max_y = (self.height - self.node_spacing).max(self.node_spacing);

        for (position, (fx, fy)) in self.positions.iter_mut().zip(forces) {
            let mut dx = fx * damping;
            let mut dy = fy * damping;
            let magnitude = (dx * dx + dy * dy).sqrt();
            if magnitude > temperature {
                let scale = temperature / magnitude;
                dx *= scale;
                dy *= scale;
            }
            position.x = (position.x + dx).clamp(self.node_spacing, max_x);
            position.y = (position.y + dy).clamp(self.node_spacing, max_y);
        }

        self.iteration += 1;
        true
    }

    /// Runs up to `count` iterations and returns how many actually ran.
    pub fn run(&mut self, count: usize) -> usize {
        let mut ran = 0;
        while ran < count && self.step() {
            ran += 1;
        }
        ran
    }

    /// Copies the current positions onto matching nodes by id.
    pub fn write_positions(&self, nodes: &mut [Node]) {
        let by_id: HashMap<&str, Position> = self
            .ids
            .iter()
            .map(String::as_str)
            .zip(self.positions.iter().copied())
            .collect();
        for node in nodes.iter_mut() {
            if let Some(&p) = by_id.get(node.id.as_str()) {
                node.position = Some(p);
            }
        }
    }
}

/// Unit vector from `b` to `a` and the floored distance between them.
///
/// Coincident points get a fixed horizontal direction so they still separate.
fn direction(a: Position, b: Position) -> (f64, f64, f64) {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        return (1.0, 0.0, MIN_DISTANCE);
    }
    (dx / length, dy / length, length.max(MIN_DISTANCE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutAlgorithm;

    fn options() -> LayoutOptions {
        LayoutOptions::new(LayoutAlgorithm::ForceDirected)
            .size(500.0, 500.0)
            .iterations(100)
            .seed(11)
    }

    fn chain(n: usize) -> (Vec<Node>, Vec<Edge>) {
        let nodes: Vec<Node> = (0..n).map(|i| Node::new(format!("n{}", i))).collect();
        let edges = (1..n)
            .map(|i| Edge::new(format!("n{}", i - 1), format!("n{}", i)))
            .collect();
        (nodes, edges)
    }

    #[test]
    fn test_cooling_schedule() {
        let (nodes, edges) = chain(4);
        let sim = ForceSimulation::new(&nodes, &edges, &options().ideal_length(20.0));
        assert_eq!(sim.temperature(0), 20.0);
        assert_eq!(sim.temperature(50), 10.0);
        assert_eq!(sim.temperature(100), 0.0);
    }

    #[test]
    fn test_default_ideal_length() {
        let (nodes, edges) = chain(4);
        let sim = ForceSimulation::new(&nodes, &edges, &options());
        assert!((sim.ideal_length() - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_result() {
        let (nodes, edges) = chain(6);
        let mut a = ForceSimulation::new(&nodes, &edges, &options());
        let mut b = ForceSimulation::new(&nodes, &edges, &options());
        a.run(100);
        b.run(100);

        for (pa, pb) in a.positions().iter().zip(b.positions()) {
            assert!(pa.distance(pb) < 1e-9);
        }
    }

    #[test]
    fn test_chunked_run_matches_single_run() {
        let (nodes, edges) = chain(5);
        let mut whole = ForceSimulation::new(&nodes, &edges, &options());
        whole.run(100);

        let mut chunked = ForceSimulation::new(&nodes, &edges, &options());
        while chunked.run(7) > 0 {}

        assert_eq!(chunked.iteration(), 100);
        assert_eq!(whole.positions(), chunked.positions());
        assert!(!chunked.step());
    }

    #[test]
    fn test_positions_respect_spacing_clamp() {
        let (nodes, edges) = chain(12);
        let mut sim = ForceSimulation::new(&nodes, &edges, &options().node_spacing(25.0));
        sim.run(100);
        for p in sim.positions() {
            assert!((25.0..=475.0).contains(&p.x));
            assert!((25.0..=475.0).contains(&p.y));
        }
    }

    #[test]
    fn test_coincident_nodes_separate() {
        let nodes = vec![
            crate::model::NodeBuilder::new("a").position(250.0, 250.0).build(),
            crate::model::NodeBuilder::new("b").position(250.0, 250.0).build(),
        ];
        let mut sim = ForceSimulation::new(&nodes, &[], &options());
        sim.step();

        let a = sim.position("a").unwrap();
        let b = sim.position("b").unwrap();
        assert!(a.distance(&b) > 1.0);
        assert!(a.x.is_finite() && b.x.is_finite());
    }

    #[test]
    fn test_connected_pair_ends_closer_than_unconnected() {
        let nodes: Vec<Node> = ["a", "b", "c"].iter().map(|id| Node::new(*id)).collect();
        let edges = vec![Edge::new("a", "b")];
        let mut sim = ForceSimulation::new(&nodes, &edges, &options().ideal_length(60.0));
        sim.run(100);

        let a = sim.position("a").unwrap();
        let b = sim.position("b").unwrap();
        let c = sim.position("c").unwrap();
        assert!(a.distance(&b) < a.distance(&c));
        assert!(a.distance(&b) < b.distance(&c));
    }

    #[test]
    fn test_existing_positions_are_kept_as_start() {
        let nodes = vec![
            crate::model::NodeBuilder::new("a").position(100.0, 100.0).build(),
            crate::model::NodeBuilder::new("b").position(400.0, 400.0).build(),
        ];
        let sim = ForceSimulation::new(&nodes, &[], &options());
        assert_eq!(sim.position("a"), Some(Position::new(100.0, 100.0)));
        assert_eq!(sim.position("b"), Some(Position::new(400.0, 400.0)));
    }

    #[test]
    fn test_zero_iterations_is_finished() {
        let (nodes, edges) = chain(3);
        let mut sim = ForceSimulation::new(&nodes, &edges, &options().iterations(0));
        assert!(sim.is_finished());
        assert_eq!(sim.run(10), 0);
    }
}
