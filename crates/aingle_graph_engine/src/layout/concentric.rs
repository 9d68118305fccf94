//! Degree-ordered concentric rings.

use super::LayoutOptions;
use crate::metrics;
use crate::model::{Edge, Node, Position};
use std::f64::consts::TAU;

/// Places higher-degree nodes on inner rings.
///
/// Nodes are sorted by total degree, descending and stable, then split into
/// `ceil(sqrt(n))` rings of `ceil(n / rings)` nodes. Ring `i` has radius
/// `(i + 1) * max_radius / rings`.
pub(super) fn layout(nodes: &mut [Node], edges: &[Edge], options: &LayoutOptions) {
    let n = nodes.len();
    if n == 0 {
        return;
    }

    let degrees = metrics::total_degree(nodes, edges);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(degrees.get(&nodes[i].id).copied().unwrap_or(0)));

    let rings = (n as f64).sqrt().ceil() as usize;
    let per_ring = n.div_ceil(rings);
    let (cx, cy) = options.center();
    let max_radius = options.max_radius();

    for (rank, &index) in order.iter().enumerate() {
        let ring = rank / per_ring;
        let slot = rank % per_ring;
        let in_ring = per_ring.min(n - ring * per_ring);

        let radius = (ring + 1) as f64 * max_radius / rings as f64;
        let angle = TAU * slot as f64 / in_ring as f64;
        nodes[index].position = Some(Position::new(
            cx + radius * angle.cos(),
            cy + radius * angle.sin(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hub_lands_on_inner_ring() {
        let mut nodes: Vec<Node> = ["leaf1", "leaf2", "hub", "leaf3"]
            .iter()
            .map(|id| Node::new(*id))
            .collect();
        let edges = vec![
            Edge::new("hub", "leaf1"),
            Edge::new("hub", "leaf2"),
            Edge::new("hub", "leaf3"),
        ];
        let options = LayoutOptions::default().size(400.0, 400.0).padding(0.0);
        layout(&mut nodes, &edges, &options);

        // 4 nodes -> 2 rings of 2; radii 100 and 200
        let center = Position::new(200.0, 200.0);
        let radius = |id: &str| {
            nodes
                .iter()
                .find(|n| n.id == id)
                .unwrap()
                .position
                .unwrap()
                .distance(&center)
        };

        assert!((radius("hub") - 100.0).abs() < 1e-9);
        // Stable sort keeps leaf1 ahead of the other leaves
        assert!((radius("leaf1") - 100.0).abs() < 1e-9);
        assert!((radius("leaf2") - 200.0).abs() < 1e-9);
        assert!((radius("leaf3") - 200.0).abs() < 1e-9);
    }
}
