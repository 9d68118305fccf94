//! Single-circle placement.

use super::LayoutOptions;
use crate::model::{Node, Position};
use std::f64::consts::TAU;

/// Spaces nodes evenly around a circle centered on the canvas. The first
/// node sits at angle zero (to the right of the center).
pub(super) fn layout(nodes: &mut [Node], options: &LayoutOptions) {
    let n = nodes.len();
    if n == 0 {
        return;
    }

    let (cx, cy) = options.center();
    let radius = options.max_radius();

    for (i, node) in nodes.iter_mut().enumerate() {
        let angle = TAU * i as f64 / n as f64;
        node.position = Some(Position::new(
            cx + radius * angle.cos(),
            cy + radius * angle.sin(),
        ));
    }
}
