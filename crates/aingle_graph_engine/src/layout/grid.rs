//! Row-major grid placement.

use super::LayoutOptions;
use crate::model::{Node, Position};

/// Packs nodes into a `ceil(sqrt(n))`-column grid spanning the padded canvas.
/// Each node sits at the center of its cell.
pub(super) fn layout(nodes: &mut [Node], options: &LayoutOptions) {
    let n = nodes.len();
    if n == 0 {
        return;
    }

    let cols = (n as f64).sqrt().ceil() as usize;
    let rows = n.div_ceil(cols);

    let usable_width = (options.width - 2.0 * options.padding).max(0.0);
    let usable_height = (options.height - 2.0 * options.padding).max(0.0);
    let cell_width = usable_width / cols as f64;
    let cell_height = usable_height / rows as f64;

    for (i, node) in nodes.iter_mut().enumerate() {
        let col = i % cols;
        let row = i / cols;
        node.position = Some(Position::new(
            options.padding + (col as f64 + 0.5) * cell_width,
            options.padding + (row as f64 + 0.5) * cell_height,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_cells() {
        let mut nodes: Vec<Node> = (0..4).map(|i| Node::new(i.to_string())).collect();
        let options = LayoutOptions::default().size(200.0, 200.0).padding(0.0);
        layout(&mut nodes, &options);

        let positions: Vec<Position> = nodes.iter().map(|n| n.position.unwrap()).collect();
        assert_eq!(positions[0], Position::new(50.0, 50.0));
        assert_eq!(positions[1], Position::new(150.0, 50.0));
        assert_eq!(positions[2], Position::new(50.0, 150.0));
        assert_eq!(positions[3], Position::new(150.0, 150.0));
    }

    #[test]
    fn test_grid_partial_last_row() {
        // 5 nodes -> 3 columns, 2 rows
        let mut nodes: Vec<Node> = (0..5).map(|i| Node::new(i.to_string())).collect();
        let options = LayoutOptions::default().size(300.0, 200.0).padding(0.0);
        layout(&mut nodes, &options);

        assert_eq!(nodes[2].position, Some(Position::new(250.0, 50.0)));
        assert_eq!(nodes[3].position, Some(Position::new(50.0, 150.0)));
    }
}
