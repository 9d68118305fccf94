//! Uniform random placement.

use super::LayoutOptions;
use crate::model::{Node, Position};
use rand::Rng;

/// Samples a point uniformly inside the padded canvas.
pub(super) fn sample<R: Rng + ?Sized>(options: &LayoutOptions, rng: &mut R) -> Position {
    let span_x = (options.width - 2.0 * options.padding).max(0.0);
    let span_y = (options.height - 2.0 * options.padding).max(0.0);
    Position::new(
        options.padding + rng.random::<f64>() * span_x,
        options.padding + rng.random::<f64>() * span_y,
    )
}

/// Places every node at an independent uniform sample.
pub(super) fn layout<R: Rng + ?Sized>(nodes: &mut [Node], options: &LayoutOptions, rng: &mut R) {
    for node in nodes.iter_mut() {
        node.position = Some(sample(options, rng));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes() -> Vec<Node> {
        (0..50).map(|i| Node::new(i.to_string())).collect()
    }

    #[test]
    fn test_random_stays_inside_padding() {
        let options = LayoutOptions::default().size(200.0, 100.0).padding(20.0);
        let mut placed = nodes();
        layout(&mut placed, &options, &mut options.rng());

        for node in &placed {
            let p = node.position.unwrap();
            assert!((20.0..=180.0).contains(&p.x));
            assert!((20.0..=80.0).contains(&p.y));
        }
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let options = LayoutOptions::default().seed(42);
        let mut first = nodes();
        let mut second = nodes();
        layout(&mut first, &options, &mut options.rng());
        layout(&mut second, &options, &mut options.rng());
        assert_eq!(first, second);
    }

    #[test]
    fn test_degenerate_canvas() {
        let options = LayoutOptions::default().size(50.0, 50.0).padding(40.0);
        let mut placed = nodes();
        layout(&mut placed, &options, &mut options.rng());
        assert!(placed
            .iter()
            .all(|n| n.position == Some(Position::new(40.0, 40.0))));
    }
}
