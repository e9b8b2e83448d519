//! Circular layout: nodes evenly spaced on a ring, clockwise from 12 o'clock

use std::f64::consts::PI;

use super::config::LayoutConfig;
use super::types::{Point, Positions, Vector};

/// Ring radius that keeps a node of `node_width` clear of the padding
pub fn ring_radius(config: &LayoutConfig) -> f64 {
    let half_extent = config.canvas_width.min(config.canvas_height) / 2.0;
    (half_extent - config.padding - config.node_width / 2.0).max(0.0)
}

/// Place `ids` around the canvas center in input order
pub fn circular_layout<'a, I>(ids: I, config: &LayoutConfig) -> Positions
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: ExactSizeIterator,
{
    let ids = ids.into_iter();
    let count = ids.len();
    let center = Point::new(config.center_x(), config.center_y());

    if count == 1 {
        return ids.map(|id| (id.to_string(), center)).collect();
    }

    let radius = ring_radius(config);
    ids.enumerate()
        .map(|(i, id)| {
            // y grows downwards, so increasing angle runs clockwise
            let angle = -PI / 2.0 + 2.0 * PI * i as f64 / count as f64;
            let p = center.offset(Vector::angled(angle).scale(radius));
            (
                id.to_string(),
                Point::new(
                    config.clamp_x(p.x, config.node_width),
                    config.clamp_y(p.y, config.node_height),
                ),
            )
        })
        .collect()
}
