//! Grid layout: row-major cells centered in the usable canvas area

use super::config::LayoutConfig;
use super::types::{Point, Positions};

/// Cell and block geometry for `count` nodes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridShape {
    pub columns: usize,
    pub rows: usize,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl GridShape {
    /// Widest arrangement that fits the usable width, never wider than `count`
    pub fn for_count(count: usize, config: &LayoutConfig) -> Self {
        let cell_width = config.node_width + config.min_node_spacing;
        let cell_height = config.node_height + config.min_node_spacing;
        let fit = (config.usable_width() / cell_width).floor() as usize;
        let columns = fit.clamp(1, count.max(1));
        let rows = count.div_ceil(columns);
        Self {
            columns,
            rows,
            cell_width,
            cell_height,
        }
    }

    pub fn block_width(&self) -> f64 {
        self.columns as f64 * self.cell_width
    }

    pub fn block_height(&self) -> f64 {
        self.rows as f64 * self.cell_height
    }
}

/// Place `ids` row by row in input order
pub fn grid_layout<'a, I>(ids: I, config: &LayoutConfig) -> Positions
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: ExactSizeIterator,
{
    let ids = ids.into_iter();
    let shape = GridShape::for_count(ids.len(), config);
    let origin_x = config.padding + (config.usable_width() - shape.block_width()) / 2.0;
    let origin_y = config.padding + (config.usable_height() - shape.block_height()) / 2.0;

    ids.enumerate()
        .map(|(i, id)| {
            let column = i % shape.columns;
            let row = i / shape.columns;
            let x = origin_x + (column as f64 + 0.5) * shape.cell_width;
            let y = origin_y + (row as f64 + 0.5) * shape.cell_height;
            (
                id.to_string(),
                Point::new(
                    config.clamp_x(x, config.node_width),
                    config.clamp_y(y, config.node_height),
                ),
            )
        })
        .collect()
}
