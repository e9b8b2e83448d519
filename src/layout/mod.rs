//! Layout engine for computing node positions
//!
//! Every strategy takes the same inputs (nodes, edges, configuration) and
//! returns one position per node, clamped inside the padded canvas. The
//! strategy is chosen once at the call boundary through [`LayoutStrategy`].

pub mod circular;
pub mod config;
pub mod force;
pub mod grid;
pub mod overlap;
pub mod types;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use circular::circular_layout;
pub use config::{ConfigError, LayoutConfig};
pub use force::{force_layout, simulate, ForceOutcome};
pub use grid::grid_layout;
pub use overlap::{find_overlaps, has_overlaps, nodes_overlap};
pub use types::*;

/// Layout algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutStrategy {
    /// Physics simulation with repulsion, edge springs and center gravity
    Force,
    /// Row-major grid in input order
    Grid,
    /// Evenly spaced ring in input order
    Circular,
    /// Force layout only when the current positions overlap
    #[default]
    Smart,
}

impl LayoutStrategy {
    pub const ALL: [LayoutStrategy; 4] = [
        LayoutStrategy::Force,
        LayoutStrategy::Grid,
        LayoutStrategy::Circular,
        LayoutStrategy::Smart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutStrategy::Force => "force",
            LayoutStrategy::Grid => "grid",
            LayoutStrategy::Circular => "circular",
            LayoutStrategy::Smart => "smart",
        }
    }

    /// Compute positions for `nodes` with this strategy
    pub fn apply(&self, nodes: &[Node], edges: &[Edge], config: &LayoutConfig) -> Positions {
        tracing::debug!(
            strategy = self.as_str(),
            nodes = nodes.len(),
            edges = edges.len(),
            "computing layout"
        );
        let ids = || nodes.iter().map(|n| n.id.as_str());
        match self {
            LayoutStrategy::Force => force_layout(nodes, edges, config),
            LayoutStrategy::Grid => grid_layout(ids(), config),
            LayoutStrategy::Circular => circular_layout(ids(), config),
            LayoutStrategy::Smart => smart_layout(nodes, edges, config),
        }
    }
}

impl fmt::Display for LayoutStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strategy name that is not one of `force`, `grid`, `circular`, `smart`
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown layout strategy '{0}' (expected force, grid, circular or smart)")]
pub struct UnknownStrategy(pub String);

impl FromStr for LayoutStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

/// Compute positions with the given strategy
pub fn layout(
    nodes: &[Node],
    edges: &[Edge],
    strategy: LayoutStrategy,
    config: &LayoutConfig,
) -> Positions {
    strategy.apply(nodes, edges, config)
}

/// Run force layout only if some pair of nodes overlaps.
///
/// When nothing overlaps the current positions are returned as they are,
/// so calling this after every edit is cheap.
pub fn smart_layout(nodes: &[Node], edges: &[Edge], config: &LayoutConfig) -> Positions {
    if has_overlaps(nodes, config.min_node_spacing) {
        force_layout(nodes, edges, config)
    } else {
        tracing::debug!(nodes = nodes.len(), "no overlaps, keeping current positions");
        positions_of(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, x: f64, y: f64) -> Node {
        let c = LayoutConfig::default();
        Node::new(id, x, y, c.node_width, c.node_height)
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("force".parse::<LayoutStrategy>(), Ok(LayoutStrategy::Force));
        assert_eq!("Grid".parse::<LayoutStrategy>(), Ok(LayoutStrategy::Grid));
        assert_eq!("circular".parse::<LayoutStrategy>(), Ok(LayoutStrategy::Circular));
        assert_eq!("smart".parse::<LayoutStrategy>(), Ok(LayoutStrategy::Smart));
        assert_eq!(
            "spiral".parse::<LayoutStrategy>(),
            Err(UnknownStrategy("spiral".to_string()))
        );
    }

    #[test]
    fn test_strategy_display_round_trips() {
        for strategy in LayoutStrategy::ALL {
            assert_eq!(strategy.to_string().parse::<LayoutStrategy>(), Ok(strategy));
        }
    }

    #[test]
    fn test_smart_is_noop_without_overlap() {
        let nodes = vec![node("a", 200.0, 200.0), node("b", 900.0, 600.0)];
        let positions = smart_layout(&nodes, &[Edge::new("a", "b")], &LayoutConfig::default());
        assert_eq!(positions, positions_of(&nodes));
    }

    #[test]
    fn test_smart_resolves_overlap() {
        let config = LayoutConfig::default();
        let nodes = vec![node("a", 600.0, 400.0), node("b", 610.0, 405.0)];
        let positions = smart_layout(&nodes, &[], &config);
        assert_ne!(positions, positions_of(&nodes));
    }

    #[test]
    fn test_every_strategy_returns_one_position_per_node() {
        let nodes = vec![
            node("a", 100.0, 100.0),
            node("b", 100.0, 100.0),
            node("c", 500.0, 300.0),
        ];
        let edges = vec![Edge::new("a", "c")];
        for strategy in LayoutStrategy::ALL {
            let positions = layout(&nodes, &edges, strategy, &LayoutConfig::default());
            assert_eq!(positions.len(), 3, "strategy {}", strategy);
        }
    }
}
