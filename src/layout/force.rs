//! Force-directed layout.
//!
//! Each iteration builds a fresh velocity buffer from three forces:
//!
//! 1. **Repulsion** between every unordered pair of nodes, inverse-square in
//!    the center distance. Pairs closer than their combined half-widths plus
//!    `min_node_spacing` are pushed with double strength.
//! 2. **Attraction** along every edge, a linear spring
//!    `k * (distance - ideal_edge_length)`.
//! 3. **Center gravity** pulling free nodes towards the canvas center.
//!
//! The buffer is then damped, speed-limited and applied once. The simulation
//! stops after `max_iterations`, or earlier when the summed movement of all
//! free nodes drops below `min_movement * node_count`.

use std::collections::HashMap;
use std::f64::consts::PI;

use super::config::LayoutConfig;
use super::types::{Edge, Node, Point, Positions, Vector};

/// Distance floor so coincident nodes do not produce infinite forces
const MIN_DISTANCE: f64 = 1.0;

/// Golden angle in radians, used to spread coincident pairs apart
const GOLDEN_ANGLE: f64 = PI * (3.0 - 2.236_067_977_499_79);

/// Result of a force simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct ForceOutcome {
    pub positions: Positions,
    /// Iterations actually executed
    pub iterations: usize,
    /// Whether movement fell below the threshold before the iteration cap
    pub converged: bool,
}

/// Run the force simulation and return the final positions
pub fn force_layout(nodes: &[Node], edges: &[Edge], config: &LayoutConfig) -> Positions {
    simulate(nodes, edges, config).positions
}

/// Run the force simulation, reporting how it terminated
pub fn simulate(nodes: &[Node], edges: &[Edge], config: &LayoutConfig) -> ForceOutcome {
    match nodes {
        [] => {
            return ForceOutcome {
                positions: Positions::new(),
                iterations: 0,
                converged: true,
            }
        }
        [only] => {
            let mut positions = Positions::new();
            positions.insert(
                only.id.clone(),
                Point::new(config.center_x(), config.center_y()),
            );
            return ForceOutcome {
                positions,
                iterations: 0,
                converged: true,
            };
        }
        _ => {}
    }

    let springs = resolve_edges(nodes, edges);
    // Pinned nodes are clamped like the rest, then never move
    let mut current: Vec<Point> = nodes
        .iter()
        .map(|n| Point::new(config.clamp_x(n.x, n.width), config.clamp_y(n.y, n.height)))
        .collect();

    let threshold = config.min_movement * nodes.len() as f64;
    let mut iterations = 0;
    let mut converged = false;
    let mut movement = 0.0;

    while iterations < config.max_iterations {
        let velocity = vec![Vector::ZERO; nodes.len()];
        let velocity = apply_repulsion(nodes, &current, velocity, config);
        let velocity = apply_attraction(&current, &springs, velocity, config);
        let velocity = apply_gravity(&current, velocity, config);
        let (next, moved) = integrate(nodes, &current, velocity, config);

        current = next;
        movement = moved;
        iterations += 1;

        if movement < threshold {
            converged = true;
            break;
        }
    }

    tracing::debug!(
        nodes = nodes.len(),
        edges = springs.len(),
        iterations,
        converged,
        movement,
        "force layout finished"
    );

    let positions = nodes
        .iter()
        .zip(current)
        .map(|(node, point)| (node.id.clone(), point))
        .collect();

    ForceOutcome {
        positions,
        iterations,
        converged,
    }
}

/// Map edges to node index pairs, dropping any that name unknown nodes
fn resolve_edges(nodes: &[Node], edges: &[Edge]) -> Vec<(usize, usize)> {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();

    edges
        .iter()
        .filter_map(|edge| {
            match (index.get(edge.source.as_str()), index.get(edge.target.as_str())) {
                (Some(&s), Some(&t)) => Some((s, t)),
                _ => {
                    tracing::trace!(
                        source = %edge.source,
                        target = %edge.target,
                        "ignoring edge with unknown endpoint"
                    );
                    None
                }
            }
        })
        .collect()
}

/// Unit direction from `from` to `to` and the floored distance between them.
///
/// Coincident points get a deterministic direction derived from `tie_break`.
fn direction(from: Point, to: Point, tie_break: usize) -> (Vector, f64) {
    let delta = to.sub(from);
    let length = delta.length();
    if length < f64::EPSILON {
        (Vector::angled(GOLDEN_ANGLE * tie_break as f64), MIN_DISTANCE)
    } else {
        (delta.scale(1.0 / length), length.max(MIN_DISTANCE))
    }
}

fn apply_repulsion(
    nodes: &[Node],
    positions: &[Point],
    mut velocity: Vec<Vector>,
    config: &LayoutConfig,
) -> Vec<Vector> {
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            // Direction pushes j away from i
            let (dir, distance) = direction(positions[i], positions[j], j);
            let min_safe = (nodes[i].width + nodes[j].width) / 2.0 + config.min_node_spacing;
            let strength = if distance < min_safe {
                config.repulsion_strength * 2.0
            } else {
                config.repulsion_strength
            };
            let force = dir.scale(strength / (distance * distance));
            velocity[i].sub_assign(force);
            velocity[j].add_assign(force);
        }
    }
    velocity
}

fn apply_attraction(
    positions: &[Point],
    springs: &[(usize, usize)],
    mut velocity: Vec<Vector>,
    config: &LayoutConfig,
) -> Vec<Vector> {
    for &(s, t) in springs {
        if s == t {
            continue;
        }
        let (dir, distance) = direction(positions[s], positions[t], t);
        let force = dir.scale(config.attraction_strength * (distance - config.ideal_edge_length));
        velocity[s].add_assign(force);
        velocity[t].sub_assign(force);
    }
    velocity
}

fn apply_gravity(positions: &[Point], mut velocity: Vec<Vector>, config: &LayoutConfig) -> Vec<Vector> {
    let center = Point::new(config.center_x(), config.center_y());
    for (v, p) in velocity.iter_mut().zip(positions) {
        v.add_assign(center.sub(*p).scale(config.center_gravity));
    }
    velocity
}

/// Apply damped, speed-limited velocity to free nodes. Returns the new
/// positions and the summed Manhattan movement.
fn integrate(
    nodes: &[Node],
    positions: &[Point],
    velocity: Vec<Vector>,
    config: &LayoutConfig,
) -> (Vec<Point>, f64) {
    let mut movement = 0.0;
    let next = nodes
        .iter()
        .zip(positions)
        .zip(velocity)
        .map(|((node, &p), v)| {
            if node.fixed {
                return p;
            }
            let step = v.scale(config.damping).limit(config.max_velocity);
            let moved = p.offset(step);
            let clamped = Point::new(
                config.clamp_x(moved.x, node.width),
                config.clamp_y(moved.y, node.height),
            );
            movement += (clamped.x - p.x).abs() + (clamped.y - p.y).abs();
            clamped
        })
        .collect();
    (next, movement)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LayoutConfig {
        LayoutConfig::default()
    }

    fn node(id: &str, x: f64, y: f64) -> Node {
        let c = config();
        Node::new(id, x, y, c.node_width, c.node_height)
    }

    #[test]
    fn test_empty_input() {
        let outcome = simulate(&[], &[], &config());
        assert!(outcome.positions.is_empty());
        assert_eq!(outcome.iterations, 0);
    }

    #[test]
    fn test_single_node_is_centered() {
        let positions = force_layout(&[node("a", 999.0, -50.0)], &[], &config());
        assert_eq!(positions["a"], Point::new(600.0, 400.0));
    }

    #[test]
    fn test_coincident_nodes_are_separated() {
        let nodes = vec![node("a", 600.0, 400.0), node("b", 600.0, 400.0)];
        let positions = force_layout(&nodes, &[], &config());
        let a = positions["a"];
        let b = positions["b"];
        assert!(a.x.is_finite() && a.y.is_finite());
        assert!(b.sub(a).length() > 100.0, "nodes stayed together: {:?} {:?}", a, b);
    }

    #[test]
    fn test_fixed_node_does_not_move() {
        let nodes = vec![
            node("anchor", 200.0, 200.0).with_fixed(true),
            node("free", 210.0, 205.0),
        ];
        let positions = force_layout(&nodes, &[], &config());
        assert_eq!(positions["anchor"], Point::new(200.0, 200.0));
        assert_ne!(positions["free"], Point::new(210.0, 205.0));
    }

    #[test]
    fn test_fixed_node_outside_canvas_is_clamped() {
        let c = config();
        let nodes = vec![
            node("anchor", -500.0, -500.0).with_fixed(true),
            node("free", 600.0, 400.0),
        ];
        let positions = force_layout(&nodes, &[], &c);
        let min = Point::new(c.clamp_x(-500.0, c.node_width), c.clamp_y(-500.0, c.node_height));
        assert_eq!(min, Point::new(120.0, 85.0));
        assert_eq!(positions["anchor"], min);
    }

    #[test]
    fn test_all_fixed_converges_immediately() {
        let nodes = vec![
            node("a", 200.0, 200.0).with_fixed(true),
            node("b", 900.0, 600.0).with_fixed(true),
        ];
        let outcome = simulate(&nodes, &[], &config());
        assert_eq!(outcome.iterations, 1);
        assert!(outcome.converged);
    }

    #[test]
    fn test_dangling_edges_are_ignored() {
        let nodes = vec![node("a", 300.0, 400.0), node("b", 900.0, 400.0)];
        let edges = vec![Edge::new("a", "ghost"), Edge::new("ghost", "b")];
        assert!(resolve_edges(&nodes, &edges).is_empty());
        let with_dangling = force_layout(&nodes, &edges, &config());
        let without = force_layout(&nodes, &[], &config());
        assert_eq!(with_dangling, without);
    }

    #[test]
    fn test_edge_pulls_distant_nodes_together() {
        // Without gravity only the spring can bring the pair together
        let config = LayoutConfig {
            center_gravity: 0.0,
            ..LayoutConfig::default()
        };
        let nodes = vec![node("a", 150.0, 400.0), node("b", 1050.0, 400.0)];
        let free = force_layout(&nodes, &[], &config);
        let linked = force_layout(&nodes, &[Edge::new("a", "b")], &config);
        let free_dist = free["b"].sub(free["a"]).length();
        let linked_dist = linked["b"].sub(linked["a"]).length();
        assert!(
            linked_dist < free_dist,
            "edge should shorten a-b: linked {} vs free {}",
            linked_dist,
            free_dist
        );
    }

    #[test]
    fn test_iteration_cap_is_respected() {
        let nodes: Vec<Node> = (0..6)
            .map(|i| node(&format!("n{}", i), 600.0, 400.0))
            .collect();
        let config = config().with_max_iterations(3);
        let outcome = simulate(&nodes, &[], &config);
        assert!(outcome.iterations <= 3);
    }

    #[test]
    fn test_direction_tie_break_is_deterministic() {
        let p = Point::new(10.0, 10.0);
        let (a, da) = direction(p, p, 3);
        let (b, db) = direction(p, p, 3);
        assert_eq!(a, b);
        assert_eq!(da, MIN_DISTANCE);
        assert_eq!(db, MIN_DISTANCE);
        assert!((a.length() - 1.0).abs() < 1e-12);
    }
}
