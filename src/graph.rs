//! Conversion between scenes and layout graphs.
//!
//! A [`Graph`] is built fresh for each layout call. Nodes carry their
//! originating element and edges their relation, so [`graph_to_scene`] can
//! rebuild the scene without the layout engine ever looking inside those
//! payloads. Positions live only on the graph; they are not part of a scene.

use crate::layout::{positions_of, Edge, LayoutConfig, Node, Point, Positions};
use crate::scene::{Element, Scene};

/// Nodes and edges derived from a scene
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Mark a node as fixed so force layout leaves it in place.
    ///
    /// Returns false if no node has this ID.
    pub fn pin(&mut self, id: &str) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.fixed = true;
                true
            }
            None => false,
        }
    }

    /// Current node positions
    pub fn positions(&self) -> Positions {
        positions_of(&self.nodes)
    }

    /// Move nodes to the given positions; nodes without an entry keep theirs
    pub fn apply_positions(&mut self, positions: &Positions) {
        for node in &mut self.nodes {
            if let Some(p) = positions.get(&node.id) {
                node.x = p.x;
                node.y = p.y;
            }
        }
    }
}

/// Seed position of an element: its bbox center mapped into the padded canvas
pub fn seed_position(element: &Element, config: &LayoutConfig) -> Point {
    let (cx, cy) = element.geometry.bbox_center();
    Point::new(
        config.padding + cx * config.usable_width(),
        config.padding + cy * config.usable_height(),
    )
}

/// Build a layout graph from a scene.
///
/// Positions in `overrides` (typically from a user dragging nodes) win over
/// the bbox-derived seed. Every relation becomes its own edge, so parallel
/// relations stay parallel.
pub fn scene_to_graph(scene: &Scene, config: &LayoutConfig, overrides: &Positions) -> Graph {
    let nodes = scene
        .elements
        .iter()
        .map(|element| {
            let p = overrides
                .get(&element.id)
                .copied()
                .unwrap_or_else(|| seed_position(element, config));
            Node::new(element.id.clone(), p.x, p.y, config.node_width, config.node_height)
                .with_element(element.clone())
        })
        .collect();

    let edges = scene
        .relations
        .iter()
        .map(|relation| {
            Edge::new(relation.from.clone(), relation.to.clone()).with_relation(relation.clone())
        })
        .collect();

    Graph::new(nodes, edges)
}

/// Rebuild a scene from the payloads carried by a graph.
///
/// Nodes and edges created without a payload contribute nothing.
pub fn graph_to_scene(graph: &Graph) -> Scene {
    Scene::new(
        graph.nodes.iter().filter_map(|n| n.element.clone()).collect(),
        graph.edges.iter().filter_map(|e| e.relation.clone()).collect(),
    )
}
