//! Overlap detection between positioned nodes.
//!
//! Two nodes overlap when their boxes, each grown by half of the spacing
//! margin, intersect. Equivalently, their centers are closer than the sum of
//! their half-extents plus `spacing` on both axes.

use super::types::Node;

/// Check whether two nodes are closer than their footprints plus `spacing`
pub fn nodes_overlap(a: &Node, b: &Node, spacing: f64) -> bool {
    let margin = spacing / 2.0;
    a.bounds().inflate(margin).intersects(&b.bounds().inflate(margin))
}

/// Check whether any pair of nodes overlaps
pub fn has_overlaps(nodes: &[Node], spacing: f64) -> bool {
    nodes.iter().enumerate().any(|(i, a)| {
        nodes[i + 1..]
            .iter()
            .any(|b| nodes_overlap(a, b, spacing))
    })
}

/// Every overlapping pair of node IDs, in node order
pub fn find_overlaps(nodes: &[Node], spacing: f64) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            if nodes_overlap(&nodes[i], &nodes[j], spacing) {
                pairs.push((nodes[i].id.clone(), nodes[j].id.clone()));
            }
        }
    }
    pairs
}
