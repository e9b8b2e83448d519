//! Integration tests for layout output guarantees: canvas bounds, smart
//! layout idempotence, determinism, degenerate inputs and convergence.

use pretty_assertions::assert_eq;

use scene_layout::graph::{graph_to_scene, scene_to_graph};
use scene_layout::layout::{
    circular_layout, find_overlaps, force_layout, grid_layout, layout, positions_of, simulate,
    smart_layout, Edge, LayoutConfig, LayoutStrategy, Node, Point, Positions,
};
use scene_layout::{Element, ElementKind, Relation, RelationKind, Scene};

fn living_room() -> Scene {
    Scene::from_json_str(include_str!("fixtures/living_room.json")).expect("fixture decodes")
}

fn node(id: &str, x: f64, y: f64, config: &LayoutConfig) -> Node {
    Node::new(id, x, y, config.node_width, config.node_height)
}

fn assert_within_bounds(positions: &Positions, config: &LayoutConfig, label: &str) {
    let half_w = config.node_width / 2.0;
    let half_h = config.node_height / 2.0;
    for (id, p) in positions {
        assert!(
            p.x >= config.padding + half_w && p.x <= config.canvas_width - config.padding - half_w,
            "{}: {} x out of bounds: {:?}",
            label,
            id,
            p
        );
        assert!(
            p.y >= config.padding + half_h && p.y <= config.canvas_height - config.padding - half_h,
            "{}: {} y out of bounds: {:?}",
            label,
            id,
            p
        );
    }
}

#[test]
fn test_every_strategy_stays_inside_canvas() {
    let config = LayoutConfig::default();
    // Seeds far outside the canvas and piled on top of each other
    let nodes = vec![
        node("a", -500.0, -500.0, &config),
        node("b", 5000.0, 300.0, &config),
        node("c", 600.0, 9000.0, &config),
        node("d", 600.0, 400.0, &config),
        node("e", 600.0, 400.0, &config),
        node("f", 601.0, 401.0, &config),
        node("pinned", -500.0, -500.0, &config).with_fixed(true),
    ];
    let edges = vec![Edge::new("a", "b"), Edge::new("b", "c"), Edge::new("d", "f")];

    for strategy in LayoutStrategy::ALL {
        let positions = layout(&nodes, &edges, strategy, &config);
        assert_eq!(positions.len(), nodes.len(), "strategy {}", strategy);
        assert_within_bounds(&positions, &config, strategy.as_str());
    }
}

#[test]
fn test_bounds_hold_on_a_small_canvas() {
    let config = LayoutConfig::new()
        .with_canvas(400.0, 300.0)
        .with_node_size(60.0, 40.0)
        .with_padding(10.0);
    let ids: Vec<String> = (0..30).map(|i| format!("n{}", i)).collect();
    let nodes: Vec<Node> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| node(id, (i * 37 % 400) as f64, (i * 53 % 300) as f64, &config))
        .collect();

    assert_within_bounds(&force_layout(&nodes, &[], &config), &config, "force");
    assert_within_bounds(
        &grid_layout(ids.iter().map(String::as_str), &config),
        &config,
        "grid",
    );
    assert_within_bounds(
        &circular_layout(ids.iter().map(String::as_str), &config),
        &config,
        "circular",
    );
}

#[test]
fn test_smart_layout_leaves_clean_positions_alone() {
    let config = LayoutConfig::default();
    let ids = ["a", "b", "c", "d", "e"];
    let seeded = grid_layout(ids, &config);
    let nodes: Vec<Node> = ids
        .iter()
        .map(|id| node(id, seeded[*id].x, seeded[*id].y, &config))
        .collect();
    assert!(find_overlaps(&nodes, config.min_node_spacing).is_empty());

    let edges = vec![Edge::new("a", "e"), Edge::new("b", "d")];
    let once = smart_layout(&nodes, &edges, &config);
    assert_eq!(once, positions_of(&nodes));
    assert_eq!(once, seeded);
}

#[test]
fn test_smart_layout_runs_force_on_overlap() {
    let config = LayoutConfig::default();
    let nodes = vec![
        node("a", 500.0, 400.0, &config),
        node("b", 520.0, 410.0, &config),
        node("c", 900.0, 200.0, &config),
    ];
    let smart = smart_layout(&nodes, &[], &config);
    assert_eq!(smart, force_layout(&nodes, &[], &config));
}

#[test]
fn test_grid_and_circular_are_deterministic() {
    let config = LayoutConfig::default();
    let ids: Vec<String> = (0..13).map(|i| format!("element-{}", i)).collect();
    let ids = || ids.iter().map(String::as_str);

    assert_eq!(grid_layout(ids(), &config), grid_layout(ids(), &config));
    assert_eq!(circular_layout(ids(), &config), circular_layout(ids(), &config));
}

#[test]
fn test_force_layout_is_deterministic() {
    let scene = living_room();
    let config = LayoutConfig::default();
    let graph = scene_to_graph(&scene, &config, &Positions::new());
    let first = force_layout(&graph.nodes, &graph.edges, &config);
    let second = force_layout(&graph.nodes, &graph.edges, &config);
    assert_eq!(first, second);
}

#[test]
fn test_single_node_is_centered() {
    let config = LayoutConfig::default();
    let positions = force_layout(&[node("A", 999.0, -50.0, &config)], &[], &config);
    assert_eq!(
        positions["A"],
        Point::new(config.canvas_width / 2.0, config.canvas_height / 2.0)
    );
}

#[test]
fn test_no_nodes_yields_no_positions() {
    let config = LayoutConfig::default();
    for strategy in LayoutStrategy::ALL {
        assert!(layout(&[], &[], strategy, &config).is_empty());
    }
}

#[test]
fn test_twenty_unconnected_nodes_converge_early() {
    let config = LayoutConfig::default();
    let ids: Vec<String> = (0..20).map(|i| format!("n{}", i)).collect();
    let seeded = grid_layout(ids.iter().map(String::as_str), &config);
    let nodes: Vec<Node> = ids
        .iter()
        .map(|id| node(id, seeded[id].x, seeded[id].y, &config))
        .collect();

    let outcome = simulate(&nodes, &[], &config);
    assert!(
        outcome.converged && outcome.iterations < config.max_iterations,
        "ran {} of {} iterations",
        outcome.iterations,
        config.max_iterations
    );
    assert_eq!(outcome.positions.len(), 20);
}

#[test]
fn test_force_layout_separates_a_pile() {
    let config = LayoutConfig::default();
    let nodes: Vec<Node> = (0..5)
        .map(|i| node(&format!("n{}", i), 600.0, 400.0, &config))
        .collect();
    let positions = force_layout(&nodes, &[], &config);
    let placed: Vec<Node> = nodes
        .iter()
        .map(|n| node(&n.id, positions[&n.id].x, positions[&n.id].y, &config))
        .collect();
    let overlaps = find_overlaps(&placed, 0.0);
    assert!(overlaps.is_empty(), "still overlapping: {:?}", overlaps);
    // Clear of the spacing margin too, so a second smart pass is a no-op
    assert_eq!(smart_layout(&placed, &[], &config), positions);
}

#[test]
fn test_scene_round_trip_through_layout() {
    let scene = Scene::new(
        vec![
            Element::new("A", ElementKind::Subject, "A", [0.0, 0.0, 0.5, 0.5]),
            Element::new("B", ElementKind::Object, "B", [0.5, 0.5, 1.0, 1.0]),
        ],
        vec![Relation::new("A", "B", RelationKind::AttachedTo)],
    );
    let config = LayoutConfig::default();
    let mut graph = scene_to_graph(&scene, &config, &Positions::new());

    let a = graph.node("A").expect("node A").position();
    let b = graph.node("B").expect("node B").position();
    assert!(a.x < config.center_x() && a.y < config.center_y());
    assert!(b.x > config.center_x() && b.y > config.center_y());
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(
        (graph.edges[0].source.as_str(), graph.edges[0].target.as_str()),
        ("A", "B")
    );

    let positions = force_layout(&graph.nodes, &graph.edges, &config);
    graph.apply_positions(&positions);
    let rebuilt = graph_to_scene(&graph);

    assert_eq!(rebuilt.elements.len(), 2);
    assert_eq!(rebuilt.relations.len(), 1);
    assert_eq!(rebuilt.relations[0].kind, RelationKind::AttachedTo);
    assert_eq!(rebuilt, scene);
}

#[test]
fn test_fixture_round_trip_keeps_opaque_fields() {
    let scene = living_room();
    let config = LayoutConfig::default();
    let mut graph = scene_to_graph(&scene, &config, &Positions::new());
    let positions = layout(&graph.nodes, &graph.edges, LayoutStrategy::Smart, &config);
    graph.apply_positions(&positions);

    let rebuilt = graph_to_scene(&graph);
    assert_eq!(rebuilt, scene);
    let cat = rebuilt.element("cat").expect("cat survives");
    assert_eq!(cat.extra.get("detector"), Some(&serde_json::json!("v3")));
    assert_eq!(rebuilt.relations[4].extra.get("confidence"), Some(&serde_json::json!(0.8)));
}

#[test]
fn test_position_overrides_preserve_dragged_layout() {
    let scene = living_room();
    let config = LayoutConfig::default();
    let first = {
        let graph = scene_to_graph(&scene, &config, &Positions::new());
        layout(&graph.nodes, &graph.edges, LayoutStrategy::Grid, &config)
    };

    // Feeding the grid positions back in: nothing overlaps, so smart keeps them
    let graph = scene_to_graph(&scene, &config, &first);
    let second = layout(&graph.nodes, &graph.edges, LayoutStrategy::Smart, &config);
    assert_eq!(second, first);
}
