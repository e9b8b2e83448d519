//! Scene Layout - validation and node placement for editable scene graphs
//!
//! A scene is a set of visual elements and typed relations between them.
//! This library checks that a scene is structurally sound and computes a
//! canvas position for every element so a node/edge editor can draw it.
//!
//! # Example
//!
//! ```rust
//! use scene_layout::{arrange, ArrangeConfig};
//! use serde_json::json;
//!
//! let scene = json!({
//!     "elements": [
//!         { "id": "cat", "type": "subject", "name": "Cat", "geometry": { "bbox": [0.1, 0.1, 0.4, 0.6] } },
//!         { "id": "sofa", "type": "object", "name": "Sofa", "geometry": { "bbox": [0.0, 0.4, 1.0, 1.0] } }
//!     ],
//!     "relations": [{ "from": "cat", "to": "sofa", "type": "in_front_of" }]
//! });
//!
//! let arrangement = arrange(&scene, &ArrangeConfig::default()).unwrap();
//! assert_eq!(arrangement.positions.len(), 2);
//! ```

pub mod error;
pub mod graph;
pub mod layout;
pub mod scene;
pub mod validate;

pub use error::SceneError;
pub use graph::{graph_to_scene, scene_to_graph, Graph};
pub use layout::{
    circular_layout, force_layout, grid_layout, smart_layout, ConfigError, LayoutConfig,
    LayoutStrategy, Point, Positions,
};
pub use scene::{Element, ElementKind, Geometry, Relation, RelationKind, Scene, UnknownKind};
pub use validate::{validate, validate_scene, Diagnostic, Severity, ValidationReport};

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur in the arrange pipeline
#[derive(Debug, Error)]
pub enum ArrangeError {
    /// The scene has error-level diagnostics; layout was not attempted
    #[error("scene is invalid: {} error(s)", .0.errors().count())]
    Invalid(ValidationReport),

    /// The scene passed validation but could not be decoded
    #[error("scene could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// The layout configuration was rejected
    #[error("layout config error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration for the complete arrange pipeline
#[derive(Debug, Clone, Default)]
pub struct ArrangeConfig {
    /// Layout configuration
    pub layout: LayoutConfig,
    /// Which layout algorithm to run
    pub strategy: LayoutStrategy,
    /// Previously known positions, e.g. from user drags
    pub overrides: Positions,
    /// Node IDs that force layout must not move
    pub pinned: Vec<String>,
}

impl ArrangeConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the layout strategy
    pub fn with_strategy(mut self, strategy: LayoutStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the position overrides
    pub fn with_overrides(mut self, overrides: Positions) -> Self {
        self.overrides = overrides;
        self
    }

    /// Pin a node in place
    pub fn with_pinned(mut self, id: impl Into<String>) -> Self {
        self.pinned.push(id.into());
        self
    }
}

/// Result of a successful arrange call
#[derive(Debug, Clone)]
pub struct Arrangement {
    /// One position per element
    pub positions: Positions,
    /// Validation findings; warnings only, since errors abort the pipeline
    pub report: ValidationReport,
    /// The laid-out graph, positions applied
    pub graph: Graph,
}

impl Arrangement {
    /// Scene rebuilt from the graph payloads
    pub fn scene(&self) -> Scene {
        graph_to_scene(&self.graph)
    }
}

/// Validate a scene and, if it is sound, lay it out
///
/// Returns [`ArrangeError::Invalid`] carrying the full report when any
/// diagnostic is an error.
pub fn arrange(scene: &Value, config: &ArrangeConfig) -> Result<Arrangement, ArrangeError> {
    config.layout.validate()?;

    let report = validate(scene);
    if !report.valid {
        return Err(ArrangeError::Invalid(report));
    }

    let scene: Scene = serde_json::from_value(scene.clone())?;
    let mut graph = scene_to_graph(&scene, &config.layout, &config.overrides);
    for id in &config.pinned {
        if !graph.pin(id) {
            tracing::warn!(id = %id, "cannot pin unknown node");
        }
    }

    let positions = config
        .strategy
        .apply(&graph.nodes, &graph.edges, &config.layout);
    graph.apply_positions(&positions);

    Ok(Arrangement {
        positions,
        report,
        graph,
    })
}

/// Read a `{id: {x, y}}` position map from JSON text
pub fn positions_from_json_str(content: &str) -> Result<Positions, SceneError> {
    Ok(serde_json::from_str(content)?)
}

/// Read a `{id: {x, y}}` position map from a JSON file
pub fn positions_from_file(path: &Path) -> Result<Positions, SceneError> {
    let content = std::fs::read_to_string(path)?;
    positions_from_json_str(&content)
}
