//! Configuration for the layout engine

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or checking a layout configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read layout config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse layout config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid layout config '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Configuration options for layout computation
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Canvas width in pixels
    pub canvas_width: f64,

    /// Canvas height in pixels
    pub canvas_height: f64,

    /// Margin kept clear on every side of the canvas
    pub padding: f64,

    /// Width given to every node
    pub node_width: f64,

    /// Height given to every node
    pub node_height: f64,

    /// Push-apart intensity between every pair of nodes
    pub repulsion_strength: f64,

    /// Spring stiffness for connected nodes
    pub attraction_strength: f64,

    /// Rest length of the edge spring
    pub ideal_edge_length: f64,

    /// Pull of every free node towards the canvas center
    pub center_gravity: f64,

    /// Per-iteration velocity decay, in (0, 1)
    pub damping: f64,

    /// Maximum displacement of a node in one iteration
    pub max_velocity: f64,

    /// Upper bound on force simulation iterations
    pub max_iterations: usize,

    /// Average per-node movement below which the simulation stops
    pub min_movement: f64,

    /// Extra clearance added to the overlap threshold
    pub min_node_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1200.0,
            canvas_height: 800.0,
            padding: 40.0,
            node_width: 160.0,
            node_height: 90.0,
            repulsion_strength: 250000.0,
            attraction_strength: 0.05,
            ideal_edge_length: 220.0,
            center_gravity: 0.02,
            damping: 0.9,
            max_velocity: 50.0,
            max_iterations: 500,
            min_movement: 1.0,
            min_node_spacing: 20.0,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string and check it
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: LayoutConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the canvas size
    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    /// Set the canvas padding
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Set the node size
    pub fn with_node_size(mut self, width: f64, height: f64) -> Self {
        self.node_width = width;
        self.node_height = height;
        self
    }

    /// Set the iteration cap for the force simulation
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the extra clearance between nodes
    pub fn with_min_node_spacing(mut self, spacing: f64) -> Self {
        self.min_node_spacing = spacing;
        self
    }

    /// Horizontal center of the canvas
    pub fn center_x(&self) -> f64 {
        self.canvas_width / 2.0
    }

    /// Vertical center of the canvas
    pub fn center_y(&self) -> f64 {
        self.canvas_height / 2.0
    }

    /// Canvas width minus padding on both sides
    pub fn usable_width(&self) -> f64 {
        (self.canvas_width - 2.0 * self.padding).max(0.0)
    }

    /// Canvas height minus padding on both sides
    pub fn usable_height(&self) -> f64 {
        (self.canvas_height - 2.0 * self.padding).max(0.0)
    }

    /// Keep a node center at `x` so a node of `width` stays inside the padded canvas
    pub fn clamp_x(&self, x: f64, width: f64) -> f64 {
        clamp_axis(x, self.padding + width / 2.0, self.canvas_width - self.padding - width / 2.0)
    }

    /// Keep a node center at `y` so a node of `height` stays inside the padded canvas
    pub fn clamp_y(&self, y: f64, height: f64) -> f64 {
        clamp_axis(y, self.padding + height / 2.0, self.canvas_height - self.padding - height / 2.0)
    }

    /// Reject settings the simulation cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("node_width", self.node_width),
            ("node_height", self.node_height),
            ("max_velocity", self.max_velocity),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(field, format!("must be positive, got {}", value)));
            }
        }

        let non_negative = [
            ("padding", self.padding),
            ("repulsion_strength", self.repulsion_strength),
            ("attraction_strength", self.attraction_strength),
            ("ideal_edge_length", self.ideal_edge_length),
            ("center_gravity", self.center_gravity),
            ("min_movement", self.min_movement),
            ("min_node_spacing", self.min_node_spacing),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be zero or positive, got {}", value),
                ));
            }
        }

        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(ConfigError::invalid(
                "damping",
                format!("must be between 0 and 1 (exclusive), got {}", self.damping),
            ));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::invalid("max_iterations", "must be at least 1"));
        }
        Ok(())
    }
}

/// Clamp to `[min, max]`; when the range is empty the midpoint wins
fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    if min > max {
        (min + max) / 2.0
    } else {
        value.clamp(min, max)
    }
}
