//! Scene data model: elements and the relations between them
//!
//! These are the typed forms of a scene description. Input that has not yet
//! been checked should go through [`crate::validate`] on the raw JSON first;
//! deserializing straight into [`Scene`] reports only the first problem.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::SceneError;

/// Kind of visual entity an element represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Subject,
    Object,
    Text,
    Background,
    Effect,
}

impl ElementKind {
    pub const ALL: [ElementKind; 5] = [
        ElementKind::Subject,
        ElementKind::Object,
        ElementKind::Text,
        ElementKind::Background,
        ElementKind::Effect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Subject => "subject",
            ElementKind::Object => "object",
            ElementKind::Text => "text",
            ElementKind::Background => "background",
            ElementKind::Effect => "effect",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A name that is not one of the element or relation kinds
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {what} '{name}'")]
pub struct UnknownKind {
    pub what: &'static str,
    pub name: String,
}

impl UnknownKind {
    fn new(what: &'static str, name: &str) -> Self {
        Self {
            what,
            name: name.to_string(),
        }
    }
}

impl FromStr for ElementKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownKind::new("element type", s))
    }
}

/// Kind of relationship between two elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Occludes,
    AttachedTo,
    InFrontOf,
    PartOf,
}

impl RelationKind {
    pub const ALL: [RelationKind; 4] = [
        RelationKind::Occludes,
        RelationKind::AttachedTo,
        RelationKind::InFrontOf,
        RelationKind::PartOf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Occludes => "occludes",
            RelationKind::AttachedTo => "attached_to",
            RelationKind::InFrontOf => "in_front_of",
            RelationKind::PartOf => "part_of",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownKind::new("relation type", s))
    }
}

/// Deserialize a key that is present, keeping `null` as a value
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Spatial extent of an element in normalized `[0, 1]` image coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// `[x1, y1, x2, y2]`
    pub bbox: [f64; 4],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Vec<[f64; 2]>>,
    /// Larger values sit further back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_hint: Option<f64>,
}

impl Geometry {
    pub fn from_bbox(bbox: [f64; 4]) -> Self {
        Self {
            bbox,
            polygon: None,
            depth_hint: None,
        }
    }

    /// Center of the bbox in normalized coordinates
    pub fn bbox_center(&self) -> (f64, f64) {
        let [x1, y1, x2, y2] = self.bbox;
        ((x1 + x2) / 2.0, (y1 + y2) / 2.0)
    }
}

/// A visual entity in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub geometry: Geometry,
    /// Opaque to the engine. An explicit `null` is kept as `Some(Value::Null)`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub appearance: Option<Value>,
    /// Opaque to the engine
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub constraints: Option<Value>,
    /// Fields this model does not know about, kept for round-tripping
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Element {
    pub fn new(
        id: impl Into<String>,
        kind: ElementKind,
        name: impl Into<String>,
        bbox: [f64; 4],
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            description: None,
            geometry: Geometry::from_bbox(bbox),
            appearance: None,
            constraints: None,
            extra: Map::new(),
        }
    }
}

/// A directed, typed edge between two elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: RelationKind,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Relation {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: RelationKind) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind,
            extra: Map::new(),
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// The aggregate of all elements and relations being edited
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    pub elements: Vec<Element>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl Scene {
    pub fn new(elements: Vec<Element>, relations: Vec<Relation>) -> Self {
        Self {
            elements,
            relations,
        }
    }

    /// Decode a scene from JSON text
    pub fn from_json_str(content: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Decode a scene from an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self, SceneError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Load a scene from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn to_value(&self) -> Value {
        // Serialization of this model cannot fail: all map keys are strings.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
