//! Validation engine for scene descriptions.
//!
//! Works on untyped JSON so that every problem in a scene can be reported at
//! once, instead of stopping at the first field that fails to deserialize.
//! Each finding is a [`Diagnostic`] whose `field` is a path such as
//! `elements[2].geometry.bbox[1]` that a caller can map back to its UI.
//!
//! Checks never short-circuit each other, except that a container with the
//! wrong shape (e.g. `elements` not being an array) yields a single error
//! instead of per-item checks.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::scene::{ElementKind, RelationKind, Scene};

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks layout for callers that respect validation
    Error,
    /// Informational only
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity, self.field, self.message)
    }
}

/// Outcome of validating a scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// True iff no diagnostic is an error
    pub valid: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            valid: !diagnostics.iter().any(Diagnostic::is_error),
            diagnostics,
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        !self.valid
    }

    /// Diagnostics whose field path starts with `prefix`
    pub fn for_field<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics
            .iter()
            .filter(move |d| d.field.starts_with(prefix))
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

/// Validate a scene description given as JSON
pub fn validate(scene: &Value) -> ValidationReport {
    let mut diagnostics = Vec::new();

    match scene.as_object() {
        Some(root) => check_root(root, &mut diagnostics),
        None => diagnostics.push(Diagnostic::error(
            "scene",
            format!("must be an object, got {}", type_name(scene)),
        )),
    }

    ValidationReport::from_diagnostics(diagnostics)
}

/// Validate an already-typed scene
///
/// Typing guarantees shape and enum membership; this still catches range,
/// uniqueness and referential problems.
pub fn validate_scene(scene: &Scene) -> ValidationReport {
    validate(&scene.to_value())
}

fn check_root(root: &Map<String, Value>, diagnostics: &mut Vec<Diagnostic>) {
    let mut known_ids = HashSet::new();

    match root.get("elements") {
        Some(Value::Array(elements)) => {
            for (i, element) in elements.iter().enumerate() {
                check_element(i, element, diagnostics);
            }
            check_duplicate_ids(elements, diagnostics);
            known_ids = elements
                .iter()
                .filter_map(|e| e.get("id").and_then(Value::as_str))
                .filter(|id| !id.is_empty())
                .collect();
        }
        Some(other) => diagnostics.push(Diagnostic::error(
            "elements",
            format!("must be an array, got {}", type_name(other)),
        )),
        None => diagnostics.push(Diagnostic::error("elements", "is required")),
    }

    match root.get("relations") {
        Some(Value::Array(relations)) => {
            for (j, relation) in relations.iter().enumerate() {
                check_relation(j, relation, &known_ids, diagnostics);
            }
        }
        // An absent list is an empty one
        None => {}
        Some(other) => diagnostics.push(Diagnostic::error(
            "relations",
            format!("must be an array, got {}", type_name(other)),
        )),
    }
}

// ── Elements ──────────────────────────────────────────────────────

fn check_element(i: usize, element: &Value, diagnostics: &mut Vec<Diagnostic>) {
    let path = format!("elements[{}]", i);
    let Some(obj) = element.as_object() else {
        diagnostics.push(Diagnostic::error(
            path,
            format!("must be an object, got {}", type_name(element)),
        ));
        return;
    };

    check_non_empty_string(obj, &path, "id", diagnostics);
    check_non_empty_string(obj, &path, "name", diagnostics);

    match obj.get("type") {
        Some(Value::String(kind)) if kind.parse::<ElementKind>().is_ok() => {}
        Some(Value::String(kind)) => diagnostics.push(Diagnostic::error(
            format!("{}.type", path),
            format!("unknown element type '{}' (expected {})", kind, element_kinds()),
        )),
        Some(other) => diagnostics.push(Diagnostic::error(
            format!("{}.type", path),
            format!("must be a string, got {}", type_name(other)),
        )),
        None => diagnostics.push(Diagnostic::error(format!("{}.type", path), "is required")),
    }

    match obj.get("description") {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(other) => diagnostics.push(Diagnostic::error(
            format!("{}.description", path),
            format!("must be a string, got {}", type_name(other)),
        )),
    }

    let geometry_path = format!("{}.geometry", path);
    match obj.get("geometry") {
        Some(Value::Object(geometry)) => check_geometry(&geometry_path, geometry, diagnostics),
        Some(other) => diagnostics.push(Diagnostic::error(
            geometry_path,
            format!("must be an object, got {}", type_name(other)),
        )),
        None => diagnostics.push(Diagnostic::error(geometry_path, "is required")),
    }
}

fn check_geometry(path: &str, geometry: &Map<String, Value>, diagnostics: &mut Vec<Diagnostic>) {
    let bbox_path = format!("{}.bbox", path);
    match geometry.get("bbox") {
        Some(Value::Array(bbox)) => check_bbox(&bbox_path, bbox, diagnostics),
        Some(other) => diagnostics.push(Diagnostic::error(
            bbox_path,
            format!("must be an array of 4 numbers, got {}", type_name(other)),
        )),
        None => diagnostics.push(Diagnostic::error(bbox_path, "is required")),
    }

    let polygon_path = format!("{}.polygon", path);
    match geometry.get("polygon") {
        None | Some(Value::Null) => {}
        Some(Value::Array(points)) => {
            for (k, point) in points.iter().enumerate() {
                check_polygon_point(&format!("{}[{}]", polygon_path, k), point, diagnostics);
            }
        }
        Some(other) => diagnostics.push(Diagnostic::error(
            polygon_path,
            format!("must be an array of [x, y] points, got {}", type_name(other)),
        )),
    }

    match geometry.get("depth_hint") {
        None | Some(Value::Null) | Some(Value::Number(_)) => {}
        Some(other) => diagnostics.push(Diagnostic::error(
            format!("{}.depth_hint", path),
            format!("must be a number, got {}", type_name(other)),
        )),
    }
}

fn check_bbox(path: &str, bbox: &[Value], diagnostics: &mut Vec<Diagnostic>) {
    if bbox.len() != 4 {
        diagnostics.push(Diagnostic::error(
            path,
            format!("must have exactly 4 entries [x1, y1, x2, y2], got {}", bbox.len()),
        ));
        return;
    }

    let mut coords = [0.0; 4];
    let mut all_numeric = true;
    for (k, value) in bbox.iter().enumerate() {
        match check_unit_coordinate(&format!("{}[{}]", path, k), value, diagnostics) {
            Some(c) => coords[k] = c,
            None => all_numeric = false,
        }
    }
    if !all_numeric {
        return;
    }

    let [x1, y1, x2, y2] = coords;
    if x2 < x1 {
        diagnostics.push(Diagnostic::warning(
            path,
            format!("x2 ({}) is less than x1 ({})", x2, x1),
        ));
    }
    if y2 < y1 {
        diagnostics.push(Diagnostic::warning(
            path,
            format!("y2 ({}) is less than y1 ({})", y2, y1),
        ));
    }
}

fn check_polygon_point(path: &str, point: &Value, diagnostics: &mut Vec<Diagnostic>) {
    match point.as_array() {
        Some(xy) if xy.len() == 2 => {
            for (k, value) in xy.iter().enumerate() {
                check_unit_coordinate(&format!("{}[{}]", path, k), value, diagnostics);
            }
        }
        Some(xy) => diagnostics.push(Diagnostic::error(
            path,
            format!("must be an [x, y] pair, got {} entries", xy.len()),
        )),
        None => diagnostics.push(Diagnostic::error(
            path,
            format!("must be an [x, y] pair, got {}", type_name(point)),
        )),
    }
}

/// Check a normalized coordinate; returns it when numeric
fn check_unit_coordinate(path: &str, value: &Value, diagnostics: &mut Vec<Diagnostic>) -> Option<f64> {
    let Some(c) = value.as_f64() else {
        diagnostics.push(Diagnostic::error(
            path,
            format!("must be a number, got {}", type_name(value)),
        ));
        return None;
    };
    if !(0.0..=1.0).contains(&c) {
        diagnostics.push(Diagnostic::error(
            path,
            format!("must be within [0, 1], got {}", c),
        ));
    }
    Some(c)
}

fn check_duplicate_ids(elements: &[Value], diagnostics: &mut Vec<Diagnostic>) {
    let mut indices: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, element) in elements.iter().enumerate() {
        if let Some(id) = element.get("id").and_then(Value::as_str) {
            if !id.is_empty() {
                indices.entry(id).or_default().push(i);
            }
        }
    }

    let mut found: Vec<(usize, Diagnostic)> = Vec::new();
    for (id, at) in indices.iter().filter(|(_, at)| at.len() > 1) {
        let listed = at
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        for &i in at {
            found.push((
                i,
                Diagnostic::error(
                    format!("elements[{}].id", i),
                    format!("duplicate element id '{}' (used at indices {})", id, listed),
                ),
            ));
        }
    }
    // Report in element order rather than ID order
    found.sort_by_key(|(i, _)| *i);
    diagnostics.extend(found.into_iter().map(|(_, d)| d));
}

// ── Relations ─────────────────────────────────────────────────────

fn check_relation(
    j: usize,
    relation: &Value,
    known_ids: &HashSet<&str>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let path = format!("relations[{}]", j);
    let Some(obj) = relation.as_object() else {
        diagnostics.push(Diagnostic::error(
            path,
            format!("must be an object, got {}", type_name(relation)),
        ));
        return;
    };

    let from = check_endpoint(obj, &path, "from", known_ids, diagnostics);
    let to = check_endpoint(obj, &path, "to", known_ids, diagnostics);

    match obj.get("type") {
        Some(Value::String(kind)) if kind.parse::<RelationKind>().is_ok() => {}
        Some(Value::String(kind)) => diagnostics.push(Diagnostic::error(
            format!("{}.type", path),
            format!("unknown relation type '{}' (expected {})", kind, relation_kinds()),
        )),
        Some(other) => diagnostics.push(Diagnostic::error(
            format!("{}.type", path),
            format!("must be a string, got {}", type_name(other)),
        )),
        None => diagnostics.push(Diagnostic::error(format!("{}.type", path), "is required")),
    }

    if let (Some(from), Some(to)) = (from, to) {
        if from == to {
            diagnostics.push(Diagnostic::warning(
                path,
                format!("relation connects element '{}' to itself", from),
            ));
        }
    }
}

/// Check that `from`/`to` names a known element; returns the ID when it is a string
fn check_endpoint<'a>(
    obj: &'a Map<String, Value>,
    path: &str,
    key: &str,
    known_ids: &HashSet<&str>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<&'a str> {
    let field = format!("{}.{}", path, key);
    match obj.get(key) {
        Some(Value::String(id)) if id.is_empty() => {
            diagnostics.push(Diagnostic::error(field, "must not be empty"));
            None
        }
        Some(Value::String(id)) => {
            if !known_ids.contains(id.as_str()) {
                diagnostics.push(Diagnostic::error(
                    field,
                    format!("references unknown element '{}'", id),
                ));
            }
            Some(id.as_str())
        }
        Some(other) => {
            diagnostics.push(Diagnostic::error(
                field,
                format!("must be a string, got {}", type_name(other)),
            ));
            None
        }
        None => {
            diagnostics.push(Diagnostic::error(field, "is required"));
            None
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────

fn check_non_empty_string(
    obj: &Map<String, Value>,
    path: &str,
    key: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let field = format!("{}.{}", path, key);
    match obj.get(key) {
        Some(Value::String(s)) if s.trim().is_empty() => {
            diagnostics.push(Diagnostic::error(field, "must not be empty"))
        }
        Some(Value::String(_)) => {}
        Some(other) => diagnostics.push(Diagnostic::error(
            field,
            format!("must be a string, got {}", type_name(other)),
        )),
        None => diagnostics.push(Diagnostic::error(field, "is required")),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn element_kinds() -> String {
    ElementKind::ALL
        .iter()
        .map(ElementKind::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn relation_kinds() -> String {
    RelationKind::ALL
        .iter()
        .map(RelationKind::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
