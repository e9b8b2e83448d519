//! Core types for the layout engine

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scene::{Element, Relation};

/// A 2D point in canvas space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `other` to `self`
    pub fn sub(&self, other: Point) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y)
    }

    pub fn offset(&self, v: Vector) -> Point {
        Point::new(self.x + v.x, self.y + v.y)
    }
}

/// A displacement or force in canvas space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector at `angle` radians (0 = +x, clockwise on a y-down canvas)
    pub fn angled(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn scale(&self, factor: f64) -> Vector {
        Vector::new(self.x * factor, self.y * factor)
    }

    /// Rescale so the length does not exceed `max`
    pub fn limit(&self, max: f64) -> Vector {
        let len = self.length();
        if len > max && len > 0.0 {
            self.scale(max / len)
        } else {
            *self
        }
    }

    pub fn add_assign(&mut self, other: Vector) {
        self.x += other.x;
        self.y += other.y;
    }

    pub fn sub_assign(&mut self, other: Vector) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

/// An axis-aligned bounding box, positioned by its top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box of the given size centered on `center`
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Grow the box by `margin` on every side
    pub fn inflate(&self, margin: f64) -> BoundingBox {
        BoundingBox::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    /// Check if this bounding box intersects another (touching edges do not count)
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Computed layout: node ID to center position.
///
/// Ordered by ID so serialized output is stable.
pub type Positions = BTreeMap<String, Point>;

/// A node in the layout graph, positioned by its center
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Pinned nodes are never moved by the force simulation
    pub fixed: bool,
    /// Scene payload carried through layout untouched
    pub element: Option<Element>,
}

impl Node {
    pub fn new(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width,
            height,
            fixed: false,
            element: None,
        }
    }

    /// Builder: pin the node in place
    pub fn with_fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    /// Builder: attach the originating element
    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::centered(self.position(), self.width, self.height)
    }
}

/// A directed edge between two node IDs
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    /// Scene payload carried through layout untouched
    pub relation: Option<Relation>,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation: None,
        }
    }

    /// Builder: attach the originating relation
    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relation = Some(relation);
        self
    }
}

/// Read current positions off a node list
pub fn positions_of(nodes: &[Node]) -> Positions {
    nodes
        .iter()
        .map(|n| (n.id.clone(), n.position()))
        .collect()
}
