//! Node kinds and their boundary geometry.

use crate::error::{Error, Result};
use crate::geom::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Rendered dimensions of places and transitions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeMetrics {
    pub place_radius: f64,
    pub transition_width: f64,
    /// Width of a transition without a label.
    pub silent_transition_width: f64,
    pub transition_height: f64,
}

impl Default for ShapeMetrics {
    fn default() -> Self {
        Self {
            place_radius: 25.0,
            transition_width: 100.0,
            silent_transition_width: 20.0,
            transition_height: 50.0,
        }
    }
}

impl ShapeMetrics {
    pub fn transition_width_for(&self, labelled: bool) -> f64 {
        if labelled {
            self.transition_width
        } else {
            self.silent_transition_width
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Place,
    Transition,
    /// Zero-size routing vertex that only exists inside the layered pipeline.
    Dummy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub position: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, position: Point) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            label: None,
        }
    }

    pub fn place(id: impl Into<String>, position: Point) -> Self {
        Self::new(id, NodeKind::Place, position)
    }

    pub fn transition(id: impl Into<String>, position: Point) -> Self {
        Self::new(id, NodeKind::Transition, position)
    }

    pub fn dummy(id: impl Into<String>, position: Point) -> Self {
        Self::new(id, NodeKind::Dummy, position)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_labelled(&self) -> bool {
        self.label.as_deref().is_some_and(|l| !l.is_empty())
    }

    pub fn is_dummy(&self) -> bool {
        self.kind == NodeKind::Dummy
    }

    pub fn shape(&self, metrics: &ShapeMetrics) -> Shape {
        match self.kind {
            NodeKind::Place => Shape::Circle {
                center: self.position,
                radius: metrics.place_radius,
            },
            NodeKind::Transition => Shape::Rect(Rect::from_center(
                self.position,
                metrics.transition_width_for(self.is_labelled()),
                metrics.transition_height,
            )),
            NodeKind::Dummy => Shape::Point(self.position),
        }
    }

    pub fn lies_outside(&self, p: Point, metrics: &ShapeMetrics) -> bool {
        self.shape(metrics).lies_outside(p)
    }

    /// Point where the ray from this node's center towards `p` leaves the node's shape.
    ///
    /// Callers must check [`Node::lies_outside`] first; a point inside the shape has no
    /// well-defined exit point and yields [`Error::PointInsideShape`].
    pub fn boundary_intersection(&self, p: Point, metrics: &ShapeMetrics) -> Result<Point> {
        self.shape(metrics)
            .boundary_intersection(p)
            .ok_or_else(|| Error::PointInsideShape {
                node: self.id.clone(),
                x: p.x,
                y: p.y,
            })
    }

    /// Boundary point facing `p`, falling back to the center when `p` is inside the shape.
    pub fn boundary_toward(&self, p: Point, metrics: &ShapeMetrics) -> Point {
        self.shape(metrics)
            .boundary_intersection(p)
            .unwrap_or(self.position)
    }
}

/// Outline of a node, resolved against a set of [`ShapeMetrics`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { center: Point, radius: f64 },
    Rect(Rect),
    Point(Point),
}

impl Shape {
    pub fn center(&self) -> Point {
        match *self {
            Shape::Circle { center, .. } => center,
            Shape::Rect(r) => r.center(),
            Shape::Point(p) => p,
        }
    }

    pub fn lies_outside(&self, p: Point) -> bool {
        match *self {
            Shape::Circle { center, radius } => center.distance(p) > radius,
            Shape::Rect(r) => {
                (p.x - r.x).abs() > r.width / 2.0 || (p.y - r.y).abs() > r.height / 2.0
            }
            Shape::Point(_) => true,
        }
    }

    /// `None` when `p` is not outside the shape.
    pub fn boundary_intersection(&self, p: Point) -> Option<Point> {
        if !self.lies_outside(p) {
            return None;
        }
        match *self {
            Shape::Circle { center, radius } => {
                let dir = (p - center).normalized()?;
                Some(center + dir * radius)
            }
            Shape::Rect(r) => Some(rect_exit(r, p)),
            Shape::Point(center) => Some(center),
        }
    }
}

// The four corner angles split the plane into one sector per side. Each sector is closed on its
// counter-clockwise end, so a ray through a corner lands on the side preceding it.
fn rect_exit(r: Rect, p: Point) -> Point {
    let m = r.center();
    let half_w = r.width / 2.0;
    let half_h = r.height / 2.0;
    let dx = p.x - m.x;
    let dy = p.y - m.y;
    let alpha = dy.atan2(dx);

    let beta1 = half_h.atan2(half_w);
    let beta2 = PI - beta1;
    let beta3 = -beta2;
    let beta4 = -beta1;

    // Slopes instead of tan(alpha): tan(PI) is not exactly zero.
    if alpha > beta4 && alpha <= beta1 {
        Point::new(m.x + half_w, m.y + half_w * dy / dx)
    } else if alpha > beta1 && alpha <= beta2 {
        Point::new(m.x + half_h * dx / dy, m.y + half_h)
    } else if alpha > beta3 && alpha <= beta4 {
        Point::new(m.x - half_h * dx / dy, m.y - half_h)
    } else {
        Point::new(m.x - half_w, m.y - half_w * dy / dx)
    }
}
