use crate::error::{Error, Result};
use crate::geom::{Point, points_attr};
use crate::shape::{Node, NodeKind, ShapeMetrics};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who placed an anchor. Collision avoidance owns automatic anchors and rebuilds them freely;
/// manual anchors are never moved by it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnchorKind {
    #[default]
    Manual,
    Automatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    #[serde(flatten)]
    pub point: Point,
    #[serde(default)]
    pub kind: AnchorKind,
}

impl Anchor {
    pub fn manual(point: Point) -> Self {
        Self {
            point,
            kind: AnchorKind::Manual,
        }
    }

    pub fn automatic(point: Point) -> Self {
        Self {
            point,
            kind: AnchorKind::Automatic,
        }
    }

    pub fn is_automatic(&self) -> bool {
        self.kind == AnchorKind::Automatic
    }
}

/// Directed weighted connection between a place and a transition.
///
/// Arcs leaving a place store a negative weight; [`Arc::multiplicity`] is the token count
/// regardless of direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub from: String,
    pub to: String,
    pub weight: i64,
    #[serde(default)]
    pub anchors: Vec<Anchor>,
}

impl Arc {
    pub fn multiplicity(&self) -> u64 {
        self.weight.unsigned_abs()
    }

    pub fn anchor_points(&self) -> Vec<Point> {
        self.anchors.iter().map(|a| a.point).collect()
    }

    pub fn manual_anchor_points(&self) -> Vec<Point> {
        self.anchors
            .iter()
            .filter(|a| !a.is_automatic())
            .map(|a| a.point)
            .collect()
    }
}

/// What kind of edit a listener is being told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetChange {
    /// Nodes or arcs were added or removed.
    Structure,
    /// Positions or anchors moved.
    Layout,
}

type Listener = Box<dyn Fn(&NetChange) + Send + Sync>;

/// Mutable store of a place/transition net.
///
/// Nodes and arcs keep insertion order; every layout pass iterates them in that order so runs
/// are reproducible.
#[derive(Default)]
pub struct Net {
    metrics: ShapeMetrics,
    nodes: Vec<Node>,
    node_index: FxHashMap<String, usize>,
    arcs: Vec<Arc>,
    arc_index: FxHashMap<(String, String), usize>,
    revision: u64,
    listeners: Vec<Listener>,
}

impl fmt::Debug for Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Net")
            .field("metrics", &self.metrics)
            .field("nodes", &self.nodes)
            .field("arcs", &self.arcs)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Net {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(metrics: ShapeMetrics) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }

    pub fn metrics(&self) -> &ShapeMetrics {
        &self.metrics
    }

    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if node.is_dummy() {
            return Err(Error::DummyNode { id: node.id });
        }
        if self.node_index.contains_key(&node.id) {
            return Err(Error::DuplicateNode { id: node.id });
        }
        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    pub fn add_place(&mut self, id: impl Into<String>, x: f64, y: f64) -> Result<()> {
        self.add_node(Node::place(id, Point::new(x, y)))
    }

    pub fn add_transition(&mut self, id: impl Into<String>, x: f64, y: f64) -> Result<()> {
        self.add_node(Node::transition(id, Point::new(x, y)))
    }

    /// Adds an arc and returns its index.
    ///
    /// `weight` is the multiplicity; the stored sign is derived from the direction.
    pub fn add_arc(&mut self, from: &str, to: &str, weight: u32) -> Result<usize> {
        let from_kind = self.require_node(from)?.kind;
        let to_kind = self.require_node(to)?.kind;
        if from_kind == to_kind {
            return Err(Error::SameKindArc {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        let key = (from.to_string(), to.to_string());
        if self.arc_index.contains_key(&key) {
            return Err(Error::DuplicateArc { from: key.0, to: key.1 });
        }

        let weight = i64::from(weight);
        let weight = if from_kind == NodeKind::Place {
            -weight
        } else {
            weight
        };
        let index = self.arcs.len();
        self.arc_index.insert(key, index);
        self.arcs.push(Arc {
            from: from.to_string(),
            to: to.to_string(),
            weight,
            anchors: Vec::new(),
        });
        Ok(index)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&ix| &self.nodes[ix])
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    fn require_node(&self, id: &str) -> Result<&Node> {
        self.node(id).ok_or_else(|| Error::UnknownNode { id: id.to_string() })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn places(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Place)
    }

    pub fn transitions(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.kind == NodeKind::Transition)
    }

    pub fn position(&self, id: &str) -> Option<Point> {
        self.node(id).map(|n| n.position)
    }

    pub fn set_position(&mut self, id: &str, position: Point) -> Result<()> {
        let ix = *self
            .node_index
            .get(id)
            .ok_or_else(|| Error::UnknownNode { id: id.to_string() })?;
        self.nodes[ix].position = position;
        Ok(())
    }

    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn arc(&self, index: usize) -> Option<&Arc> {
        self.arcs.get(index)
    }

    pub fn arc_mut(&mut self, index: usize) -> Option<&mut Arc> {
        self.arcs.get_mut(index)
    }

    pub fn find_arc(&self, from: &str, to: &str) -> Option<usize> {
        self.arc_index
            .get(&(from.to_string(), to.to_string()))
            .copied()
    }

    /// Indices of arcs touching `id`, in arc order.
    pub fn incident_arcs(&self, id: &str) -> Vec<usize> {
        self.arcs
            .iter()
            .enumerate()
            .filter(|(_, a)| a.from == id || a.to == id)
            .map(|(ix, _)| ix)
            .collect()
    }

    fn require_arc(&self, index: usize) -> Result<&Arc> {
        self.arcs.get(index).ok_or(Error::UnknownArc { index })
    }

    fn require_arc_mut(&mut self, index: usize) -> Result<&mut Arc> {
        self.arcs.get_mut(index).ok_or(Error::UnknownArc { index })
    }

    /// Ordered points used to draw arc `index`: the boundary exit of the source, every anchor,
    /// then the boundary entry of the target.
    pub fn polyline(&self, index: usize) -> Result<Vec<Point>> {
        let arc = self.require_arc(index)?;
        let from = self.require_node(&arc.from)?;
        let to = self.require_node(&arc.to)?;
        Ok(polyline(from, to, &arc.anchor_points(), &self.metrics))
    }

    pub fn points_attr(&self, index: usize) -> Result<String> {
        Ok(points_attr(&self.polyline(index)?))
    }

    /// Moves a node; anchors of every incident arc follow by half the offset.
    pub fn move_node_by(&mut self, id: &str, dx: f64, dy: f64) -> Result<()> {
        let ix = *self
            .node_index
            .get(id)
            .ok_or_else(|| Error::UnknownNode { id: id.to_string() })?;
        let delta = Point::new(dx, dy);
        self.nodes[ix].position = self.nodes[ix].position + delta;
        let half = delta * 0.5;
        for arc in self.arcs.iter_mut().filter(|a| a.from == id || a.to == id) {
            for anchor in &mut arc.anchors {
                anchor.point = anchor.point + half;
            }
        }
        Ok(())
    }

    /// Shifts every node and anchor by the same offset.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        let delta = Point::new(dx, dy);
        for node in &mut self.nodes {
            node.position = node.position + delta;
        }
        for anchor in self.arcs.iter_mut().flat_map(|a| a.anchors.iter_mut()) {
            anchor.point = anchor.point + delta;
        }
    }

    /// Splits segment `segment` of the arc's polyline with a new manual anchor.
    ///
    /// Segment 0 runs from the source node to the first anchor.
    pub fn insert_anchor(&mut self, arc: usize, segment: usize, point: Point) -> Result<()> {
        let anchors = &mut self.require_arc_mut(arc)?.anchors;
        if segment > anchors.len() {
            return Err(Error::AnchorOutOfRange {
                arc,
                index: segment,
                len: anchors.len(),
            });
        }
        anchors.insert(segment, Anchor::manual(point));
        Ok(())
    }

    /// Drags an anchor by an offset. A dragged anchor becomes manual.
    pub fn move_anchor(&mut self, arc: usize, index: usize, dx: f64, dy: f64) -> Result<()> {
        let anchors = &mut self.require_arc_mut(arc)?.anchors;
        let len = anchors.len();
        let anchor = anchors
            .get_mut(index)
            .ok_or(Error::AnchorOutOfRange { arc, index, len })?;
        *anchor = Anchor::manual(anchor.point + Point::new(dx, dy));
        Ok(())
    }

    pub fn remove_anchor(&mut self, arc: usize, index: usize) -> Result<Anchor> {
        let anchors = &mut self.require_arc_mut(arc)?.anchors;
        if index >= anchors.len() {
            return Err(Error::AnchorOutOfRange {
                arc,
                index,
                len: anchors.len(),
            });
        }
        Ok(anchors.remove(index))
    }

    pub fn clear_anchors(&mut self, arc: usize) -> Result<()> {
        self.require_arc_mut(arc)?.anchors.clear();
        Ok(())
    }

    pub fn clear_all_anchors(&mut self) {
        for arc in &mut self.arcs {
            arc.anchors.clear();
        }
    }

    /// Registers a callback invoked by [`Net::notify`].
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&NetChange) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Bumps the revision counter and informs every listener.
    pub fn notify(&mut self, change: NetChange) {
        self.revision = self.revision.wrapping_add(1);
        tracing::trace!(?change, revision = self.revision, "net changed");
        for listener in &self.listeners {
            listener(&change);
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Builds the drawing polyline for an arc between `from` and `to` through `anchors`.
///
/// The endpoints are boundary points facing the first and last anchor (or the opposite node
/// when there are none). A reference point inside a shape degrades to that shape's center, so
/// the result always has at least two points.
pub fn polyline(from: &Node, to: &Node, anchors: &[Point], metrics: &ShapeMetrics) -> Vec<Point> {
    let first = anchors.first().copied().unwrap_or(to.position);
    let last = anchors.last().copied().unwrap_or(from.position);

    let mut points = Vec::with_capacity(anchors.len() + 2);
    points.push(from.boundary_toward(first, metrics));
    points.extend_from_slice(anchors);
    points.push(to.boundary_toward(last, metrics));
    points
}
