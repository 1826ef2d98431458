//! Arc/transition collision avoidance.
//!
//! After a layout pass, arcs may be drawn straight through transitions they are not connected
//! to. For every segment of an arc's polyline that crosses such a transition, an automatic anchor
//! is placed beside the segment midpoint, on the side facing away from the transition. The
//! polyline is rebuilt and checked again until no segment collides or the round limit is hit.
//!
//! Automatic anchors are recomputed from scratch on every pass; manual anchors are kept as they
//! are and only reordered along the arc.

use petrel_net::geom::EPSILON;
use petrel_net::{Anchor, Net, Node, Point, Rect, Shape, polyline};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AvoidanceOptions {
    /// Distance between a colliding segment's midpoint and the anchor placed for it.
    pub offset: f64,
    /// Candidates closer than this to an existing anchor are skipped.
    pub too_close: f64,
    pub max_rounds: usize,
    /// Per-axis tolerance used when deciding whether automatic anchors moved.
    pub change_tolerance: f64,
    pub duplicate_tolerance: f64,
}

impl Default for AvoidanceOptions {
    fn default() -> Self {
        Self {
            offset: 20.0,
            too_close: 10.0,
            max_rounds: 10,
            change_tolerance: 0.1,
            duplicate_tolerance: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvoidanceReport {
    /// Arcs whose automatic anchors were added, removed or moved.
    pub arcs_changed: usize,
    /// Arcs that still had collisions when the round limit was reached.
    pub unresolved: usize,
}

impl AvoidanceReport {
    pub fn changed(&self) -> bool {
        self.arcs_changed > 0
    }
}

struct Route {
    anchors: Vec<Anchor>,
    automatic: Vec<Point>,
    resolved: bool,
}

/// Recomputes the automatic anchors of every arc in `net`.
pub fn avoid_collisions(net: &mut Net, options: &AvoidanceOptions) -> AvoidanceReport {
    let obstacles = obstacles(net);
    let mut report = AvoidanceReport::default();

    let mut routes = Vec::with_capacity(net.arc_count());
    for (ix, arc) in net.arcs().iter().enumerate() {
        let (Some(from), Some(to)) = (net.node(&arc.from), net.node(&arc.to)) else {
            continue;
        };
        let route = route_arc(net, from, to, &arc.manual_anchor_points(), &obstacles, options);
        if !route.resolved {
            tracing::warn!(
                arc = ix,
                from = %arc.from,
                to = %arc.to,
                rounds = options.max_rounds,
                "collision avoidance gave up before every collision was resolved"
            );
            report.unresolved += 1;
        }

        let previous: Vec<Point> = arc
            .anchors
            .iter()
            .filter(|a| a.is_automatic())
            .map(|a| a.point)
            .collect();
        if anchors_changed(&previous, &route.automatic, options.change_tolerance) {
            tracing::debug!(
                arc = ix,
                before = previous.len(),
                after = route.automatic.len(),
                "automatic anchors changed"
            );
            report.arcs_changed += 1;
        }
        routes.push((ix, route.anchors));
    }

    for (ix, anchors) in routes {
        if let Some(arc) = net.arc_mut(ix) {
            arc.anchors = anchors;
        }
    }
    report
}

/// Ids of transitions, other than the arc's endpoints, that a segment of arc `arc` crosses.
pub fn collisions(net: &Net, arc: usize) -> Vec<String> {
    let Some(a) = net.arc(arc) else {
        return Vec::new();
    };
    let (Some(from), Some(to)) = (net.node(&a.from), net.node(&a.to)) else {
        return Vec::new();
    };
    let points = polyline(from, to, &a.anchor_points(), net.metrics());
    obstacles(net)
        .into_iter()
        .filter(|(id, rect)| {
            *id != from.id
                && *id != to.id
                && points.windows(2).any(|s| rect.intersects_segment(s[0], s[1]))
        })
        .map(|(id, _)| id.to_string())
        .collect()
}

fn obstacles(net: &Net) -> Vec<(&str, Rect)> {
    net.transitions()
        .map(|t| match t.shape(net.metrics()) {
            Shape::Rect(r) => (t.id.as_str(), r),
            other => (t.id.as_str(), Rect::from_center(other.center(), 0.0, 0.0)),
        })
        .collect()
}

fn route_arc(
    net: &Net,
    from: &Node,
    to: &Node,
    manual: &[Point],
    obstacles: &[(&str, Rect)],
    options: &AvoidanceOptions,
) -> Route {
    let mut automatic: Vec<Point> = Vec::new();
    let mut current: Vec<Point> = manual.to_vec();
    let mut resolved = false;

    for _ in 0..options.max_rounds {
        let points = polyline(from, to, &current, net.metrics());
        let mut added: Vec<Point> = Vec::new();

        for segment in points.windows(2) {
            let (start, end) = (segment[0], segment[1]);
            let mid = start.midpoint(end);
            let mut best: Option<(f64, Point)> = None;

            for (id, rect) in obstacles {
                if *id == from.id || *id == to.id || !rect.intersects_segment(start, end) {
                    continue;
                }
                let candidate = avoidance_anchor(start, end, rect.center(), options.offset);
                let crowded = manual
                    .iter()
                    .chain(&automatic)
                    .chain(&added)
                    .any(|a| a.distance(candidate) < options.too_close);
                if crowded {
                    continue;
                }
                let distance = rect.center().distance_squared(mid);
                if best.is_none_or(|(d, _)| distance < d) {
                    best = Some((distance, candidate));
                }
            }

            if let Some((_, anchor)) = best {
                let duplicate = automatic
                    .iter()
                    .chain(&added)
                    .any(|a| a.approx_eq(anchor, options.duplicate_tolerance));
                if !duplicate {
                    added.push(anchor);
                }
            }
        }

        if added.is_empty() {
            resolved = true;
            break;
        }
        automatic.extend(added);
        current = merged(from, to, manual, &automatic)
            .into_iter()
            .map(|a| a.point)
            .collect();
    }

    Route {
        anchors: merged(from, to, manual, &automatic),
        automatic,
        resolved,
    }
}

fn merged(from: &Node, to: &Node, manual: &[Point], automatic: &[Point]) -> Vec<Anchor> {
    let mut anchors: Vec<Anchor> = manual
        .iter()
        .copied()
        .map(Anchor::manual)
        .chain(automatic.iter().copied().map(Anchor::automatic))
        .collect();
    sort_along(from.position, to.position, &mut anchors);
    anchors
}

/// Point `offset` away from the midpoint of `p1`-`p2`, perpendicular to the segment and on the
/// side away from `center`.
pub fn avoidance_anchor(p1: Point, p2: Point, center: Point, offset: f64) -> Point {
    let mid = p1.midpoint(p2);
    let d = p2 - p1;
    let mut normal = Point::new(-d.y, d.x)
        .normalized()
        .unwrap_or(Point::new(0.0, 1.0));
    if normal.dot(center - mid) > 0.0 {
        normal = normal * -1.0;
    }
    mid + normal * offset
}

/// Orders anchors by their projection onto the `start`-`end` baseline. A degenerate baseline
/// falls back to ordering by `y`, then `x`.
pub fn sort_along(start: Point, end: Point, anchors: &mut [Anchor]) {
    let base = end - start;
    let len_sq = base.length_squared();
    if len_sq < EPSILON {
        anchors.sort_by(|a, b| {
            a.point
                .y
                .total_cmp(&b.point.y)
                .then(a.point.x.total_cmp(&b.point.x))
        });
        return;
    }
    let t = |p: Point| (p - start).dot(base) / len_sq;
    anchors.sort_by(|a, b| t(a.point).total_cmp(&t(b.point)));
}

/// Whether two automatic anchor sets differ beyond `tolerance`, independent of their order.
pub fn anchors_changed(before: &[Point], after: &[Point], tolerance: f64) -> bool {
    if before.len() != after.len() {
        return true;
    }
    let sorted = |points: &[Point]| {
        let mut v = points.to_vec();
        v.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        v
    };
    sorted(before)
        .iter()
        .zip(sorted(after).iter())
        .any(|(a, b)| !a.approx_eq(*b, tolerance))
}
