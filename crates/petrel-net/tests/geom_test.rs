use petrel_net::geom::{Orientation, orientation, segments_intersect};
use petrel_net::{Point, Rect, points_attr};

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

#[test]
fn geom_orientation_distinguishes_turn_directions() {
    assert_eq!(orientation(p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)), Orientation::Collinear);
    assert_eq!(orientation(p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0)), Orientation::CounterClockwise);
    assert_eq!(orientation(p(0.0, 0.0), p(1.0, 0.0), p(1.0, -1.0)), Orientation::Clockwise);
}

#[test]
fn geom_segments_intersect_detects_proper_crossings() {
    assert!(segments_intersect(p(0.0, 0.0), p(10.0, 10.0), p(0.0, 10.0), p(10.0, 0.0)));
    assert!(!segments_intersect(p(0.0, 0.0), p(10.0, 0.0), p(0.0, 5.0), p(10.0, 5.0)));
}

#[test]
fn geom_segments_intersect_handles_touching_and_collinear_segments() {
    // Endpoint touching the other segment.
    assert!(segments_intersect(p(0.0, 0.0), p(10.0, 0.0), p(5.0, 0.0), p(5.0, 5.0)));
    // Overlapping collinear segments.
    assert!(segments_intersect(p(0.0, 0.0), p(10.0, 0.0), p(5.0, 0.0), p(15.0, 0.0)));
    // Collinear but disjoint.
    assert!(!segments_intersect(p(0.0, 0.0), p(4.0, 0.0), p(5.0, 0.0), p(15.0, 0.0)));
}

#[test]
fn geom_rect_intersects_segment_when_crossing_an_edge() {
    let r = Rect::from_center(p(100.0, 100.0), 100.0, 50.0);
    assert!(r.intersects_segment(p(0.0, 100.0), p(200.0, 100.0)));
    assert!(r.intersects_segment(p(100.0, 0.0), p(100.0, 200.0)));
    assert!(!r.intersects_segment(p(0.0, 0.0), p(200.0, 0.0)));
}

#[test]
fn geom_rect_intersects_segment_lying_fully_inside() {
    let r = Rect::from_center(p(0.0, 0.0), 100.0, 50.0);
    assert!(r.intersects_segment(p(-10.0, 0.0), p(10.0, 5.0)));
}

#[test]
fn geom_rect_contains_its_border() {
    let r = Rect::from_center(p(0.0, 0.0), 10.0, 10.0);
    assert!(r.contains(p(5.0, 5.0)));
    assert!(!r.contains(p(5.1, 0.0)));
    assert_eq!(r.corners()[0], p(-5.0, -5.0));
    assert_eq!(r.corners()[2], p(5.0, 5.0));
}

#[test]
fn geom_points_attr_appends_a_space_after_every_pair() {
    assert_eq!(points_attr(&[p(1.0, 2.0), p(3.5, 4.0)]), "1,2 3.5,4 ");
    assert_eq!(points_attr(&[]), "");
}

#[test]
fn geom_normalized_rejects_zero_vectors() {
    assert_eq!(p(0.0, 0.0).normalized(), None);
    let n = p(3.0, 4.0).normalized().unwrap();
    assert!((n.x - 0.6).abs() < 1e-12 && (n.y - 0.8).abs() < 1e-12);
}
