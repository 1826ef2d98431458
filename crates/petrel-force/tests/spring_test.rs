use petrel_force::spring::{repulsion, spring};
use petrel_force::{SpringEmbedder, SpringOptions};
use petrel_net::{Net, Point};

fn pair_net(distance: f64) -> Net {
    let mut net = Net::new();
    net.add_place("p", 0.0, 0.0).unwrap();
    net.add_transition("t", distance, 0.0).unwrap();
    net.add_arc("p", "t", 1).unwrap();
    net
}

#[test]
fn spring_repulsion_pushes_apart_and_vanishes_when_coincident() {
    let o = SpringOptions::default();
    let f = repulsion(Point::new(0.0, 0.0), Point::new(100.0, 0.0), &o);
    assert!(f.x < 0.0);
    assert!((f.x + 20000.0 / (10000.0 + 0.01)).abs() < 1e-9);
    assert_eq!(f.y, 0.0);

    assert_eq!(
        repulsion(Point::new(5.0, 5.0), Point::new(5.0, 5.0), &o),
        Point::default()
    );
}

#[test]
fn spring_force_sign_follows_the_ideal_length() {
    let o = SpringOptions::default();
    let p = Point::new(0.0, 0.0);

    let far = spring(p, Point::new(300.0, 0.0), &o);
    assert!(far.x > 0.0);
    assert!((far.x - 20.0 * 2f64.log10()).abs() < 1e-9);

    let near = spring(p, Point::new(75.0, 0.0), &o);
    assert!(near.x < 0.0);

    let ideal = spring(p, Point::new(150.0, 0.0), &o);
    assert!(ideal.x.abs() < 1e-12);

    assert_eq!(spring(p, p, &o), Point::default());
}

#[test]
fn spring_embedder_ignores_isolated_nodes() {
    let mut net = pair_net(200.0);
    net.add_place("alone", 5.0, 5.0).unwrap();

    let e = SpringEmbedder::new(&net, SpringOptions::default());
    assert_eq!(e.ids(), &["p".to_string(), "t".to_string()]);
    assert_eq!(e.position("alone"), None);
    assert_eq!(e.neighbors("p"), vec!["t"]);
}

#[test]
fn spring_embedder_separates_coincident_nodes_before_iterating() {
    let mut net = Net::new();
    net.add_place("p1", 10.0, 10.0).unwrap();
    net.add_place("p2", 10.0, 10.0).unwrap();
    net.add_transition("t", 200.0, 10.0).unwrap();
    net.add_arc("p1", "t", 1).unwrap();
    net.add_arc("p2", "t", 1).unwrap();

    let mut e = SpringEmbedder::new(&net, SpringOptions::default());
    let report = e.separate_coincident();
    assert_eq!(report.shifted, 1);
    assert_eq!(report.exhausted, 0);

    let p1 = e.position("p1").unwrap();
    let p2 = e.position("p2").unwrap();
    assert_eq!(p1, Point::new(10.0, 10.0));
    assert_ne!(p1, p2);
    assert!((p2.x - p1.x).abs() <= 50.0 && (p2.y - p1.y).abs() <= 50.0);

    // Same seed, same jitter.
    let mut again = SpringEmbedder::new(&net, SpringOptions::default());
    again.separate_coincident();
    assert_eq!(again.positions(), e.positions());
}

#[test]
fn spring_embedder_gives_up_after_the_attempt_budget() {
    let mut net = Net::new();
    net.add_place("p", 0.0, 0.0).unwrap();
    net.add_transition("t", 0.0, 0.0).unwrap();
    net.add_arc("p", "t", 1).unwrap();

    let options = SpringOptions {
        max_shift_attempts: 0,
        ..Default::default()
    };
    let mut e = SpringEmbedder::new(&net, options);
    let report = e.separate_coincident();
    assert_eq!(report.exhausted, 1);
    assert_eq!(e.position("t"), Some(Point::new(0.0, 0.0)));
}

#[test]
fn spring_embedder_step_is_synchronous() {
    let net = pair_net(200.0);
    let mut e = SpringEmbedder::new(&net, SpringOptions::default());
    let max = e.step();

    // Both forces are computed from the starting positions, so the pair moves symmetrically.
    let p = e.position("p").unwrap();
    let t = e.position("t").unwrap();
    assert!((p.x + (t.x - 200.0)).abs() < 1e-9);
    assert!((p.x.abs() - max).abs() < 1e-9);
    assert!(p.x > 0.0);
}

#[test]
fn spring_embedder_settles_near_the_ideal_length() {
    let net = pair_net(200.0);
    let mut e = SpringEmbedder::new(&net, SpringOptions::default());
    let mut iterations = 0;
    while e.step() >= 0.01 {
        iterations += 1;
        assert!(iterations < 500, "did not converge");
    }
    let d = e.position("p").unwrap().distance(e.position("t").unwrap());
    assert!(d > 150.0 && d < 180.0, "distance {d}");
}
