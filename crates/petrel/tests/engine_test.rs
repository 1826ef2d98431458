use futures::executor::block_on;
use futures::task::noop_waker_ref;
use petrel::{
    Algorithm, AnchorKind, Canvas, Engine, Error, LayoutConfig, Net, NetChange, Node, Point,
    StopReason,
};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::Context;

fn chain_net(engine: &Engine) -> Net {
    let mut net = engine.new_net();
    net.add_place("P1", 0.0, 0.0).unwrap();
    net.add_transition("T1", 0.0, 0.0).unwrap();
    net.add_place("P2", 0.0, 0.0).unwrap();
    net.add_arc("P1", "T1", 1).unwrap();
    net.add_arc("T1", "P2", 1).unwrap();
    net
}

fn pair_net(engine: &Engine, distance: f64) -> Net {
    let mut net = engine.new_net();
    net.add_place("p", 0.0, 0.0).unwrap();
    net.add_transition("t", distance, 0.0).unwrap();
    net.add_arc("p", "t", 1).unwrap();
    net
}

fn count_layout_changes(net: &mut Net) -> Arc<AtomicUsize> {
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    net.subscribe(move |change| {
        if *change == NetChange::Layout {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });
    seen
}

#[test]
fn engine_layered_layout_places_a_chain_in_columns() {
    let engine = Engine::default();
    let mut net = chain_net(&engine);
    let seen = count_layout_changes(&mut net);

    let report = engine
        .layout_sync(&mut net, Algorithm::Layered, Canvas::default())
        .unwrap();

    assert_eq!(report.algorithm, Algorithm::Layered);
    let summary = report.layered.clone().unwrap();
    assert_eq!(summary.layers, 3);
    assert_eq!(summary.dummies, 0);
    assert!(report.force.is_none());
    assert!(!report.anchors_changed());

    assert_eq!(net.position("P1"), Some(Point::new(150.0, 200.0)));
    assert_eq!(net.position("T1"), Some(Point::new(450.0, 200.0)));
    assert_eq!(net.position("P2"), Some(Point::new(750.0, 200.0)));
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn engine_layered_layout_routes_long_arcs_through_manual_anchors() {
    let engine = Engine::default();
    let mut net = chain_net(&engine);
    net.add_transition("T2", 0.0, 0.0).unwrap();
    net.add_arc("P2", "T2", 1).unwrap();
    net.add_arc("P1", "T2", 1).unwrap();

    let report = engine
        .layout_sync(&mut net, Algorithm::Layered, Canvas::default())
        .unwrap();
    assert_eq!(report.layered.unwrap().dummies, 2);

    let long = net.find_arc("P1", "T2").unwrap();
    let anchors = &net.arcs()[long].anchors;
    assert!(!anchors.is_empty());
    assert!(anchors.iter().any(|a| a.kind == AnchorKind::Manual));
}

#[test]
fn engine_force_layout_runs_on_any_executor() {
    let engine = Engine::default();
    let mut net = pair_net(&engine, 200.0);
    let seen = count_layout_changes(&mut net);

    let report = block_on(engine.layout(&mut net, Algorithm::ForceDirected, Canvas::default()))
        .unwrap();

    let outcome = report.force.unwrap();
    assert_eq!(outcome.stop, StopReason::Converged);
    assert!(report.layered.is_none());
    // One notification per iteration plus the final one.
    assert_eq!(seen.load(Ordering::SeqCst), outcome.iterations + 1);

    let d = net.position("p").unwrap().distance(net.position("t").unwrap());
    assert!(d > 150.0 && d < 180.0, "distance {d}");
}

#[test]
fn engine_rejects_overlapping_force_runs_without_touching_the_net() {
    let engine = Engine::default();
    let mut first = pair_net(&engine, 10.0);
    let mut second = pair_net(&engine, 10.0);
    second.insert_anchor(0, 0, Point::new(5.0, 40.0)).unwrap();
    let revision = second.revision();

    let mut running =
        Box::pin(engine.layout(&mut first, Algorithm::ForceDirected, Canvas::default()));
    let mut cx = Context::from_waker(noop_waker_ref());
    assert!(running.as_mut().poll(&mut cx).is_pending());

    let report = engine
        .layout_sync(&mut second, Algorithm::ForceDirected, Canvas::default())
        .unwrap();
    assert_eq!(report.force.unwrap().stop, StopReason::AlreadyRunning);
    assert!(!report.anchors_changed());
    assert_eq!(second.revision(), revision);
    assert_eq!(second.arcs()[0].anchors.len(), 1);

    engine.terminate();
    let report = block_on(running).unwrap();
    assert_eq!(report.force.unwrap().stop, StopReason::Terminated);
}

#[test]
fn engine_avoid_collisions_only_touches_anchors() {
    let engine = Engine::default();
    let mut net = engine.new_net();
    net.add_place("P1", 0.0, 0.0).unwrap();
    net.add_transition("T1", 400.0, 0.0).unwrap();
    net.add_node(Node::transition("T2", Point::new(200.0, 20.0)).with_label("fire"))
        .unwrap();
    net.add_arc("P1", "T1", 1).unwrap();
    let seen = count_layout_changes(&mut net);

    let report = engine.avoid_collisions(&mut net);
    assert_eq!(report.arcs_changed, 1);
    assert_eq!(net.position("T2"), Some(Point::new(200.0, 20.0)));
    assert_eq!(net.arcs()[0].anchors.len(), 1);
    assert!(net.arcs()[0].anchors[0].is_automatic());
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn engine_config_defaults_fill_missing_keys() {
    let config = LayoutConfig::from_json_str("{}").unwrap();
    assert_eq!(config, LayoutConfig::default());

    let config = LayoutConfig::from_json_str(
        r#"{
            "shapes": { "placeRadius": 30 },
            "force": { "maxIterations": 10, "idealLength": 120 },
            "layered": { "maxOrderIterations": 4 },
            "avoidance": { "tooClose": 5 }
        }"#,
    )
    .unwrap();
    assert_eq!(config.shapes.place_radius, 30.0);
    assert_eq!(config.shapes.transition_height, 50.0);
    assert_eq!(config.force.max_iterations, 10);
    assert_eq!(config.force.ideal_length, 120.0);
    assert_eq!(config.layered.max_order_iterations, 4);
    assert_eq!(config.avoidance.too_close, 5.0);
    assert_eq!(config.avoidance.offset, 20.0);

    let value = config.to_json_value().unwrap();
    assert_eq!(LayoutConfig::from_json_value(value).unwrap(), config);

    let engine = Engine::new(config);
    assert_eq!(engine.new_net().metrics().place_radius, 30.0);
}

#[test]
fn engine_reports_invalid_config_and_net_errors() {
    let err = LayoutConfig::from_json_str(r#"{ "force": { "epsilon": "small" } }"#).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().starts_with("invalid layout configuration"));

    let mut net = Net::new();
    net.add_place("p", 0.0, 0.0).unwrap();
    let err: Error = net.add_arc("p", "missing", 1).unwrap_err().into();
    assert!(matches!(err, Error::Net(petrel_net::Error::UnknownNode { .. })));
}
