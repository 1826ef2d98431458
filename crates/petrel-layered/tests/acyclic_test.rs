use petrel_layered::{LayeredGraph, acyclic, rank};

fn edge_list(g: &LayeredGraph) -> Vec<(String, String)> {
    g.edges()
        .iter()
        .map(|e| (e.from.clone(), e.to.clone()))
        .collect()
}

#[test]
fn acyclic_run_does_not_change_an_already_acyclic_graph() {
    let mut g = LayeredGraph::new();
    g.add_edge("a", "b", 1);
    g.add_edge("b", "c", 1);
    g.add_edge("a", "c", 1);
    let before = edge_list(&g);

    assert_eq!(acyclic::run(&mut g), 0);
    assert_eq!(edge_list(&g), before);
    assert!(acyclic::reversed_edges(&g).is_empty());
}

#[test]
fn acyclic_run_breaks_cycles_in_the_input_graph() {
    let mut g = LayeredGraph::new();
    g.add_edge("a", "b", 1);
    g.add_edge("b", "c", 1);
    g.add_edge("c", "d", 1);
    g.add_edge("d", "a", 1);
    g.add_edge("c", "b", 1);

    assert!(rank::longest_path(&g).is_err());
    let reversed = acyclic::run(&mut g);
    assert_eq!(reversed, 2);
    assert!(rank::longest_path(&g).is_ok());
}

#[test]
fn acyclic_reverses_the_edge_closing_the_dfs_cycle() {
    let mut g = LayeredGraph::new();
    g.add_edge("p1", "t1", -1);
    g.add_edge("t1", "p1", 1);

    acyclic::run(&mut g);
    assert_eq!(acyclic::reversed_edges(&g), vec![1]);
    assert_eq!(g.edges()[1].from, "p1");
    assert_eq!(g.edges()[1].to, "t1");
}

#[test]
fn acyclic_undo_restores_original_directions() {
    let mut g = LayeredGraph::new();
    g.add_edge("a", "b", 1);
    g.add_edge("b", "c", 1);
    g.add_edge("c", "a", 1);
    g.add_edge("c", "d", 1);
    g.add_edge("d", "b", 1);
    let before = edge_list(&g);

    let reversed = acyclic::run(&mut g);
    assert!(reversed > 0);
    assert_ne!(edge_list(&g), before);

    assert_eq!(acyclic::undo(&mut g), reversed);
    assert_eq!(edge_list(&g), before);
    assert!(g.edges().iter().all(|e| !e.reversed));
}

#[test]
fn acyclic_breaks_a_long_ring_without_deep_recursion() {
    let n = 20_000;
    let mut g = LayeredGraph::new();
    for i in 0..n {
        g.add_edge(&format!("n{i}"), &format!("n{}", (i + 1) % n), 1);
    }

    assert_eq!(acyclic::run(&mut g), 1);
    // The DFS starts at n0, so the edge closing the ring is the last one.
    assert_eq!(acyclic::reversed_edges(&g), vec![n - 1]);
    assert_eq!(g.edges()[n - 1].from, "n0");
    assert_eq!(g.edges()[n - 1].to, format!("n{}", n - 1));
}
