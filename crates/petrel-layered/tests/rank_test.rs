use petrel_layered::{Error, LayeredGraph, rank};
use petrel_net::Net;

fn ids(layering: &[Vec<String>]) -> Vec<Vec<&str>> {
    layering
        .iter()
        .map(|l| l.iter().map(String::as_str).collect())
        .collect()
}

#[test]
fn rank_longest_path_layers_a_simple_chain() {
    let mut net = Net::new();
    net.add_place("P1", 0.0, 0.0).unwrap();
    net.add_transition("T1", 0.0, 0.0).unwrap();
    net.add_place("P2", 0.0, 0.0).unwrap();
    net.add_arc("P1", "T1", 1).unwrap();
    net.add_arc("T1", "P2", 1).unwrap();

    let layering = rank::longest_path(&LayeredGraph::from_net(&net)).unwrap();
    assert_eq!(ids(&layering), vec![vec!["P1"], vec!["T1"], vec!["P2"]]);
}

#[test]
fn rank_longest_path_places_nodes_after_all_predecessors() {
    let mut g = LayeredGraph::new();
    g.add_edge("a", "b", 1);
    g.add_edge("b", "c", 1);
    g.add_edge("a", "c", 1);
    g.add_edge("x", "c", 1);

    let layering = rank::longest_path(&g).unwrap();
    let index = rank::layer_index(&layering);
    for e in g.edges() {
        assert!(index[e.from.as_str()] < index[e.to.as_str()]);
    }
    assert_eq!(index["c"], 2);
    assert_eq!(index["x"], 0);
}

#[test]
fn rank_longest_path_puts_isolated_nodes_first() {
    let mut net = Net::new();
    net.add_place("lonely", 0.0, 0.0).unwrap();
    let layering = rank::longest_path(&LayeredGraph::from_net(&net)).unwrap();
    assert_eq!(ids(&layering), vec![vec!["lonely"]]);
}

#[test]
fn rank_longest_path_of_an_empty_graph_is_empty() {
    let layering = rank::longest_path(&LayeredGraph::new()).unwrap();
    assert!(layering.is_empty());
}

#[test]
fn rank_longest_path_reports_overflow_on_cycles() {
    let mut g = LayeredGraph::new();
    g.add_edge("a", "b", 1);
    g.add_edge("b", "a", 1);

    assert_eq!(
        rank::longest_path(&g),
        Err(Error::LayerOverflow { layers: 3, nodes: 2 })
    );
}
