//! Working graph for the layered pipeline.
//!
//! The pipeline never mutates the [`Net`] until the final commit: it copies nodes and arcs into a
//! [`LayeredGraph`], inserts and removes dummy nodes there, and writes positions and anchors back
//! at the end. Every edge remembers the index of the net arc it stands for.

use petrel_net::{Net, Node, Point};
use rustc_hash::FxHashMap;

pub const DUMMY_PREFIX: &str = "_d";

#[derive(Debug, Clone, PartialEq)]
pub struct LayerEdge {
    pub from: String,
    pub to: String,
    pub weight: i64,
    pub anchors: Vec<Point>,
    /// Index of the net arc this edge (or chain segment) belongs to.
    pub origin: usize,
    /// Set while the edge is flipped by cycle removal.
    pub reversed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LayeredGraph {
    nodes: Vec<Node>,
    node_index: FxHashMap<String, usize>,
    edges: Vec<LayerEdge>,
    next_dummy: usize,
}

impl LayeredGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies nodes and arcs of `net`. Existing anchors are dropped; the pipeline rebuilds them.
    pub fn from_net(net: &Net) -> Self {
        let mut g = Self::new();
        for node in net.nodes() {
            g.insert_node(node.clone());
        }
        for (origin, arc) in net.arcs().iter().enumerate() {
            g.edges.push(LayerEdge {
                from: arc.from.clone(),
                to: arc.to.clone(),
                weight: arc.weight,
                anchors: Vec::new(),
                origin,
                reversed: false,
            });
        }
        g
    }

    fn insert_node(&mut self, node: Node) {
        if let Some(&ix) = self.node_index.get(&node.id) {
            self.nodes[ix] = node;
            return;
        }
        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    /// Adds or replaces a node.
    pub fn add_node(&mut self, node: Node) {
        self.insert_node(node);
    }

    /// Adds a directed edge, creating missing endpoints as places at the origin.
    pub fn add_edge(&mut self, from: &str, to: &str, weight: i64) -> usize {
        for id in [from, to] {
            if !self.has_node(id) {
                self.insert_node(Node::place(id, Point::default()));
            }
        }
        let origin = self.edges.len();
        self.edges.push(LayerEdge {
            from: from.to_string(),
            to: to.to_string(),
            weight,
            anchors: Vec::new(),
            origin,
            reversed: false,
        });
        origin
    }

    /// Creates a fresh dummy node and returns its id.
    pub fn add_dummy(&mut self) -> String {
        loop {
            let id = format!("{DUMMY_PREFIX}{}", self.next_dummy);
            self.next_dummy += 1;
            if !self.has_node(&id) {
                self.insert_node(Node::dummy(id.clone(), Point::default()));
                return id;
            }
        }
    }

    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let ix = self.node_index.remove(id)?;
        let node = self.nodes.remove(ix);
        for slot in self.node_index.values_mut() {
            if *slot > ix {
                *slot -= 1;
            }
        }
        Some(node)
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&ix| &self.nodes[ix])
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.node_index.get(id).map(|&ix| &mut self.nodes[ix])
    }

    pub fn node_ix(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_dummy(&self, id: &str) -> bool {
        self.node(id).is_some_and(Node::is_dummy)
    }

    pub fn dummy_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_dummy()).count()
    }

    pub fn edges(&self) -> &[LayerEdge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut [LayerEdge] {
        &mut self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn replace_edges(&mut self, edges: Vec<LayerEdge>) {
        self.edges = edges;
    }

    pub(crate) fn insert_edge(&mut self, at: usize, edge: LayerEdge) {
        let at = at.min(self.edges.len());
        self.edges.insert(at, edge);
    }

    pub(crate) fn remove_edge(&mut self, ix: usize) -> LayerEdge {
        self.edges.remove(ix)
    }

    pub fn out_edges(&self, id: &str) -> Vec<usize> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.from == id)
            .map(|(ix, _)| ix)
            .collect()
    }

    pub fn in_edges(&self, id: &str) -> Vec<usize> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.to == id)
            .map(|(ix, _)| ix)
            .collect()
    }

    /// Predecessor lists by node index, following current edge directions.
    pub fn predecessors(&self) -> Vec<Vec<usize>> {
        let mut preds = vec![Vec::new(); self.nodes.len()];
        for e in &self.edges {
            if let (Some(u), Some(v)) = (self.node_ix(&e.from), self.node_ix(&e.to)) {
                preds[v].push(u);
            }
        }
        preds
    }

    /// Neighbor lists by node index, ignoring direction. Parallel edges repeat the neighbor.
    pub fn neighbors(&self) -> Vec<Vec<usize>> {
        let mut adj = vec![Vec::new(); self.nodes.len()];
        for e in &self.edges {
            if let (Some(u), Some(v)) = (self.node_ix(&e.from), self.node_ix(&e.to)) {
                adj[u].push(v);
                adj[v].push(u);
            }
        }
        adj
    }
}
