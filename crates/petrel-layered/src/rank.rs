//! Longest-path layer assignment.

use crate::error::{Error, Result};
use crate::graph::LayeredGraph;

/// Node ids grouped by layer; index 0 holds the sources.
pub type Layering = Vec<Vec<String>>;

/// Assigns every node to a layer strictly after all of its predecessors.
///
/// The graph must be acyclic. A cycle never lets its members become eligible, which is reported
/// as [`Error::LayerOverflow`] once the layer count would exceed the node count.
pub fn longest_path(g: &LayeredGraph) -> Result<Layering> {
    let n = g.node_count();
    let preds = g.predecessors();
    let mut layer_of: Vec<Option<usize>> = vec![None; n];
    let mut layers: Vec<Vec<usize>> = Vec::new();
    let mut assigned = 0usize;

    while assigned < n {
        let current = layers.len();
        if current >= n {
            tracing::error!(layers = current + 1, nodes = n, "layer assignment overflowed");
            return Err(Error::LayerOverflow {
                layers: current + 1,
                nodes: n,
            });
        }

        // Eligibility is fixed for the whole layer: a node placed in `current` does not unlock
        // its successors until the next one.
        let mut eligible: Vec<usize> = (0..n)
            .filter(|&v| {
                layer_of[v].is_none()
                    && preds[v]
                        .iter()
                        .all(|&u| layer_of[u].is_some_and(|l| l < current))
            })
            .collect();

        let mut layer = Vec::with_capacity(eligible.len());
        while let Some(v) = eligible.pop() {
            layer_of[v] = Some(current);
            layer.push(v);
            assigned += 1;
        }
        layers.push(layer);
    }

    tracing::debug!(layers = layers.len(), nodes = n, "assigned layers");
    Ok(layers
        .into_iter()
        .map(|layer| {
            layer
                .into_iter()
                .map(|v| g.nodes()[v].id.clone())
                .collect()
        })
        .collect())
}

/// Layer index of every id in `layering`.
pub fn layer_index(layering: &[Vec<String>]) -> rustc_hash::FxHashMap<&str, usize> {
    let mut out = rustc_hash::FxHashMap::default();
    for (rank, layer) in layering.iter().enumerate() {
        for id in layer {
            out.insert(id.as_str(), rank);
        }
    }
    out
}
