//! Vertex ordering / crossing minimization.
//!
//! Alternating median sweeps followed by adjacent-pair transposition. The best ordering seen is
//! kept; the sweep itself always continues from the latest ordering.

mod cross_count;
mod median;

pub use median::median_value;

use crate::graph::LayeredGraph;
use crate::options::LayeredOptions;
use crate::rank::Layering;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReport {
    pub initial_crossings: u64,
    pub best_crossings: u64,
    pub iterations: usize,
    /// Best crossing count after each iteration.
    pub history: Vec<u64>,
    /// Some transposition step ran out of passes before it settled.
    pub transpose_capped: bool,
}

/// Index-based view of a layering used while sorting.
pub(crate) struct LayerOrder {
    pub(crate) layers: Vec<Vec<usize>>,
    neighbors: Vec<Vec<usize>>,
    layer_of: Vec<usize>,
    pos: Vec<usize>,
}

impl LayerOrder {
    fn new(g: &LayeredGraph, layering: &Layering) -> Self {
        let n = g.node_count();
        let mut layer_of = vec![usize::MAX; n];
        let mut pos = vec![0; n];
        let layers: Vec<Vec<usize>> = layering
            .iter()
            .enumerate()
            .map(|(rank, layer)| {
                layer
                    .iter()
                    .filter_map(|id| g.node_ix(id))
                    .enumerate()
                    .map(|(i, v)| {
                        layer_of[v] = rank;
                        pos[v] = i;
                        v
                    })
                    .collect()
            })
            .collect();
        Self {
            layers,
            neighbors: g.neighbors(),
            layer_of,
            pos,
        }
    }

    fn refresh(&mut self, layer: usize) {
        for (i, &v) in self.layers[layer].iter().enumerate() {
            self.pos[v] = i;
        }
    }

    /// Positions of `v`'s neighbors that live in `layer`.
    pub(crate) fn neighbor_positions(&self, v: usize, layer: usize) -> Vec<usize> {
        self.neighbors[v]
            .iter()
            .filter(|&&w| self.layer_of[w] == layer)
            .map(|&w| self.pos[w])
            .collect()
    }

    fn sort_by_median(&mut self, layer: usize, fixed: usize) {
        let mut keyed: Vec<(f64, usize)> = self.layers[layer]
            .iter()
            .map(|&v| (median_value(&mut self.neighbor_positions(v, fixed)), v))
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.layers[layer] = keyed.into_iter().map(|(_, v)| v).collect();
        self.refresh(layer);
    }

    fn sweep(&mut self, downward: bool) {
        let count = self.layers.len();
        if downward {
            for i in 1..count {
                self.sort_by_median(i, i - 1);
            }
        } else {
            for i in (0..count.saturating_sub(1)).rev() {
                self.sort_by_median(i, i + 1);
            }
        }
    }

    /// Swaps adjacent pairs while that lowers their crossings with the following layer. Returns
    /// `false` if `max_passes` ran out before a pass without swaps.
    fn transpose(&mut self, max_passes: usize) -> bool {
        for _ in 0..max_passes {
            let mut improved = false;
            for i in 0..self.layers.len().saturating_sub(1) {
                for p in 0..self.layers[i].len().saturating_sub(1) {
                    let a = self.layers[i][p];
                    let b = self.layers[i][p + 1];
                    let kept = cross_count::pair_crossings(self, a, b, i + 1);
                    let swapped = cross_count::pair_crossings(self, b, a, i + 1);
                    if kept > swapped {
                        self.layers[i].swap(p, p + 1);
                        self.pos[a] = p + 1;
                        self.pos[b] = p;
                        improved = true;
                    }
                }
            }
            if !improved {
                return true;
            }
        }
        false
    }

    fn crossings(&self) -> u64 {
        cross_count::cross_count(self)
    }

    fn to_layering(&self, g: &LayeredGraph) -> Layering {
        self.layers
            .iter()
            .map(|layer| layer.iter().map(|&v| g.nodes()[v].id.clone()).collect())
            .collect()
    }
}

/// Reorders every layer in place to reduce edge crossings between adjacent layers.
///
/// `layering` must be proper: every edge of `g` joins adjacent layers (see
/// [`crate::normalize::run`]).
pub fn order(g: &LayeredGraph, layering: &mut Layering, options: &LayeredOptions) -> OrderReport {
    let mut o = LayerOrder::new(g, layering);
    let initial = o.crossings();
    let mut report = OrderReport {
        initial_crossings: initial,
        best_crossings: initial,
        ..Default::default()
    };
    if initial == 0 {
        tracing::debug!("ordering skipped, no crossings");
        return report;
    }

    let mut best = o.layers.clone();
    let mut without_improvement = 0usize;

    for iteration in 0..options.max_order_iterations {
        o.sweep(iteration % 2 == 0);
        if !o.transpose(options.max_transpose_passes) {
            report.transpose_capped = true;
        }

        let cc = o.crossings();
        if cc < report.best_crossings {
            report.best_crossings = cc;
            best = o.layers.clone();
            without_improvement = 0;
        } else {
            without_improvement += 1;
        }
        report.iterations = iteration + 1;
        report.history.push(report.best_crossings);

        if report.best_crossings == 0
            || without_improvement >= options.max_rounds_without_improvement
        {
            break;
        }
    }

    if report.transpose_capped {
        tracing::warn!(
            max_passes = options.max_transpose_passes,
            "transposition stopped at its pass limit"
        );
    }

    o.layers = best;
    *layering = o.to_layering(g);
    tracing::debug!(
        initial = report.initial_crossings,
        best = report.best_crossings,
        iterations = report.iterations,
        "ordered layers"
    );
    report
}

/// Crossings between adjacent layers of `layering`.
pub fn crossings(g: &LayeredGraph, layering: &Layering) -> u64 {
    LayerOrder::new(g, layering).crossings()
}

/// Crossings contributed by placing `a` directly left of `b` in `layer`, counted against
/// `layer + 1`.
pub fn pair_crossings(
    g: &LayeredGraph,
    layering: &Layering,
    layer: usize,
    a: &str,
    b: &str,
) -> u64 {
    let o = LayerOrder::new(g, layering);
    match (g.node_ix(a), g.node_ix(b)) {
        (Some(a), Some(b)) => cross_count::pair_crossings(&o, a, b, layer + 1),
        _ => 0,
    }
}
