//! Split long edges into chains of layer-adjacent edges through dummy nodes, and merge the chains
//! back into anchored edges once coordinates are known.

use crate::error::{Error, Result};
use crate::graph::{LayerEdge, LayeredGraph};
use crate::rank::{Layering, layer_index};

/// Replaces every edge spanning more than one layer with a dummy chain. Dummies are appended to
/// the layers they occupy. Returns the number of dummies created.
///
/// Edges may point upwards after cycle removal has been undone; their chains are built in edge
/// direction all the same.
pub fn run(g: &mut LayeredGraph, layering: &mut Layering) -> usize {
    let ranks: rustc_hash::FxHashMap<String, usize> = layer_index(layering)
        .into_iter()
        .map(|(id, rank)| (id.to_string(), rank))
        .collect();

    let edges: Vec<LayerEdge> = g.edges().to_vec();
    let mut out = Vec::with_capacity(edges.len());
    let mut dummies = 0usize;

    for edge in edges {
        let (Some(&from_rank), Some(&to_rank)) = (ranks.get(&edge.from), ranks.get(&edge.to))
        else {
            out.push(edge);
            continue;
        };
        if from_rank.abs_diff(to_rank) <= 1 {
            out.push(edge);
            continue;
        }

        let step: isize = if to_rank > from_rank { 1 } else { -1 };
        let mut rank = from_rank as isize + step;
        let mut prev = edge.from.clone();
        while rank != to_rank as isize {
            let dummy = g.add_dummy();
            layering[rank as usize].push(dummy.clone());
            out.push(segment(&edge, prev, dummy.clone()));
            prev = dummy;
            dummies += 1;
            rank += step;
        }
        out.push(segment(&edge, prev, edge.to.clone()));
    }

    g.replace_edges(out);
    if dummies > 0 {
        tracing::debug!(dummies, "normalized long edges");
    }
    dummies
}

fn segment(edge: &LayerEdge, from: String, to: String) -> LayerEdge {
    LayerEdge {
        from,
        to,
        weight: edge.weight,
        anchors: Vec::new(),
        origin: edge.origin,
        reversed: false,
    }
}

/// Merges every dummy, in layer order, into a single edge whose anchors are the dummy positions.
/// Dummies are removed from `layering` as well.
pub fn undo(g: &mut LayeredGraph, layering: &mut Layering) -> Result<()> {
    for layer in layering.iter() {
        for id in layer {
            if g.is_dummy(id) {
                recombine(g, id)?;
            }
        }
    }
    for layer in layering.iter_mut() {
        layer.retain(|id| g.has_node(id));
    }
    Ok(())
}

/// Collapses `dummy` together with its single incoming and outgoing edge into one edge placed
/// where the incoming edge was.
pub fn recombine(g: &mut LayeredGraph, dummy: &str) -> Result<()> {
    let incoming = g.in_edges(dummy);
    let outgoing = g.out_edges(dummy);
    let (&[in_ix], &[out_ix]) = (incoming.as_slice(), outgoing.as_slice()) else {
        tracing::error!(
            dummy,
            incoming = incoming.len(),
            outgoing = outgoing.len(),
            "dummy chain is broken"
        );
        return Err(Error::BrokenDummyChain {
            dummy: dummy.to_string(),
            incoming: incoming.len(),
            outgoing: outgoing.len(),
        });
    };

    let position = g.node(dummy).map(|n| n.position).unwrap_or_default();
    let (lo, hi) = (in_ix.min(out_ix), in_ix.max(out_ix));
    let hi_edge = g.remove_edge(hi);
    let lo_edge = g.remove_edge(lo);
    let (inc, out) = if in_ix == hi {
        (hi_edge, lo_edge)
    } else {
        (lo_edge, hi_edge)
    };

    let mut anchors = inc.anchors;
    anchors.push(position);
    anchors.extend(out.anchors);
    g.insert_edge(
        lo,
        LayerEdge {
            from: inc.from,
            to: out.to,
            weight: inc.weight,
            anchors,
            origin: inc.origin,
            reversed: false,
        },
    );
    g.remove_node(dummy);
    Ok(())
}
