//! Break cycles by reversing the back-edges of a depth-first search.
//!
//! Reversal is recorded on each edge (`reversed`), so [`undo`] restores the original directions
//! without any side table.

use crate::graph::LayeredGraph;

/// Reverses every back-edge and returns how many edges were flipped.
pub fn run(g: &mut LayeredGraph) -> usize {
    let fas = dfs_fas(g);
    let count = fas.len();
    for ix in fas {
        let e = &mut g.edges_mut()[ix];
        std::mem::swap(&mut e.from, &mut e.to);
        e.reversed = true;
    }
    count
}

pub fn undo(g: &mut LayeredGraph) -> usize {
    let mut count = 0;
    for e in g.edges_mut().iter_mut().filter(|e| e.reversed) {
        std::mem::swap(&mut e.from, &mut e.to);
        e.anchors.reverse();
        e.reversed = false;
        count += 1;
    }
    count
}

/// Indices of edges currently flipped by [`run`].
pub fn reversed_edges(g: &LayeredGraph) -> Vec<usize> {
    g.edges()
        .iter()
        .enumerate()
        .filter(|(_, e)| e.reversed)
        .map(|(ix, _)| ix)
        .collect()
}

fn dfs_fas(g: &LayeredGraph) -> Vec<usize> {
    let n = g.node_count();
    let mut out: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut targets: Vec<usize> = Vec::with_capacity(g.edge_count());
    for (ix, e) in g.edges().iter().enumerate() {
        let (Some(u), Some(v)) = (g.node_ix(&e.from), g.node_ix(&e.to)) else {
            targets.push(usize::MAX);
            continue;
        };
        out[u].push(ix);
        targets.push(v);
    }

    let mut fas = Vec::new();
    let mut visited = vec![false; n];
    let mut on_stack = vec![false; n];
    // (node, next out-edge slot) for every node on the current path.
    let mut stack: Vec<(usize, usize)> = Vec::new();

    // Nodes in insertion order, out-edges in edge order.
    for root in 0..n {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        on_stack[root] = true;
        stack.push((root, 0));

        while let Some(top) = stack.last_mut() {
            let (v, next) = *top;
            let Some(&ix) = out[v].get(next) else {
                on_stack[v] = false;
                stack.pop();
                continue;
            };
            top.1 += 1;

            let w = targets[ix];
            if w == v {
                continue;
            }
            if on_stack[w] {
                fas.push(ix);
            } else if !visited[w] {
                visited[w] = true;
                on_stack[w] = true;
                stack.push((w, 0));
            }
        }
    }
    fas
}
