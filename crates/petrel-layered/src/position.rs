//! Coordinate assignment: layers become columns, order within a layer becomes rows.

use crate::error::Result;
use crate::graph::LayeredGraph;
use crate::normalize;
use crate::options::LayeredOptions;
use crate::rank::Layering;
use petrel_net::{Canvas, Point};

/// Column width and row height for a layering on `canvas`.
pub fn spacing(layering: &Layering, options: &LayeredOptions, canvas: Canvas) -> (f64, f64) {
    let columns = layering.len().max(1) as f64;
    let rows = layering.iter().map(Vec::len).max().unwrap_or(0).max(1) as f64;
    let column = (canvas.width / columns)
        .min(options.max_column_width)
        .max(options.min_column_width);
    let row = (canvas.height / rows)
        .min(options.max_row_height)
        .max(options.min_row_height);
    (column, row)
}

/// Places every node (dummies included) on the grid, then folds the dummy chains back into
/// anchored edges. Anchors of every edge are reset first.
pub fn run(
    g: &mut LayeredGraph,
    layering: &mut Layering,
    options: &LayeredOptions,
    canvas: Canvas,
) -> Result<()> {
    for e in g.edges_mut() {
        e.anchors.clear();
    }
    if layering.is_empty() {
        return Ok(());
    }

    let (column, row) = spacing(layering, options, canvas);
    for (rank, layer) in layering.iter().enumerate() {
        let x = column * (rank + 1) as f64 - column / 2.0;
        let top = canvas.height / 2.0 - row * (layer.len() as f64 - 1.0) / 2.0;
        for (i, id) in layer.iter().enumerate() {
            if let Some(node) = g.node_mut(id) {
                node.position = Point::new(x, top + row * i as f64);
            }
        }
    }
    tracing::debug!(column, row, layers = layering.len(), "assigned coordinates");

    normalize::undo(g, layering)
}
