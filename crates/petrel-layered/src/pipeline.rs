//! Phase-by-phase driver for the layered layout.
//!
//! Each phase must run exactly once and in order; [`LayeredPipeline::phase`] names the next one.
//! Intermediate state (working graph, layering, ordering report) stays inspectable between
//! phases, and nothing reaches the [`Net`] until [`LayeredPipeline::commit`].

use crate::error::{Error, Result};
use crate::graph::LayeredGraph;
use crate::options::LayeredOptions;
use crate::order::{self, OrderReport};
use crate::rank::{self, Layering};
use crate::{acyclic, normalize, position};
use petrel_net::{Anchor, Canvas, Net};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    CycleRemoval,
    LayerAssignment,
    VertexOrdering,
    CoordinateAssignment,
    Finished,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayeredSummary {
    pub layers: usize,
    pub reversed_edges: usize,
    pub dummies: usize,
    pub crossings: u64,
}

#[derive(Debug, Clone)]
pub struct LayeredPipeline {
    graph: LayeredGraph,
    layering: Layering,
    options: LayeredOptions,
    phase: Phase,
    summary: LayeredSummary,
    order: Option<OrderReport>,
}

impl LayeredPipeline {
    pub fn new(net: &Net, options: LayeredOptions) -> Self {
        Self::from_graph(LayeredGraph::from_net(net), options)
    }

    pub fn from_graph(graph: LayeredGraph, options: LayeredOptions) -> Self {
        Self {
            graph,
            layering: Vec::new(),
            options,
            phase: Phase::CycleRemoval,
            summary: LayeredSummary::default(),
            order: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn graph(&self) -> &LayeredGraph {
        &self.graph
    }

    pub fn layering(&self) -> &Layering {
        &self.layering
    }

    pub fn order_report(&self) -> Option<&OrderReport> {
        self.order.as_ref()
    }

    pub fn summary(&self) -> &LayeredSummary {
        &self.summary
    }

    fn enter(&mut self, phase: Phase) -> Result<()> {
        if self.phase != phase {
            return Err(Error::PhaseOrder {
                expected: self.phase,
                actual: phase,
            });
        }
        Ok(())
    }

    /// Flips back-edges so the working graph is acyclic. Returns the number of flipped edges.
    pub fn remove_cycles(&mut self) -> Result<usize> {
        self.enter(Phase::CycleRemoval)?;
        let reversed = acyclic::run(&mut self.graph);
        if reversed > 0 {
            tracing::debug!(reversed, "reversed back-edges");
        }
        self.summary.reversed_edges = reversed;
        self.phase = Phase::LayerAssignment;
        Ok(reversed)
    }

    /// Computes the longest-path layering, then restores the edges flipped by
    /// [`Self::remove_cycles`].
    pub fn assign_layers(&mut self) -> Result<&Layering> {
        self.enter(Phase::LayerAssignment)?;
        self.layering = rank::longest_path(&self.graph)?;
        acyclic::undo(&mut self.graph);
        self.summary.layers = self.layering.len();
        self.phase = Phase::VertexOrdering;
        Ok(&self.layering)
    }

    /// Inserts dummy chains for long edges and reorders the layers.
    pub fn order_vertices(&mut self) -> Result<&OrderReport> {
        self.enter(Phase::VertexOrdering)?;
        self.summary.dummies = normalize::run(&mut self.graph, &mut self.layering);
        let report = order::order(&self.graph, &mut self.layering, &self.options);
        self.summary.crossings = report.best_crossings;
        self.phase = Phase::CoordinateAssignment;
        Ok(self.order.insert(report))
    }

    /// Lays the layers out as columns on `canvas` and merges dummy chains into anchors.
    pub fn assign_coordinates(&mut self, canvas: Canvas) -> Result<()> {
        self.enter(Phase::CoordinateAssignment)?;
        position::run(&mut self.graph, &mut self.layering, &self.options, canvas)?;
        self.phase = Phase::Finished;
        Ok(())
    }

    /// Writes node positions and arc anchors back into `net`. Anchors become manual, so later
    /// collision avoidance keeps them.
    pub fn commit(&self, net: &mut Net) -> Result<LayeredSummary> {
        self.enter_finished()?;
        for node in self.graph.nodes().iter().filter(|n| !n.is_dummy()) {
            net.set_position(&node.id, node.position)?;
        }
        for edge in self.graph.edges() {
            let arc = net
                .arc_mut(edge.origin)
                .ok_or(petrel_net::Error::UnknownArc { index: edge.origin })?;
            arc.anchors = edge.anchors.iter().copied().map(Anchor::manual).collect();
        }
        Ok(self.summary.clone())
    }

    fn enter_finished(&self) -> Result<()> {
        if self.phase != Phase::Finished {
            return Err(Error::PhaseOrder {
                expected: self.phase,
                actual: Phase::Finished,
            });
        }
        Ok(())
    }

    /// Runs every remaining phase.
    pub fn finish(&mut self, canvas: Canvas) -> Result<()> {
        if self.phase == Phase::CycleRemoval {
            self.remove_cycles()?;
        }
        if self.phase == Phase::LayerAssignment {
            self.assign_layers()?;
        }
        if self.phase == Phase::VertexOrdering {
            self.order_vertices()?;
        }
        if self.phase == Phase::CoordinateAssignment {
            self.assign_coordinates(canvas)?;
        }
        Ok(())
    }
}

/// Runs the whole layered layout on `net` and commits the result.
pub fn layout(net: &mut Net, options: &LayeredOptions, canvas: Canvas) -> Result<LayeredSummary> {
    let started = std::time::Instant::now();
    let mut pipeline = LayeredPipeline::new(net, *options);
    pipeline.finish(canvas)?;
    let summary = pipeline.commit(net)?;
    tracing::debug!(
        layers = summary.layers,
        dummies = summary.dummies,
        crossings = summary.crossings,
        elapsed_us = started.elapsed().as_micros() as u64,
        "layered layout finished"
    );
    Ok(summary)
}
