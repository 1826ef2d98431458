#![forbid(unsafe_code)]

//! Automatic layout for place/transition nets (headless).
//!
//! Two engines are available behind one [`Engine`]:
//! - [`Algorithm::Layered`]: a Sugiyama-style pipeline that arranges nodes in columns and routes
//!   long arcs through bend points,
//! - [`Algorithm::ForceDirected`]: a spring embedder that can be cancelled and animated.
//!
//! Either pass is followed by collision avoidance, which bends arcs around transitions they would
//! otherwise be drawn through. All APIs are runtime-agnostic: the async variants never require a
//! specific executor.

pub mod avoidance;
pub mod config;
pub mod error;

pub use avoidance::{AvoidanceOptions, AvoidanceReport};
pub use config::LayoutConfig;
pub use error::{Error, Result};
pub use petrel_force::{ForceLayout, ForceOutcome, SpringOptions, StopReason, TerminationHandle};
pub use petrel_layered::{LayeredOptions, LayeredPipeline, LayeredSummary};
pub use petrel_net::{
    Anchor, AnchorKind, Arc, Canvas, Net, NetChange, Node, NodeKind, Point, ShapeMetrics,
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Algorithm {
    Layered,
    ForceDirected,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutReport {
    pub algorithm: Algorithm,
    pub layered: Option<LayeredSummary>,
    pub force: Option<ForceOutcome>,
    pub avoidance: AvoidanceReport,
}

impl LayoutReport {
    fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            layered: None,
            force: None,
            avoidance: AvoidanceReport::default(),
        }
    }

    pub fn anchors_changed(&self) -> bool {
        self.avoidance.changed()
    }
}

#[derive(Debug, Default)]
pub struct Engine {
    config: LayoutConfig,
    force: ForceLayout,
}

impl Engine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            force: ForceLayout::new(config.force),
            config,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// An empty net using the configured shape metrics.
    pub fn new_net(&self) -> Net {
        Net::with_metrics(self.config.shapes)
    }

    /// Handle that stops a running force-directed layout after its current iteration.
    pub fn termination_handle(&self) -> TerminationHandle {
        self.force.termination_handle()
    }

    pub fn terminate(&self) {
        self.force.terminate();
    }

    /// Recomputes automatic anchors without moving any node.
    pub fn avoid_collisions(&self, net: &mut Net) -> AvoidanceReport {
        let report = avoidance::avoid_collisions(net, &self.config.avoidance);
        net.notify(NetChange::Layout);
        report
    }

    fn run_layered(&self, net: &mut Net, canvas: Canvas) -> Result<LayeredSummary> {
        let summary = petrel_layered::layout(net, &self.config.layered, canvas)?;
        Ok(summary)
    }

    fn settle(&self, net: &mut Net, mut report: LayoutReport) -> LayoutReport {
        if report
            .force
            .is_some_and(|outcome| outcome.stop == StopReason::AlreadyRunning)
        {
            return report;
        }
        report.avoidance = self.avoid_collisions(net);
        tracing::debug!(
            algorithm = ?report.algorithm,
            arcs_changed = report.avoidance.arcs_changed,
            unresolved = report.avoidance.unresolved,
            "layout finished"
        );
        report
    }

    /// Lays out `net` and resolves arc/transition collisions, without yielding.
    ///
    /// Subscribers receive one [`NetChange::Layout`] at the end. A force-directed request made
    /// while another one is running on this engine leaves `net` untouched and reports
    /// [`StopReason::AlreadyRunning`].
    pub fn layout_sync(
        &self,
        net: &mut Net,
        algorithm: Algorithm,
        canvas: Canvas,
    ) -> Result<LayoutReport> {
        let mut report = LayoutReport::new(algorithm);
        match algorithm {
            Algorithm::Layered => report.layered = Some(self.run_layered(net, canvas)?),
            Algorithm::ForceDirected => report.force = Some(self.force.run_sync(net)?),
        }
        Ok(self.settle(net, report))
    }

    /// Like [`Engine::layout_sync`], but a force-directed run yields after every iteration and
    /// announces its intermediate positions.
    ///
    /// The layered engine does not yield.
    pub async fn layout(
        &self,
        net: &mut Net,
        algorithm: Algorithm,
        canvas: Canvas,
    ) -> Result<LayoutReport> {
        let mut report = LayoutReport::new(algorithm);
        match algorithm {
            Algorithm::Layered => report.layered = Some(self.run_layered(net, canvas)?),
            Algorithm::ForceDirected => report.force = Some(self.force.run(net).await?),
        }
        Ok(self.settle(net, report))
    }
}
