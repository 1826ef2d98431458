//! Run control for the spring embedder: re-entrancy guard, cooperative termination and
//! per-iteration yielding.

use crate::error::Result;
use crate::options::SpringOptions;
use crate::spring::SpringEmbedder;
use petrel_net::{Net, NetChange};
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StopReason {
    Converged,
    IterationCap,
    Terminated,
    /// Another run on the same controller was still in progress; nothing was touched.
    AlreadyRunning,
    /// No node has an arc.
    NothingToLayout,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceOutcome {
    pub iterations: usize,
    /// Largest displacement of the last iteration.
    pub max_displacement: f64,
    pub stop: StopReason,
}

impl ForceOutcome {
    fn stopped(stop: StopReason) -> Self {
        Self {
            iterations: 0,
            max_displacement: 0.0,
            stop,
        }
    }
}

/// Clonable handle that asks a running layout to stop after its current iteration.
#[derive(Debug, Clone)]
pub struct TerminationHandle {
    flag: Arc<AtomicBool>,
}

impl TerminationHandle {
    pub fn terminate(&self) {
        self.flag.store(true, Ordering::Release);
    }
}

struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the state shared between a spring-embedder run and the code that may cancel it.
///
/// At most one run is active per controller. A second call while one is in flight returns
/// [`StopReason::AlreadyRunning`] without touching its net. The termination flag is cleared
/// whenever a run starts, so a request only affects the run that is currently active.
#[derive(Debug, Default)]
pub struct ForceLayout {
    options: SpringOptions,
    running: AtomicBool,
    terminate: Arc<AtomicBool>,
}

impl ForceLayout {
    pub fn new(options: SpringOptions) -> Self {
        Self {
            options,
            running: AtomicBool::new(false),
            terminate: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn options(&self) -> &SpringOptions {
        &self.options
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn termination_handle(&self) -> TerminationHandle {
        TerminationHandle {
            flag: Arc::clone(&self.terminate),
        }
    }

    pub fn terminate(&self) {
        self.terminate.store(true, Ordering::Release);
    }

    fn start(
        &self,
        net: &mut Net,
    ) -> std::result::Result<(RunningGuard<'_>, SpringEmbedder), ForceOutcome> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("force layout already running");
            return Err(ForceOutcome::stopped(StopReason::AlreadyRunning));
        }
        let guard = RunningGuard(&self.running);
        self.terminate.store(false, Ordering::Release);

        net.clear_all_anchors();
        let mut embedder = SpringEmbedder::new(net, self.options);
        if embedder.is_empty() {
            return Err(ForceOutcome::stopped(StopReason::NothingToLayout));
        }
        let jitter = embedder.separate_coincident();
        if jitter.shifted > 0 {
            tracing::debug!(shifted = jitter.shifted, "separated coincident nodes");
        }
        Ok((guard, embedder))
    }

    fn should_stop(&self, iterations: usize, max_displacement: f64) -> Option<StopReason> {
        if self.terminate.load(Ordering::Acquire) {
            Some(StopReason::Terminated)
        } else if iterations > 0 && max_displacement < self.options.epsilon {
            Some(StopReason::Converged)
        } else if iterations >= self.options.max_iterations {
            Some(StopReason::IterationCap)
        } else {
            None
        }
    }

    fn finish(&self, outcome: ForceOutcome) -> ForceOutcome {
        match outcome.stop {
            StopReason::IterationCap => tracing::warn!(
                iterations = outcome.iterations,
                max_displacement = outcome.max_displacement,
                "force layout stopped at the iteration cap"
            ),
            _ => tracing::debug!(
                iterations = outcome.iterations,
                max_displacement = outcome.max_displacement,
                stop = ?outcome.stop,
                "force layout finished"
            ),
        }
        outcome
    }

    /// Runs the layout to completion without yielding.
    pub fn run_sync(&self, net: &mut Net) -> Result<ForceOutcome> {
        let (_guard, mut embedder) = match self.start(net) {
            Ok(session) => session,
            Err(outcome) => return Ok(outcome),
        };

        let mut iterations = 0;
        let mut max_displacement = 0.0;
        let stop = loop {
            if let Some(stop) = self.should_stop(iterations, max_displacement) {
                break stop;
            }
            max_displacement = embedder.step();
            iterations += 1;
        };

        embedder.write_back(net)?;
        Ok(self.finish(ForceOutcome {
            iterations,
            max_displacement,
            stop,
        }))
    }

    /// Runs the layout, yielding to the executor after every iteration.
    ///
    /// While yielding, intermediate positions are written to `net` and announced as
    /// [`NetChange::Layout`] so subscribers can animate the run. Dropping the future stops the
    /// run and releases the controller.
    pub async fn run(&self, net: &mut Net) -> Result<ForceOutcome> {
        let (_guard, mut embedder) = match self.start(net) {
            Ok(session) => session,
            Err(outcome) => return Ok(outcome),
        };

        let mut iterations = 0;
        let mut max_displacement = 0.0;
        let stop = loop {
            if let Some(stop) = self.should_stop(iterations, max_displacement) {
                break stop;
            }
            max_displacement = embedder.step();
            iterations += 1;
            if self.options.yield_each_iteration {
                embedder.write_back(net)?;
                net.notify(NetChange::Layout);
                yield_now().await;
            }
        };

        embedder.write_back(net)?;
        Ok(self.finish(ForceOutcome {
            iterations,
            max_displacement,
            stop,
        }))
    }
}

/// Returns `Pending` exactly once after waking itself, handing control back to whatever
/// executor polls it.
fn yield_now() -> YieldNow {
    YieldNow { yielded: false }
}

struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}
