#![forbid(unsafe_code)]

//! Force-directed layout for place/transition nets.
//!
//! [`SpringEmbedder`] implements the physics; [`ForceLayout`] drives it with a re-entrancy
//! guard, cooperative termination and an executor-agnostic yield between iterations.

mod controller;
pub mod error;
mod options;
mod rng;
pub mod spring;

pub use controller::{ForceLayout, ForceOutcome, StopReason, TerminationHandle};
pub use error::{Error, Result};
pub use options::SpringOptions;
pub use spring::{JitterReport, SpringEmbedder};
