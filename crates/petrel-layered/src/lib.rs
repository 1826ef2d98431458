#![forbid(unsafe_code)]

//! Layered (Sugiyama-style) layout for place/transition nets.
//!
//! The pipeline runs four phases on a private working copy of the net:
//!
//! 1. cycle removal ([`acyclic`]): DFS back-edges are flipped,
//! 2. layer assignment ([`rank`]): longest-path layering, after which the flips are undone,
//! 3. vertex ordering ([`normalize`], [`order`]): long edges become dummy chains, then median
//!    sweeps and transposition reduce crossings,
//! 4. coordinate assignment ([`position`]): layers become columns and dummy chains turn into
//!    arc anchors.
//!
//! [`layout`] runs everything at once; [`LayeredPipeline`] exposes each phase.

pub mod acyclic;
pub mod error;
pub mod graph;
pub mod normalize;
mod options;
pub mod order;
pub mod pipeline;
pub mod position;
pub mod rank;

pub use error::{Error, Result};
pub use graph::{LayerEdge, LayeredGraph};
pub use options::LayeredOptions;
pub use order::OrderReport;
pub use pipeline::{LayeredPipeline, LayeredSummary, Phase, layout};
pub use rank::Layering;
