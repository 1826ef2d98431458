#![forbid(unsafe_code)]

//! Editable place/transition net model shared by the petrel layout engines.
//!
//! A [`Net`] owns places, transitions and weighted arcs. Arcs carry an ordered list of
//! [`Anchor`]s (intermediate bend points); [`polyline`] turns an arc into the point list a
//! renderer draws, clipping both ends to the node outlines described by [`ShapeMetrics`].

pub mod error;
pub mod geom;
mod net;
pub mod shape;

pub use error::{Error, Result};
pub use geom::{Canvas, Point, Rect, points_attr};
pub use net::{Anchor, AnchorKind, Arc, Net, NetChange, polyline};
pub use shape::{Node, NodeKind, Shape, ShapeMetrics};
