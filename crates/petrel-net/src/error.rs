#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("net has no node with id `{id}`")]
    UnknownNode { id: String },
    #[error("net already contains a node with id `{id}`")]
    DuplicateNode { id: String },
    #[error("dummy node `{id}` cannot be added to a net")]
    DummyNode { id: String },
    #[error("net already contains an arc from `{from}` to `{to}`")]
    DuplicateArc { from: String, to: String },
    #[error("arc from `{from}` to `{to}` must connect a place with a transition")]
    SameKindArc { from: String, to: String },
    #[error("net has no arc with index {index}")]
    UnknownArc { index: usize },
    #[error("anchor index {index} is out of range for arc {arc} ({len} anchors)")]
    AnchorOutOfRange { arc: usize, index: usize, len: usize },
    #[error("point ({x}, {y}) lies inside the shape of node `{node}`")]
    PointInsideShape { node: String, x: f64, y: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
