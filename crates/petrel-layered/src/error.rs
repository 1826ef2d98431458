use crate::pipeline::Phase;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("layer assignment needed {layers} layers for {nodes} nodes; the graph still has a cycle")]
    LayerOverflow { layers: usize, nodes: usize },
    #[error(
        "dummy node `{dummy}` has {incoming} incoming and {outgoing} outgoing edges, expected one of each"
    )]
    BrokenDummyChain {
        dummy: String,
        incoming: usize,
        outgoing: usize,
    },
    #[error("layout phase {actual:?} cannot run before {expected:?}")]
    PhaseOrder { expected: Phase, actual: Phase },
    #[error(transparent)]
    Net(#[from] petrel_net::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
