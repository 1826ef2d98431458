#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Net(#[from] petrel_net::Error),
    #[error(transparent)]
    Layered(#[from] petrel_layered::Error),
    #[error(transparent)]
    Force(#[from] petrel_force::Error),
    #[error("invalid layout configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
