#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Net(#[from] petrel_net::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
