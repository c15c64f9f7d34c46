use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiscoveryError>;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The only condition that aborts a scan outright: the project root
    /// does not exist or is not a directory.
    #[error("invalid project root: {0}")]
    InvalidRoot(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
