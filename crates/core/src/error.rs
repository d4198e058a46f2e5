//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid checksum: {0}")]
    InvalidChecksum(String),

    #[error("invalid file kind: {0}")]
    InvalidFileKind(String),

    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("invalid data bag item: {0}")]
    InvalidItem(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
