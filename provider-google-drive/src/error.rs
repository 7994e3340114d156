//! Error types for Google Drive provider

use thiserror::Error;

/// Google Drive provider errors
///
/// The per-operation variants carry the full normalized message (for example
/// `"Failed to find Drive file: File not found"`), so `Display` yields it
/// unchanged.
#[derive(Error, Debug)]
pub enum GoogleDriveError {
    /// files.list returned a non-2xx status
    #[error("{0}")]
    Lookup(String),

    /// Multipart upload returned a non-2xx status
    #[error("{0}")]
    Create(String),

    /// Media upload returned a non-2xx status
    #[error("{0}")]
    Update(String),

    /// Media download returned a non-2xx status
    #[error("{0}")]
    Download(String),

    /// The request never completed
    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx response whose body could not be decoded
    #[error("Failed to parse API response: {0}")]
    InvalidResponse(String),

    /// The configured endpoint cannot take a file id path segment
    #[error("Invalid Drive endpoint: {0}")]
    InvalidEndpoint(String),

    /// No secure randomness for the multipart boundary
    #[error("Secure random source unavailable: {0}")]
    RandomUnavailable(String),
}

/// Result type for Google Drive operations
pub type Result<T> = std::result::Result<T, GoogleDriveError>;
