use thiserror::Error;

/// Authentication errors.
///
/// `Exchange` and `Refresh` carry the full normalized message produced from
/// the token endpoint's response (see `core_runtime::http_error`), so their
/// `Display` output is the message itself.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Token endpoint rejected an authorization code exchange
    #[error("{0}")]
    Exchange(String),

    /// Token endpoint rejected a refresh token grant
    #[error("{0}")]
    Refresh(String),

    /// The request never completed (DNS, connect, TLS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx response whose body is not a token payload
    #[error("Invalid token response: {0}")]
    InvalidResponse(String),

    /// The platform random source could not provide entropy
    #[error("Secure random source unavailable: {0}")]
    RandomUnavailable(String),

    #[error("Failed to encode token request: {0}")]
    Encoding(String),
}

pub type Result<T> = std::result::Result<T, AuthError>;
