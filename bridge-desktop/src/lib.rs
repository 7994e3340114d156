//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest` with rustls
//! - `RandomSource` using the OS CSPRNG via `getrandom`
//! - `Sha256Hasher` using `sha2`
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{OsRandom, ReqwestHttpClient, Sha2Hasher};
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new()?);
//! let random = Arc::new(OsRandom);
//! let hasher = Arc::new(Sha2Hasher);
//! ```

mod crypto;
mod http;

pub use crypto::{OsRandom, Sha2Hasher};
pub use http::ReqwestHttpClient;
