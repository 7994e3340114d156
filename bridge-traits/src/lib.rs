//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the sync core and platform-specific
//! implementations. Each trait represents a capability the core requires but
//! that is provided differently per platform (desktop, mobile, web).
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - One-request/one-response async HTTP
//! - [`RandomSource`](crypto::RandomSource) - Cryptographically secure bytes
//! - [`Sha256Hasher`](crypto::Sha256Hasher) - SHA-256 digest
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Platform
//! implementations convert their native errors into it with an actionable
//! message.
//!
//! ## Thread Safety
//!
//! On native targets every bridge trait requires `Send + Sync` so a single
//! instance can be shared across async tasks behind an `Arc`.
//!
//! ## Implementing HttpClient
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         // Implementation
//!         todo!()
//!     }
//! }
//! ```

pub mod crypto;
pub mod error;
pub mod http;
pub mod logging;
pub mod platform;

pub use error::BridgeError;

// Re-export commonly used types
pub use crypto::{random_string, RandomSource, Sha256Hasher};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
