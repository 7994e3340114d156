//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the drive sync core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - The shared HTTP failure message policy
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the auth and provider crates
//! depend on. It establishes the logging conventions and the single error
//! surface every network operation reports through.

pub mod config;
pub mod error;
pub mod http_error;
pub mod logging;

pub use config::{
    DriveEndpoints, DriveSettings, OAuthEndpoints, OAuthSettings, SyncConfig, SyncConfigBuilder,
};
pub use error::{Error, Result};
pub use http_error::describe_failure;
