//! # Google Drive Provider
//!
//! Stores a single JSON document in the user's Google Drive (API v3).
//!
//! ## Overview
//!
//! This module provides:
//! - Locating a file by exact name (`files.list` with a name query)
//! - Creating a JSON file with a `multipart/related` upload
//! - Overwriting file content with a media upload
//! - Downloading file content as text
//!
//! Every call takes the OAuth access token explicitly and issues exactly one
//! HTTP request. Token refresh, retries and conflict resolution belong to the
//! caller.

pub mod connector;
pub mod error;
pub mod multipart;
pub mod types;

pub use connector::{escape_query_literal, GoogleDriveJsonClient, SaveOutcome};
pub use error::{GoogleDriveError, Result};
pub use types::RemoteFileRef;
