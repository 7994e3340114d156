//! # Sync Configuration Module
//!
//! Holds the handful of settings the sync core needs: the OAuth client
//! registration, the Drive dataset file name and the provider endpoints.
//!
//! ## Overview
//!
//! `SyncConfig` is built with a builder (or from environment variables) and
//! validated fail-fast. Endpoints default to Google's production URLs; the
//! overrides exist so tests and staging hosts can point the clients at a local
//! server. Operations never read configuration implicitly: the config is only
//! used to construct clients, and every call still receives its credentials
//! as explicit arguments.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::SyncConfig;
//!
//! let config = SyncConfig::builder()
//!     .client_id("1234.apps.googleusercontent.com")
//!     .redirect_uri("http://localhost:5173/auth/callback")
//!     .file_name("lifecycle-data.json")
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(config.oauth.scope, "https://www.googleapis.com/auth/drive.file");
//! ```
//!
//! ## Environment
//!
//! [`SyncConfig::from_env`] reads:
//!
//! | Variable                           | Required | Default                      |
//! |------------------------------------|----------|------------------------------|
//! | `DRIVE_SYNC_CLIENT_ID`             | yes      |                              |
//! | `DRIVE_SYNC_REDIRECT_URI`          | yes      |                              |
//! | `DRIVE_SYNC_SCOPE`                 | no       | `drive.file` scope           |
//! | `DRIVE_SYNC_FILE_NAME`             | no       | `drive-sync.json`            |
//! | `DRIVE_SYNC_AUTH_ENDPOINT`         | no       | Google authorization URL     |
//! | `DRIVE_SYNC_TOKEN_ENDPOINT`        | no       | Google token URL             |
//! | `DRIVE_SYNC_FILES_ENDPOINT`        | no       | Drive v3 files URL           |
//! | `DRIVE_SYNC_UPLOAD_ENDPOINT`       | no       | Drive v3 upload URL          |
//! | `DRIVE_SYNC_REQUEST_TIMEOUT_SECS`  | no       | `30`                         |

use crate::error::{Error, Result};
use std::time::Duration;
use url::Url;

/// Google OAuth 2.0 authorization endpoint.
pub const GOOGLE_AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google OAuth 2.0 token endpoint.
pub const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Drive API v3 files collection.
pub const DRIVE_FILES_ENDPOINT: &str = "https://www.googleapis.com/drive/v3/files";

/// Drive API v3 media upload collection.
pub const DRIVE_UPLOAD_ENDPOINT: &str = "https://www.googleapis.com/upload/drive/v3/files";

/// Per-file access to files the app created or opened.
pub const DEFAULT_DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

/// Dataset file name used when none is configured.
pub const DEFAULT_FILE_NAME: &str = "drive-sync.json";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

fn builtin_url(raw: &'static str) -> Url {
    Url::parse(raw).expect("built-in endpoint URL is valid")
}

fn parse_endpoint(name: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| Error::Config(format!("Invalid {} URL '{}': {}", name, raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::Config(format!(
            "{} URL must use http or https, got '{}'",
            name, other
        ))),
    }
}

/// OAuth provider endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthEndpoints {
    pub authorization: Url,
    pub token: Url,
}

impl Default for OAuthEndpoints {
    fn default() -> Self {
        Self {
            authorization: builtin_url(GOOGLE_AUTHORIZATION_ENDPOINT),
            token: builtin_url(GOOGLE_TOKEN_ENDPOINT),
        }
    }
}

/// Drive API endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveEndpoints {
    /// Metadata and download collection (`.../drive/v3/files`)
    pub files: Url,
    /// Upload collection (`.../upload/drive/v3/files`)
    pub upload: Url,
}

impl Default for DriveEndpoints {
    fn default() -> Self {
        Self {
            files: builtin_url(DRIVE_FILES_ENDPOINT),
            upload: builtin_url(DRIVE_UPLOAD_ENDPOINT),
        }
    }
}

/// OAuth client registration.
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    /// Public client id issued by the provider console
    pub client_id: String,
    /// Redirect URI registered for the client
    pub redirect_uri: String,
    /// Space-separated scopes to request
    pub scope: String,
    pub endpoints: OAuthEndpoints,
}

/// Drive dataset settings.
#[derive(Debug, Clone)]
pub struct DriveSettings {
    /// Exact name of the single JSON document holding the dataset
    pub file_name: String,
    pub endpoints: DriveEndpoints,
}

/// Top-level configuration for the sync core.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub oauth: OAuthSettings,
    pub drive: DriveSettings,
    /// Transport-level timeout applied by the desktop HTTP client
    pub request_timeout: Duration,
}

impl SyncConfig {
    /// Creates a new builder for constructing a `SyncConfig`.
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::default()
    }

    /// Build a configuration from `DRIVE_SYNC_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a required variable is missing or a value
    /// fails validation.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup, so
    /// callers (and tests) can source values from anywhere.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(value) = lookup("DRIVE_SYNC_CLIENT_ID") {
            builder = builder.client_id(value);
        }
        if let Some(value) = lookup("DRIVE_SYNC_REDIRECT_URI") {
            builder = builder.redirect_uri(value);
        }
        if let Some(value) = lookup("DRIVE_SYNC_SCOPE") {
            builder = builder.scope(value);
        }
        if let Some(value) = lookup("DRIVE_SYNC_FILE_NAME") {
            builder = builder.file_name(value);
        }
        if let Some(value) = lookup("DRIVE_SYNC_AUTH_ENDPOINT") {
            builder = builder.authorization_endpoint(value);
        }
        if let Some(value) = lookup("DRIVE_SYNC_TOKEN_ENDPOINT") {
            builder = builder.token_endpoint(value);
        }
        if let Some(value) = lookup("DRIVE_SYNC_FILES_ENDPOINT") {
            builder = builder.files_endpoint(value);
        }
        if let Some(value) = lookup("DRIVE_SYNC_UPLOAD_ENDPOINT") {
            builder = builder.upload_endpoint(value);
        }
        if let Some(value) = lookup("DRIVE_SYNC_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = value.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "DRIVE_SYNC_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    value
                ))
            })?;
            builder = builder.request_timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.oauth.client_id.trim().is_empty() {
            return Err(Error::Config("OAuth client id cannot be empty".to_string()));
        }

        if self.oauth.redirect_uri.trim().is_empty() {
            return Err(Error::Config(
                "OAuth redirect URI cannot be empty".to_string(),
            ));
        }

        if self.oauth.scope.trim().is_empty() {
            return Err(Error::Config("OAuth scope cannot be empty".to_string()));
        }

        if self.drive.file_name.trim().is_empty() {
            return Err(Error::Config("Drive file name cannot be empty".to_string()));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        if self.request_timeout > Duration::from_secs(MAX_REQUEST_TIMEOUT_SECS) {
            return Err(Error::Config(format!(
                "Request timeout exceeds maximum of {} seconds",
                MAX_REQUEST_TIMEOUT_SECS
            )));
        }

        Ok(())
    }
}

/// Builder for constructing [`SyncConfig`] instances.
#[derive(Debug, Default)]
pub struct SyncConfigBuilder {
    client_id: Option<String>,
    redirect_uri: Option<String>,
    scope: Option<String>,
    file_name: Option<String>,
    authorization_endpoint: Option<String>,
    token_endpoint: Option<String>,
    files_endpoint: Option<String>,
    upload_endpoint: Option<String>,
    request_timeout: Option<Duration>,
}

impl SyncConfigBuilder {
    /// Sets the OAuth client id (required).
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the OAuth redirect URI (required).
    pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Sets the space-separated scope string.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Sets the dataset file name.
    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn authorization_endpoint(mut self, url: impl Into<String>) -> Self {
        self.authorization_endpoint = Some(url.into());
        self
    }

    pub fn token_endpoint(mut self, url: impl Into<String>) -> Self {
        self.token_endpoint = Some(url.into());
        self
    }

    pub fn files_endpoint(mut self, url: impl Into<String>) -> Self {
        self.files_endpoint = Some(url.into());
        self
    }

    pub fn upload_endpoint(mut self, url: impl Into<String>) -> Self {
        self.upload_endpoint = Some(url.into());
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the client id or redirect URI is missing,
    /// an endpoint override is not an http(s) URL, or validation fails.
    pub fn build(self) -> Result<SyncConfig> {
        let client_id = self.client_id.ok_or_else(|| {
            Error::Config("OAuth client id is required. Use .client_id() to set it.".to_string())
        })?;

        let redirect_uri = self.redirect_uri.ok_or_else(|| {
            Error::Config(
                "OAuth redirect URI is required. Use .redirect_uri() to set it.".to_string(),
            )
        })?;

        let mut oauth_endpoints = OAuthEndpoints::default();
        if let Some(raw) = self.authorization_endpoint {
            oauth_endpoints.authorization = parse_endpoint("authorization endpoint", &raw)?;
        }
        if let Some(raw) = self.token_endpoint {
            oauth_endpoints.token = parse_endpoint("token endpoint", &raw)?;
        }

        let mut drive_endpoints = DriveEndpoints::default();
        if let Some(raw) = self.files_endpoint {
            drive_endpoints.files = parse_endpoint("files endpoint", &raw)?;
        }
        if let Some(raw) = self.upload_endpoint {
            drive_endpoints.upload = parse_endpoint("upload endpoint", &raw)?;
        }

        let config = SyncConfig {
            oauth: OAuthSettings {
                client_id,
                redirect_uri,
                scope: self
                    .scope
                    .unwrap_or_else(|| DEFAULT_DRIVE_SCOPE.to_string()),
                endpoints: oauth_endpoints,
            },
            drive: DriveSettings {
                file_name: self
                    .file_name
                    .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
                endpoints: drive_endpoints,
            },
            request_timeout: self
                .request_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
        };

        config.validate()?;

        Ok(config)
    }
}
