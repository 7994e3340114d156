//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (HTTP, randomness,
//! hashing) and a validated [`SyncConfig`] into the auth and Drive clients.
//! Desktop apps typically enable the `desktop-shims` feature (which depends on
//! `bridge-desktop`) and call [`SyncService::desktop`].
//!
//! The façade adds no state of its own: tokens, verifiers and the dataset
//! text are handed back to the host, which decides where to keep them.

pub mod error;

pub use error::{CoreError, Result};

pub use core_auth::{AuthError, OAuthClient, PkceGenerator, PkcePair, TokenSet};
pub use core_runtime::config::SyncConfig;
pub use core_runtime::logging::{init_logging, LoggingConfig};
pub use provider_google_drive::{
    GoogleDriveError, GoogleDriveJsonClient, RemoteFileRef, SaveOutcome,
};

use std::sync::Arc;

use bridge_traits::{
    crypto::{RandomSource, Sha256Hasher},
    http::HttpClient,
};
use core_auth::{AuthRequestParams, TokenRequestParams};
use tracing::{debug, info, instrument};

/// Aggregated handle to all bridge dependencies the core requires.
#[derive(Clone)]
pub struct CoreDependencies {
    pub http_client: Arc<dyn HttpClient>,
    pub random: Arc<dyn RandomSource>,
    pub hasher: Arc<dyn Sha256Hasher>,
}

impl CoreDependencies {
    /// Construct a dependency bundle from explicit bridge handles.
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        random: Arc<dyn RandomSource>,
        hasher: Arc<dyn Sha256Hasher>,
    ) -> Self {
        Self {
            http_client,
            random,
            hasher,
        }
    }

    /// Desktop bridges: reqwest transport with the configured timeout, OS
    /// randomness and `sha2` hashing.
    #[cfg(all(feature = "desktop-shims", not(target_arch = "wasm32")))]
    pub fn desktop(config: &SyncConfig) -> Result<Self> {
        let http = bridge_desktop::ReqwestHttpClient::with_timeout(config.request_timeout)
            .map_err(|err| CoreError::InitializationFailed(err.to_string()))?;

        Ok(Self::new(
            Arc::new(http),
            Arc::new(bridge_desktop::OsRandom),
            Arc::new(bridge_desktop::Sha2Hasher),
        ))
    }
}

/// Everything the host must keep between sending the user to the consent
/// page and handling the redirect.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    /// Consent page URL to open
    pub url: String,
    /// Value to compare against the `state` echoed on the redirect
    pub state: String,
    /// Verifier/challenge pair; the verifier is needed for the exchange
    pub pkce: PkcePair,
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct SyncService {
    config: Arc<SyncConfig>,
    oauth: OAuthClient,
    pkce: PkceGenerator,
    drive: GoogleDriveJsonClient,
}

impl SyncService {
    /// Create a new service from the provided configuration and dependencies.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if `config` fails validation.
    pub fn new(config: SyncConfig, deps: CoreDependencies) -> Result<Self> {
        config.validate()?;

        let oauth = OAuthClient::from_settings(Arc::clone(&deps.http_client), &config.oauth);
        let pkce = PkceGenerator::new(Arc::clone(&deps.random), Arc::clone(&deps.hasher));
        let drive = GoogleDriveJsonClient::from_settings(
            Arc::clone(&deps.http_client),
            Arc::clone(&deps.random),
            &config.drive,
        );

        debug!(file_name = %config.drive.file_name, "Sync service initialized");

        Ok(Self {
            config: Arc::new(config),
            oauth,
            pkce,
            drive,
        })
    }

    /// Create a service backed by the desktop bridges.
    #[cfg(all(feature = "desktop-shims", not(target_arch = "wasm32")))]
    pub fn desktop(config: SyncConfig) -> Result<Self> {
        let deps = CoreDependencies::desktop(&config)?;
        Self::new(config, deps)
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn oauth(&self) -> &OAuthClient {
        &self.oauth
    }

    pub fn pkce(&self) -> &PkceGenerator {
        &self.pkce
    }

    pub fn drive(&self) -> &GoogleDriveJsonClient {
        &self.drive
    }

    /// Generate a PKCE pair and state and build the consent URL for the
    /// configured client.
    pub fn begin_authorization(&self) -> Result<AuthorizationRequest> {
        let pkce = self.pkce.create_pair()?;
        let state = self.pkce.create_state()?;

        let url = self.oauth.authorization_url(&AuthRequestParams {
            client_id: self.config.oauth.client_id.clone(),
            redirect_uri: self.config.oauth.redirect_uri.clone(),
            scope: self.config.oauth.scope.clone(),
            state: state.clone(),
            code_challenge: pkce.code_challenge.clone(),
        });

        Ok(AuthorizationRequest { url, state, pkce })
    }

    /// Exchange the code from the redirect for tokens.
    ///
    /// Checking the returned `state` against
    /// [`AuthorizationRequest::state`] is the host's job and must happen
    /// before this call.
    #[instrument(skip(self, code, code_verifier))]
    pub async fn complete_authorization(&self, code: &str, code_verifier: &str) -> Result<TokenSet> {
        let tokens = self
            .oauth
            .exchange_code(&TokenRequestParams {
                client_id: self.config.oauth.client_id.clone(),
                code: code.to_string(),
                code_verifier: code_verifier.to_string(),
                redirect_uri: self.config.oauth.redirect_uri.clone(),
            })
            .await?;

        Ok(tokens)
    }

    /// Refresh the access token, keeping `refresh_token` when the server
    /// does not rotate it.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenSet> {
        let tokens = self
            .oauth
            .refresh_access_token(&self.config.oauth.client_id, refresh_token)
            .await?;

        Ok(tokens.merge_refresh_token(Some(refresh_token)))
    }

    /// Download the configured dataset file, or `None` if it does not exist.
    #[instrument(skip(self, access_token))]
    pub async fn load_dataset(&self, access_token: &str) -> Result<Option<String>> {
        let file_name = &self.config.drive.file_name;

        let Some(file) = self.drive.find_file_by_name(access_token, file_name).await? else {
            info!(%file_name, "No dataset file in Drive");
            return Ok(None);
        };

        let text = self.drive.download_json_text(access_token, &file.id).await?;
        Ok(Some(text))
    }

    /// Write `json_text` to the configured dataset file, creating it if
    /// needed. Not atomic; see [`GoogleDriveJsonClient::save_json_file`].
    #[instrument(skip(self, access_token, json_text))]
    pub async fn save_dataset(&self, access_token: &str, json_text: &str) -> Result<SaveOutcome> {
        let outcome = self
            .drive
            .save_json_file(access_token, &self.config.drive.file_name, json_text)
            .await?;

        Ok(outcome)
    }
}
