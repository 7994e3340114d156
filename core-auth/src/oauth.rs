//! OAuth 2.0 Authorization Code Flow with PKCE
//!
//! This module implements the client half of RFC 6749 (OAuth 2.0) and
//! RFC 7636 (PKCE) for a public client:
//! - Building the consent URL with an S256 challenge
//! - Exchanging an authorization code for tokens
//! - Refreshing an access token
//!
//! # Contract
//!
//! Every method is a single request/response call over the injected
//! [`HttpClient`]. There is no retry, no token storage and no state
//! verification: the caller owns the `state` value, persists the returned
//! [`TokenSet`] and decides when a refresh is due.
//!
//! # Security
//!
//! Token values, authorization codes and verifiers are never logged.
//!
//! # Example
//!
//! ```no_run
//! use core_auth::oauth::OAuthClient;
//! use core_auth::{AuthRequestParams, PkceGenerator, TokenRequestParams};
//! use std::sync::Arc;
//!
//! # async fn example(
//! #     http_client: Arc<dyn bridge_traits::http::HttpClient>,
//! #     pkce: PkceGenerator,
//! # ) -> core_auth::Result<()> {
//! let client = OAuthClient::new(http_client);
//! let pair = pkce.create_pair()?;
//!
//! let url = client.authorization_url(&AuthRequestParams {
//!     client_id: "client-id".to_string(),
//!     redirect_uri: "http://localhost:5173/callback".to_string(),
//!     scope: "https://www.googleapis.com/auth/drive.file".to_string(),
//!     state: pkce.create_state()?,
//!     code_challenge: pair.code_challenge.clone(),
//! });
//! // Send the user to `url`, receive `code` on the redirect...
//!
//! let tokens = client
//!     .exchange_code(&TokenRequestParams {
//!         client_id: "client-id".to_string(),
//!         code: "code-from-redirect".to_string(),
//!         code_verifier: pair.code_verifier,
//!         redirect_uri: "http://localhost:5173/callback".to_string(),
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::{AuthRequestParams, TokenRequestParams, TokenSet};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use core_runtime::config::{OAuthEndpoints, OAuthSettings};
use core_runtime::http_error::describe_failure;
use std::sync::Arc;
use tracing::{info, instrument, warn};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Which grant a token request carries; selects the failure message and the
/// error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grant {
    AuthorizationCode,
    RefreshToken,
}

impl Grant {
    fn failure_prefix(self) -> &'static str {
        match self {
            Grant::AuthorizationCode => "Failed to exchange authorization code",
            Grant::RefreshToken => "Failed to refresh access token",
        }
    }

    fn failure(self, message: String) -> AuthError {
        match self {
            Grant::AuthorizationCode => AuthError::Exchange(message),
            Grant::RefreshToken => AuthError::Refresh(message),
        }
    }
}

/// Stateless OAuth 2.0 client.
///
/// Holds only the endpoints and the transport; all credentials are passed
/// per call.
#[derive(Clone)]
pub struct OAuthClient {
    http_client: Arc<dyn HttpClient>,
    endpoints: OAuthEndpoints,
}

impl OAuthClient {
    /// Create a client against Google's OAuth endpoints.
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self::with_endpoints(http_client, OAuthEndpoints::default())
    }

    /// Create a client against explicit endpoints.
    pub fn with_endpoints(http_client: Arc<dyn HttpClient>, endpoints: OAuthEndpoints) -> Self {
        Self {
            http_client,
            endpoints,
        }
    }

    /// Create a client using the endpoints from `settings`.
    pub fn from_settings(http_client: Arc<dyn HttpClient>, settings: &OAuthSettings) -> Self {
        Self::with_endpoints(http_client, settings.endpoints.clone())
    }

    pub fn endpoints(&self) -> &OAuthEndpoints {
        &self.endpoints
    }

    /// Build the consent URL.
    ///
    /// Query parameters, in order: `client_id`, `redirect_uri`,
    /// `response_type=code`, `scope`, `code_challenge`,
    /// `code_challenge_method=S256`, `access_type=offline`, `prompt=consent`,
    /// `include_granted_scopes=true`, `state`.
    ///
    /// `access_type=offline` together with `prompt=consent` makes Google issue
    /// a refresh token even when the user has consented before. Inputs are
    /// URL-encoded but otherwise passed through unvalidated.
    pub fn authorization_url(&self, params: &AuthRequestParams) -> String {
        let mut url = self.endpoints.authorization.clone();

        url.query_pairs_mut()
            .append_pair("client_id", &params.client_id)
            .append_pair("redirect_uri", &params.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &params.scope)
            .append_pair("code_challenge", &params.code_challenge)
            .append_pair("code_challenge_method", "S256")
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent")
            .append_pair("include_granted_scopes", "true")
            .append_pair("state", &params.state);

        tracing::debug!("Built authorization URL");

        url.into()
    }

    /// Exchange an authorization code for tokens.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Exchange`] for a non-2xx response, with the normalized
    ///   message (`"Failed to exchange authorization code: ..."`)
    /// - [`AuthError::Network`] if the request could not complete
    /// - [`AuthError::InvalidResponse`] if a 2xx body is not a token payload
    #[instrument(skip(self, params), fields(client_id = %params.client_id))]
    pub async fn exchange_code(&self, params: &TokenRequestParams) -> Result<TokenSet> {
        let form = [
            ("client_id", params.client_id.as_str()),
            ("code", params.code.as_str()),
            ("code_verifier", params.code_verifier.as_str()),
            ("redirect_uri", params.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        tracing::debug!("Exchanging authorization code for tokens");

        let tokens = self.request_token(&form, Grant::AuthorizationCode).await?;

        info!(
            expires_in = tokens.expires_in,
            has_refresh_token = tokens.refresh_token.is_some(),
            "Exchanged authorization code for tokens"
        );

        Ok(tokens)
    }

    /// Trade a refresh token for a new access token.
    ///
    /// The returned [`TokenSet::refresh_token`] mirrors the response: when the
    /// server omits it, it is `None` and the caller keeps its existing value.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Refresh`] for a non-2xx response (`"Failed to refresh access token: ..."`)
    /// - [`AuthError::Network`] if the request could not complete
    /// - [`AuthError::InvalidResponse`] if a 2xx body is not a token payload
    #[instrument(skip(self, refresh_token), fields(client_id = %client_id))]
    pub async fn refresh_access_token(
        &self,
        client_id: &str,
        refresh_token: &str,
    ) -> Result<TokenSet> {
        let form = [
            ("client_id", client_id),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];

        tracing::debug!("Refreshing access token");

        let tokens = self.request_token(&form, Grant::RefreshToken).await?;

        info!(
            expires_in = tokens.expires_in,
            rotated_refresh_token = tokens.refresh_token.is_some(),
            "Refreshed access token"
        );

        Ok(tokens)
    }

    async fn request_token(&self, form: &[(&str, &str)], grant: Grant) -> Result<TokenSet> {
        let body = serde_urlencoded::to_string(form)
            .map_err(|e| AuthError::Encoding(e.to_string()))?;

        let request = HttpRequest::new(HttpMethod::Post, self.endpoints.token.as_str())
            .header("Content-Type", FORM_CONTENT_TYPE)
            .body(body);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !response.is_success() {
            let message = describe_failure(&response, grant.failure_prefix());
            warn!(status = response.status, error = %message, "Token request failed");
            return Err(grant.failure(message));
        }

        response
            .json::<TokenSet>()
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))
    }
}
