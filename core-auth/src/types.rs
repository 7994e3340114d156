use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// PKCE verifier/challenge pair.
///
/// `code_challenge` is always `BASE64URL(SHA256(code_verifier))` without
/// padding. The challenge goes into the authorization URL; the verifier stays
/// with the caller until the code exchange.
///
/// # Security
///
/// The `Debug` implementation redacts the verifier.
#[derive(Clone, PartialEq, Eq)]
pub struct PkcePair {
    pub code_verifier: String,
    pub code_challenge: String,
}

impl fmt::Debug for PkcePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PkcePair")
            .field("code_verifier", &"[REDACTED]")
            .field("code_challenge", &self.code_challenge)
            .finish()
    }
}

/// OAuth 2.0 token set as returned by the token endpoint.
///
/// Field names match the wire format, so the same struct deserializes token
/// responses and can be persisted by the caller as-is.
///
/// # Refresh tokens
///
/// Refresh responses usually omit `refresh_token`. That absence is a protocol
/// convention, not a revocation: the previously held refresh token stays
/// valid. The auth client reports exactly what the server sent; callers keep
/// their prior value, e.g. with [`TokenSet::merge_refresh_token`].
///
/// # Security
///
/// Tokens should be stored securely and never logged. The `Debug`
/// implementation redacts both tokens.
///
/// # Examples
///
/// ```
/// use core_auth::TokenSet;
///
/// let refreshed: TokenSet = serde_json::from_str(
///     r#"{"access_token":"new","expires_in":3599,"scope":"s","token_type":"Bearer"}"#,
/// ).unwrap();
///
/// let merged = refreshed.merge_refresh_token(Some("1//old-refresh"));
/// assert_eq!(merged.refresh_token.as_deref(), Some("1//old-refresh"));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    /// The access token used for API requests
    pub access_token: String,
    /// Lifetime of the access token in seconds, relative to issuance
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
    /// Space-separated scopes actually granted
    #[serde(default)]
    pub scope: String,
    /// Token type, normally `Bearer`
    #[serde(default)]
    pub token_type: String,
    /// Present on code exchange (with `access_type=offline`), usually absent on refresh
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

fn default_expires_in() -> u64 {
    3600 // Default to 1 hour if not specified
}

impl TokenSet {
    /// Fill in a missing `refresh_token` from the one the caller already holds.
    ///
    /// A refresh token present in `self` always wins.
    pub fn merge_refresh_token(mut self, previous: Option<&str>) -> Self {
        if self.refresh_token.is_none() {
            self.refresh_token = previous.map(str::to_string);
        }
        self
    }

    /// Absolute expiry given the instant the token was issued.
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> DateTime<Utc> {
        let secs = i64::try_from(self.expires_in).unwrap_or(i64::MAX);
        Duration::try_seconds(secs)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

// Custom Debug implementation to avoid logging tokens
impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field("token_type", &self.token_type)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Inputs for the consent URL.
///
/// `state` is an opaque anti-CSRF value generated by the caller; it is echoed
/// back on the redirect and checking it is the caller's job.
#[derive(Debug, Clone)]
pub struct AuthRequestParams {
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub state: String,
    pub code_challenge: String,
}

/// Inputs for the authorization-code exchange.
#[derive(Clone)]
pub struct TokenRequestParams {
    pub client_id: String,
    pub code: String,
    pub code_verifier: String,
    pub redirect_uri: String,
}

impl fmt::Debug for TokenRequestParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRequestParams")
            .field("client_id", &self.client_id)
            .field("code", &"[REDACTED]")
            .field("code_verifier", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}
