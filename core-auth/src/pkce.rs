//! PKCE (RFC 7636) verifier and challenge generation.
//!
//! The verifier is 64 characters drawn uniformly from the unreserved URL
//! alphabet `[A-Za-z0-9-._~]` (about 386 bits of entropy). The challenge is
//! the S256 transform: unpadded base64url of the verifier's SHA-256 digest.
//!
//! Randomness and hashing come from injected [`RandomSource`] and
//! [`Sha256Hasher`] capabilities, so the generator can be driven by
//! deterministic fakes in tests.

use crate::error::{AuthError, Result};
use crate::types::PkcePair;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use bridge_traits::crypto::{random_string, RandomSource, Sha256Hasher, UNRESERVED_CHARSET};
use std::sync::Arc;

/// Length of every generated code verifier.
pub const CODE_VERIFIER_LENGTH: usize = 64;

/// Length of generated anti-CSRF `state` values.
pub const STATE_LENGTH: usize = 32;

/// Unpadded base64url (`-` and `_` in place of `+` and `/`).
pub fn base64_url_encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generates PKCE pairs and opaque state values.
#[derive(Clone)]
pub struct PkceGenerator {
    random: Arc<dyn RandomSource>,
    hasher: Arc<dyn Sha256Hasher>,
}

impl PkceGenerator {
    pub fn new(random: Arc<dyn RandomSource>, hasher: Arc<dyn Sha256Hasher>) -> Self {
        Self { random, hasher }
    }

    /// Create a fresh verifier and its S256 challenge.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::RandomUnavailable`] if the platform cannot supply
    /// secure random bytes. This is not expected to be recoverable.
    pub fn create_pair(&self) -> Result<PkcePair> {
        let code_verifier =
            random_string(self.random.as_ref(), CODE_VERIFIER_LENGTH, UNRESERVED_CHARSET)
                .map_err(|e| AuthError::RandomUnavailable(e.to_string()))?;
        let code_challenge = self.challenge_for(&code_verifier);

        tracing::debug!("Generated PKCE pair");

        Ok(PkcePair {
            code_verifier,
            code_challenge,
        })
    }

    /// Compute the S256 challenge for `verifier`.
    pub fn challenge_for(&self, verifier: &str) -> String {
        base64_url_encode(&self.hasher.sha256(verifier.as_bytes()))
    }

    /// Create a random `state` value for the authorization request.
    pub fn create_state(&self) -> Result<String> {
        random_string(self.random.as_ref(), STATE_LENGTH, UNRESERVED_CHARSET)
            .map_err(|e| AuthError::RandomUnavailable(e.to_string()))
    }
}
