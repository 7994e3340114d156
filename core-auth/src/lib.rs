//! # Authentication Module
//!
//! OAuth 2.0 Authorization Code Flow with PKCE for a public client.
//!
//! ## Overview
//!
//! This crate turns a user's consent into usable tokens and keeps them fresh.
//! It is stateless: callers hold the verifier between the redirect and the
//! exchange, persist the [`TokenSet`], and decide when to refresh.
//!
//! ## Features
//!
//! - PKCE verifier/challenge generation (S256) over injected crypto capabilities
//! - Consent URL construction that requests offline access
//! - Authorization code exchange and refresh token grants
//! - Uniform, normalized error messages for token endpoint failures

pub mod error;
pub mod oauth;
pub mod pkce;
pub mod types;

pub use error::{AuthError, Result};
pub use oauth::OAuthClient;
pub use pkce::{base64_url_encode, PkceGenerator, CODE_VERIFIER_LENGTH};
pub use types::{AuthRequestParams, PkcePair, TokenRequestParams, TokenSet};
