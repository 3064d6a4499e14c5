//! Identity provider seam.
//!
//! The Auth Gate only ever talks to `IdentityProvider::verify_credential`.
//! How the provider checks the credential (PEM key, JWKS, remote call) stays
//! behind this trait.
use async_trait::async_trait;
use axum::http::HeaderValue;
use serde::Deserialize;
use thiserror::Error;

/// Claims of a verified session token.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject (user id at the identity provider).
    pub sub: String,
    pub exp: u64,

    #[serde(default)]
    pub sid: Option<String>,
    #[serde(default)]
    pub iss: Option<String>,
    #[serde(default)]
    pub azp: Option<String>,
    #[serde(default)]
    pub iat: Option<u64>,
    #[serde(default)]
    pub nbf: Option<u64>,

    // Custom session claim; absent means not banned.
    #[serde(default)]
    pub banned: bool,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    /// The credential itself is bad (scheme, signature, expiry, claims).
    #[error("credential rejected: {0}")]
    Rejected(String),

    /// The provider could not be consulted (JWKS fetch, transport, key material).
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a raw `Authorization` header value (`Bearer <token>`).
    async fn verify_credential(
        &self,
        authorization: &HeaderValue,
    ) -> Result<SessionClaims, VerifyError>;
}
