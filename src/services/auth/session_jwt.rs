use std::collections::HashMap;

use async_trait::async_trait;
use axum::http::HeaderValue;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, jwk::JwkSet};
use tokio::sync::RwLock;
use url::Url;

use crate::config::ClerkConfig;
use crate::services::auth::provider::{IdentityProvider, SessionClaims, VerifyError};

/// Clerk session token (RS256 JWT) verifier.
///
/// Key source:
/// - `jwt_key_pem` set: networkless verification with that key.
/// - otherwise: JWKS from `{api_url}/v1/jwks`, authenticated with the secret key,
///   cached per `kid`. An unknown `kid` triggers a single refetch.
///
/// Key material is intentionally not printable via Debug.
pub struct ClerkSessionVerifier {
    http: reqwest::Client,
    jwks_url: Url,
    secret_key: String,
    static_key: Option<DecodingKey>,
    jwks: RwLock<HashMap<String, DecodingKey>>,
    validation: Validation,
    authorized_parties: Vec<String>,
}

impl std::fmt::Debug for ClerkSessionVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClerkSessionVerifier")
            .field("jwks_url", &self.jwks_url.as_str())
            .field("networkless", &self.static_key.is_some())
            .field("validation", &self.validation)
            .field("authorized_parties", &self.authorized_parties)
            .finish()
    }
}

impl ClerkSessionVerifier {
    pub fn new(config: &ClerkConfig) -> Result<Self, String> {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: &ClerkConfig, http: reqwest::Client) -> Result<Self, String> {
        let static_key = match &config.jwt_key_pem {
            Some(pem) => Some(
                DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| format!("invalid CLERK_JWT_KEY pem: {}", e))?,
            ),
            None => None,
        };

        let jwks_url = config
            .api_url
            .join("v1/jwks")
            .map_err(|e| format!("invalid clerk api url: {}", e))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = config.leeway_seconds;
        validation.validate_nbf = true;
        // Clerk session tokens carry no `aud`; `azp` is checked separately.
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            http,
            jwks_url,
            secret_key: config.secret_key.clone(),
            static_key,
            jwks: RwLock::new(HashMap::new()),
            validation,
            authorized_parties: config.authorized_parties.clone(),
        })
    }

    pub fn jwks_url(&self) -> &Url {
        &self.jwks_url
    }

    pub fn is_networkless(&self) -> bool {
        self.static_key.is_some()
    }

    async fn decoding_key(&self, kid: Option<&str>) -> Result<DecodingKey, VerifyError> {
        if let Some(key) = &self.static_key {
            return Ok(key.clone());
        }

        let kid = kid.ok_or_else(|| VerifyError::Rejected("token header has no kid".into()))?;

        if let Some(key) = self.jwks.read().await.get(kid) {
            return Ok(key.clone());
        }

        let fetched = self.fetch_jwks().await?;
        let mut cache = self.jwks.write().await;
        *cache = fetched;

        cache
            .get(kid)
            .cloned()
            .ok_or_else(|| VerifyError::Rejected(format!("unknown signing key '{}'", kid)))
    }

    async fn fetch_jwks(&self) -> Result<HashMap<String, DecodingKey>, VerifyError> {
        let response = self
            .http
            .get(self.jwks_url.clone())
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| VerifyError::Unavailable(format!("jwks request: {}", e)))?;

        if !response.status().is_success() {
            return Err(VerifyError::Unavailable(format!(
                "jwks endpoint returned {}",
                response.status()
            )));
        }

        let set: JwkSet = response
            .json()
            .await
            .map_err(|e| VerifyError::Unavailable(format!("jwks body: {}", e)))?;

        let mut keys = HashMap::with_capacity(set.keys.len());
        for jwk in &set.keys {
            let Some(kid) = jwk.common.key_id.clone() else {
                continue;
            };
            match DecodingKey::from_jwk(jwk) {
                Ok(key) => {
                    keys.insert(kid, key);
                }
                Err(err) => tracing::warn!(kid = %kid, error = %err, "skipping unusable jwk"),
            }
        }

        tracing::debug!(count = keys.len(), "jwks refreshed");
        Ok(keys)
    }
}

#[async_trait]
impl IdentityProvider for ClerkSessionVerifier {
    async fn verify_credential(
        &self,
        authorization: &HeaderValue,
    ) -> Result<SessionClaims, VerifyError> {
        let raw = authorization
            .to_str()
            .map_err(|_| VerifyError::Rejected("authorization header is not ascii".into()))?;

        let token = raw
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| VerifyError::Rejected("expected Bearer scheme".into()))?;

        let header = jsonwebtoken::decode_header(token)
            .map_err(|e| VerifyError::Rejected(format!("malformed token: {}", e)))?;
        if header.alg != Algorithm::RS256 {
            return Err(VerifyError::Rejected(format!(
                "unexpected algorithm {:?}",
                header.alg
            )));
        }

        let key = self.decoding_key(header.kid.as_deref()).await?;

        let claims = jsonwebtoken::decode::<SessionClaims>(token, &key, &self.validation)
            .map_err(|e| VerifyError::Rejected(e.to_string()))?
            .claims;

        if claims.sub.trim().is_empty() {
            return Err(VerifyError::Rejected("empty 'sub' claim".into()));
        }

        if !self.authorized_parties.is_empty() {
            let allowed = claims
                .azp
                .as_deref()
                .is_some_and(|azp| self.authorized_parties.iter().any(|p| p == azp));
            if !allowed {
                return Err(VerifyError::Rejected("unauthorized 'azp' claim".into()));
            }
        }

        Ok(claims)
    }
}
