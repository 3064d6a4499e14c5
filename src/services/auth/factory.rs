/// Factory: build the identity provider from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{ClerkSessionVerifier, IdentityProvider};

pub fn build_identity_provider(config: &Config) -> anyhow::Result<Arc<dyn IdentityProvider>> {
    let verifier = ClerkSessionVerifier::new(&config.clerk).map_err(anyhow::Error::msg)?;

    tracing::info!(
        jwks_url = %verifier.jwks_url(),
        networkless = verifier.is_networkless(),
        "identity provider configured"
    );

    Ok(Arc::new(verifier))
}
