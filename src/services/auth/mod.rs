pub mod factory;
pub mod provider;
pub mod session_jwt;

pub use factory::build_identity_provider;
pub use provider::{IdentityProvider, SessionClaims, VerifyError};
pub use session_jwt::ClerkSessionVerifier;
