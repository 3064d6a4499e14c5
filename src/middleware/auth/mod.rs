/*
 * Responsibility
 * - 保護ルートの認証 (credential 抽出 → identity provider 検証 → AuthCtx 付与)
 */
pub mod access;
pub mod credential;
pub mod error;

pub use credential::{Credential, CredentialSource, extract_credential};
pub use error::AuthError;
