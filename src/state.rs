/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - db: PgPool, identity: IdentityProvider, transcription: TranscriptionGateway
 * - 起動時に一度だけ組み立てる。Clone 前提 (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::{auth::IdentityProvider, transcription::TranscriptionGateway};

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub transcription: TranscriptionGateway,
    identity: Arc<dyn IdentityProvider>,
    session_cookie_name: Arc<str>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db)
            .field("transcription", &self.transcription)
            .field("session_cookie_name", &self.session_cookie_name)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        db: sqlx::PgPool,
        identity: Arc<dyn IdentityProvider>,
        transcription: TranscriptionGateway,
        session_cookie_name: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            db,
            transcription,
            identity,
            session_cookie_name: session_cookie_name.into(),
        }
    }

    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    pub fn session_cookie_name(&self) -> &str {
        &self.session_cookie_name
    }
}
