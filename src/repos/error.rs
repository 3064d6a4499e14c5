/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("storage query failed: {0}")]
    Db(#[from] sqlx::Error),
}
