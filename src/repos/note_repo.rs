/*
 * Responsibility
 * - notes テーブル向け SQLx 操作
 * - soft delete (deleted_at) 済みの行は返さない
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, Clone, FromRow)]
pub struct NoteRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub title: String,
}

pub async fn list(db: &PgPool) -> Result<Vec<NoteRow>, RepoError> {
    let rows = sqlx::query_as::<_, NoteRow>(
        r#"
        SELECT id, created_at, updated_at, deleted_at, title
        FROM notes
        WHERE deleted_at IS NULL
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn create(db: &PgPool, title: &str) -> Result<NoteRow, RepoError> {
    let row = sqlx::query_as::<_, NoteRow>(
        r#"
        INSERT INTO notes (title)
        VALUES ($1)
        RETURNING id, created_at, updated_at, deleted_at, title
        "#,
    )
    .bind(title)
    .fetch_one(db)
    .await?;

    Ok(row)
}
