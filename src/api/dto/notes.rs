/*
 * Responsibility
 * - Notes の request/response DTO
 * - 一覧のキーはフロントエンドが期待する ID / CreatedAt / Title
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::note_repo::NoteRow;

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "Title")]
    pub title: String,
}

impl From<NoteRow> for NoteResponse {
    fn from(row: NoteRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            title: row.title,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotesResponse {
    pub notes: Vec<NoteResponse>,
}

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
}

impl CreateNoteRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        if self.title.chars().count() > 1024 {
            return Err("title must be <= 1024 chars");
        }

        Ok(())
    }
}
