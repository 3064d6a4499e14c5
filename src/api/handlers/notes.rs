/*
 * Responsibility
 * - GET /notes (認証なし、読み取りのみ)
 * - POST /notes (保護ルート)
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    api::{
        dto::notes::{CreateNoteRequest, NoteResponse, NotesResponse},
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    repos::note_repo,
    state::AppState,
};

pub async fn list_notes(State(state): State<AppState>) -> Result<Json<NotesResponse>, AppError> {
    let rows = note_repo::list(&state.db).await?;

    Ok(Json(NotesResponse {
        notes: rows.into_iter().map(NoteResponse::from).collect(),
    }))
}

pub async fn create_note(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    req: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<NoteResponse>), AppError> {
    let Json(req) = req.map_err(|e| AppError::BadRequest(e.body_text()))?;
    req.validate().map_err(AppError::bad_request)?;

    let row = note_repo::create(&state.db, req.title.trim()).await?;
    tracing::info!(note_id = row.id, user_id = %ctx.user_id, "note created");

    Ok((StatusCode::CREATED, Json(NoteResponse::from(row))))
}
