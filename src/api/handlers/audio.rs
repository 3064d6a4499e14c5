/*
 * Responsibility
 * - POST /audio/process-full-audio (保護ルート)
 * - multipart の `audio-file` をメモリに読み込み、Transcription Gateway に渡す
 */
use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
};

use crate::{
    api::{dto::audio::ProcessAudioResponse, extractors::AuthCtxExtractor},
    error::AppError,
    state::AppState,
};

/// Multipart field the frontend uploads the recording under.
pub const AUDIO_UPLOAD_FIELD: &str = "audio-file";

/// Uploaded audio for the lifetime of one request. Never written anywhere.
#[derive(Debug)]
pub struct AudioUpload {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

pub async fn process_full_audio(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ProcessAudioResponse>), AppError> {
    let mut multipart = multipart
        .map_err(|e| AppError::BadRequest(format!("Failed to get file: {}", e.body_text())))?;

    let upload = read_audio_upload(&mut multipart).await?;

    tracing::info!(
        user_id = %ctx.user_id,
        file_name = upload.file_name.as_deref().unwrap_or("-"),
        bytes = upload.bytes.len(),
        "audio upload received"
    );

    let data = state.transcription.process(upload.bytes).await?;

    Ok((StatusCode::CREATED, Json(ProcessAudioResponse::completed(data))))
}

async fn read_audio_upload(multipart: &mut Multipart) -> Result<AudioUpload, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| AppError::Upload {
        status: e.status(),
        message: format!("Failed to get file: {}", e.body_text()),
    })? {
        if field.name() != Some(AUDIO_UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| AppError::Upload {
            status: e.status(),
            message: format!("Failed to read file: {}", e.body_text()),
        })?;

        return Ok(AudioUpload { file_name, bytes });
    }

    Err(AppError::BadRequest(format!(
        "Failed to get file: no '{}' field in form",
        AUDIO_UPLOAD_FIELD
    )))
}
