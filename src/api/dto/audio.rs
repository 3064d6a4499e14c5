/*
 * Responsibility
 * - /audio 系の response DTO
 * - worker の結果 (TranscriptionResult) はそのまま data に入れる
 */
use serde::Serialize;

use crate::services::transcription::TranscriptionResult;

#[derive(Debug, Serialize)]
pub struct ProcessAudioResponse {
    pub status: &'static str,
    pub data: TranscriptionResult,
}

impl ProcessAudioResponse {
    pub fn completed(data: TranscriptionResult) -> Self {
        Self {
            status: "completed",
            data,
        }
    }
}
