/*
 * Responsibility
 * - アップロードされた音声バイト列を multipart に詰め直し、transcription worker に転送する
 * - worker の応答を TranscriptionResult として返す (retry なし・streaming なし)
 */
use axum::body::Bytes;
use reqwest::{StatusCode, multipart};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Multipart field and file name the worker expects.
pub const AUDIO_FIELD: &str = "audio_file";
pub const AUDIO_FILE_NAME: &str = "audio.wav";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub transcription: String,
    pub request_duration: f64,
}

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("{0} is not set")]
    ConfigurationMissing(&'static str),

    #[error("bad status: {status}, body: {body}")]
    DownstreamBadStatus { status: StatusCode, body: String },

    #[error("failed to decode worker response: {0}")]
    DownstreamDecodeFailure(#[from] serde_json::Error),

    #[error("worker request failed: {0}")]
    TransportFailure(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct TranscriptionGateway {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl TranscriptionGateway {
    pub fn new(base_url: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// Forward `audio` to `{base}/process-audio` as a single multipart part.
    pub async fn process(&self, audio: Bytes) -> Result<TranscriptionResult, TranscriptionError> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or(TranscriptionError::ConfigurationMissing(
                "INTERNAL_LOCAL_DOCKER_URL_BASE_PATH",
            ))?;
        let endpoint = format!("{}/process-audio", base_url);

        let size = audio.len();
        let part = multipart::Part::bytes(audio.to_vec())
            .file_name(AUDIO_FILE_NAME)
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new().part(AUDIO_FIELD, part);

        tracing::debug!(endpoint = %endpoint, bytes = size, "sending audio to transcription worker");

        let response = self.client.post(&endpoint).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            // Kept verbatim for operators; not parsed.
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    tracing::warn!(status = %status, error = %err, "failed to read worker error body");
                    String::new()
                }
            };
            tracing::warn!(status = %status, body = %body, "transcription worker returned an error");
            return Err(TranscriptionError::DownstreamBadStatus { status, body });
        }

        let body = response.bytes().await?;
        let result: TranscriptionResult = serde_json::from_slice(&body)?;

        tracing::info!(
            chars = result.transcription.len(),
            request_duration = result.request_duration,
            "transcription completed"
        );

        Ok(result)
    }
}
