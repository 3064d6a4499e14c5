pub mod auth;
pub mod transcription;
