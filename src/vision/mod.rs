mod gemini;

use async_trait::async_trait;
use bytes::Bytes;

pub use gemini::GeminiClient;

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("vision request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("vision API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("vision API returned no text")]
    EmptyResponse,
}

/// Sends one image plus an instruction prompt to a generative vision model and
/// returns the model's text reply.
#[async_trait]
pub trait VisionClient: Send + Sync {
    async fn describe_image(
        &self,
        image: Bytes,
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, VisionError>;
}

/// Canonical mime type for an accepted upload, or `None` if the model can't
/// take it.
pub fn normalize_image_mime(ct: &str) -> Option<&'static str> {
    let base = ct.split(';').next().unwrap_or_default().trim();
    match base.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some("image/jpeg"),
        "image/png" => Some("image/png"),
        "image/webp" => Some("image/webp"),
        "image/heic" => Some("image/heic"),
        _ => None,
    }
}
