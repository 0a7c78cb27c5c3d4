//! Error types for the captcha solver.
//!
//! Only the I/O collaborators (image sources, corpus store, config) fail.
//! The segmentation and matching pipeline itself never returns an error:
//! bad crops degrade to placeholders and unknown glyphs to unresolved marks.
use thiserror::Error;

/// Result type alias using `CaptchaError`.
pub type Result<T> = std::result::Result<T, CaptchaError>;

#[derive(Debug, Error)]
pub enum CaptchaError {
    /// A fetched captcha declared a content type outside the supported set.
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Training corpus error: {0}")]
    Corpus(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CaptchaError {
    pub fn corpus<S: Into<String>>(message: S) -> Self {
        Self::Corpus(message.into())
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }
}
