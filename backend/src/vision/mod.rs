pub mod openai_service;

use async_trait::async_trait;

use crate::upload::ImageUpload;

pub use openai_service::OpenAiVision;

pub const DESCRIBE_PROMPT: &str =
    "Describe this image in detail, including objects, colors, mood, and any notable features.";

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Vision API returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Vision API returned no description")]
    EmptyResponse,
}

/// External image-understanding backend.
#[async_trait]
pub trait VisionService: Send + Sync {
    async fn describe(&self, image: &ImageUpload) -> Result<String, VisionError>;
}
