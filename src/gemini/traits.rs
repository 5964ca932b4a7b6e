use crate::{
    error::Result,
    models::{GeneratedImage, ImageGenerationRequest},
};
use async_trait::async_trait;

/// Best-effort spelling and grammar correction.
#[async_trait]
pub trait TextCorrector: Send + Sync {
    /// Returns the corrected text. Errors are absorbed by the caller.
    async fn correct(&self, text: &str) -> Result<String>;
}

/// Produces one image per request.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// `Ok(None)` when the model answered without any image part.
    async fn generate(&self, request: &ImageGenerationRequest) -> Result<Option<GeneratedImage>>;
}

#[async_trait]
impl<T: TextCorrector + ?Sized> TextCorrector for std::sync::Arc<T> {
    async fn correct(&self, text: &str) -> Result<String> {
        (**self).correct(text).await
    }
}

#[async_trait]
impl<T: ImageGenerator + ?Sized> ImageGenerator for std::sync::Arc<T> {
    async fn generate(&self, request: &ImageGenerationRequest) -> Result<Option<GeneratedImage>> {
        (**self).generate(request).await
    }
}
