use crate::{
    error::Result,
    gemini::{traits::ImageGenerator, transport::Transport},
    models::{
        gemini::{Content, GenerateContentRequest, GenerationConfig, ImageConfig, Part},
        GeneratedImage, ImageGenerationRequest,
    },
};
use async_trait::async_trait;

#[derive(Clone)]
pub struct ImageClient {
    transport: Transport,
    model: String,
}

impl ImageClient {
    pub fn new(transport: Transport, model: &str) -> Self {
        Self {
            transport,
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Image parts in request order, then the instruction text last.
    pub fn build_request(&self, request: &ImageGenerationRequest) -> GenerateContentRequest {
        let mut parts: Vec<Part> = request
            .images
            .iter()
            .map(|asset| Part::inline(&asset.media_type, &asset.encoded_data))
            .collect();
        parts.push(Part::text(&request.instruction));

        GenerateContentRequest {
            contents: vec![Content::user(parts)],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["IMAGE".to_string()]),
                image_config: Some(ImageConfig {
                    aspect_ratio: request.shape.aspect_ratio().to_string(),
                }),
                ..Default::default()
            }),
        }
    }
}

#[async_trait]
impl ImageGenerator for ImageClient {
    async fn generate(&self, request: &ImageGenerationRequest) -> Result<Option<GeneratedImage>> {
        log::info!(
            "Generating {} image with model: {}",
            request.shape,
            self.model
        );
        log::debug!(
            "Image request: {} image part(s), {} instruction chars",
            request.images.len(),
            request.instruction.len()
        );

        let response = self
            .transport
            .generate_content(&self.model, &self.build_request(request))
            .await?;

        Ok(response.first_inline_data().map(|inline| GeneratedImage {
            data: inline.data.clone(),
            media_type: inline.mime_type.clone(),
        }))
    }
}
