pub mod image_client;
pub mod text_client;
pub mod traits;
pub mod transport;

use crate::{
    config::GeminiConfig,
    error::Result,
    models::{ModelInfo, ModelRole},
};
use reqwest::Client;

pub use image_client::ImageClient;
pub use text_client::TextClient;
pub use traits::{ImageGenerator, TextCorrector};
pub use transport::Transport;

/// Both remote collaborators over one HTTP connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    text_client: TextClient,
    image_client: ImageClient,
}

impl GeminiClient {
    /// Fails with a configuration error when no API key is configured.
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config.require_api_key()?;
        let transport = Transport::new(Client::new(), &config.api_base, api_key);

        Ok(Self {
            text_client: TextClient::new(
                transport.clone(),
                &config.correction_model,
                &config.correction_language,
                config.correction_temperature,
            ),
            image_client: ImageClient::new(transport, &config.image_model),
        })
    }

    pub fn text(&self) -> &TextClient {
        &self.text_client
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn supported_models(config: &GeminiConfig) -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                id: config.image_model.clone(),
                name: "Gemini image".to_string(),
                provider: "Google".to_string(),
                role: ModelRole::Image,
                description: "Composites the subject, background and style reference into a thumbnail".to_string(),
            },
            ModelInfo {
                id: config.correction_model.clone(),
                name: "Gemini text".to_string(),
                provider: "Google".to_string(),
                role: ModelRole::Correction,
                description: format!(
                    "Minimal-edit spelling and grammar correction ({})",
                    config.correction_language
                ),
            },
        ]
    }
}
