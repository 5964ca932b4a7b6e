use crate::{
    error::{Result, ThumbnailError},
    models::gemini::{GenerateContentRequest, GenerateContentResponse},
};
use reqwest::Client;

/// Shared HTTP plumbing for `models/{model}:generateContent`.
#[derive(Clone)]
pub struct Transport {
    client: Client,
    api_base: String,
    api_key: String,
}

impl Transport {
    pub fn new(client: Client, api_base: &str, api_key: &str) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.api_base, model)
    }

    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let endpoint = self.endpoint(model);

        let response = self
            .client
            .post(&endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ThumbnailError::Request(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::error!("Gemini returned {} for model {}", status, model);
            log::debug!("Gemini error body: {}", error_text);
            return Err(ThumbnailError::Response(format!(
                "Gemini returned {}: {}",
                status,
                error_text.trim()
            )));
        }

        response.json::<GenerateContentResponse>().await.map_err(|e| {
            ThumbnailError::Response(format!("Failed to parse Gemini response: {}", e))
        })
    }
}
