use crate::{
    error::Result,
    gemini::{traits::TextCorrector, transport::Transport},
    models::gemini::{Content, GenerateContentRequest, GenerationConfig, Part},
};
use async_trait::async_trait;

const CORRECTION_PREFIXES: [&str; 3] = [
    "aqui está o texto corrigido:",
    "texto corrigido:",
    "corrected text:",
];

#[derive(Clone)]
pub struct TextClient {
    transport: Transport,
    model: String,
    language: String,
    temperature: f32,
}

impl TextClient {
    pub fn new(transport: Transport, model: &str, language: &str, temperature: f32) -> Self {
        Self {
            transport,
            model: model.to_string(),
            language: language.to_string(),
            temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_instruction(&self) -> String {
        format!(
            "You are an elite proofreader of {language}. Your only job is to fix spelling and grammar mistakes in the text you receive.\n\
             STRICT RULES:\n\
             1. CORRECT ONLY: change strictly what is needed to fix grammar and spelling.\n\
             2. ADD NOTHING: no extra words, sentences, explanations or commentary.\n\
             3. KEEP THE MEANING: the original meaning, intent, capitalization and style must be fully preserved.\n\
             4. CLEAN OUTPUT: reply with the corrected text only, without quotes, markdown or any label such as 'Corrected text:'.",
            language = self.language
        )
    }

    pub fn build_request(&self, text: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(text)])],
            system_instruction: Some(Content::system(self.system_instruction())),
            generation_config: Some(GenerationConfig {
                temperature: Some(self.temperature),
                ..Default::default()
            }),
        }
    }

    /// Same contract as the trait, with failures folded into the original text.
    pub async fn correct_or_original(&self, text: &str) -> String {
        match self.correct(text).await {
            Ok(corrected) => corrected,
            Err(e) => {
                log::warn!("Text correction failed, keeping original: {}", e);
                text.to_string()
            }
        }
    }
}

#[async_trait]
impl TextCorrector for TextClient {
    async fn correct(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        log::debug!("Correcting {} chars with {}", text.chars().count(), self.model);
        let response = self
            .transport
            .generate_content(&self.model, &self.build_request(text))
            .await?;

        Ok(clean_correction(&response.text(), text))
    }
}

/// Strips fences, quotes and label prefixes a model may wrap around its answer.
/// An empty result falls back to `original`.
pub fn clean_correction(raw: &str, original: &str) -> String {
    let mut cleaned = raw.trim();

    if let Some(rest) = cleaned.strip_prefix("```") {
        let rest = rest
            .strip_prefix("português")
            .or_else(|| rest.strip_prefix("pt"))
            .unwrap_or(rest);
        cleaned = rest.trim_start();
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest.trim_end();
    }

    cleaned = cleaned.strip_prefix('"').unwrap_or(cleaned);
    cleaned = cleaned.strip_suffix('"').unwrap_or(cleaned);

    let lowered = cleaned.to_lowercase();
    for prefix in CORRECTION_PREFIXES {
        if lowered.starts_with(prefix) {
            // Lowercasing can change byte lengths, so cut by characters.
            let skip = prefix.chars().count();
            cleaned = match cleaned.char_indices().nth(skip) {
                Some((idx, _)) => &cleaned[idx..],
                None => "",
            };
            break;
        }
    }

    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        original.to_string()
    } else {
        cleaned.to_string()
    }
}
