use std::env;
use std::path::PathBuf;

use crate::error::{Result, ThumbnailError};
use crate::models::OutputShape;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_CORRECTION_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_CORRECTION_LANGUAGE: &str = "Brazilian Portuguese";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub image_model: String,
    pub correction_model: String,
    pub correction_temperature: f32,
    pub correction_language: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            correction_model: DEFAULT_CORRECTION_MODEL.to_string(),
            correction_temperature: 0.1,
            correction_language: DEFAULT_CORRECTION_LANGUAGE.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_key = env_non_empty("GEMINI_API_KEY").or_else(|| env_non_empty("API_KEY"));

        GeminiConfig {
            api_key,
            api_base: env_non_empty("GEMINI_API_BASE").unwrap_or(defaults.api_base),
            image_model: env_non_empty("THUMBGEN_IMAGE_MODEL").unwrap_or(defaults.image_model),
            correction_model: env_non_empty("THUMBGEN_CORRECTION_MODEL")
                .unwrap_or(defaults.correction_model),
            correction_temperature: defaults.correction_temperature,
            correction_language: env_non_empty("THUMBGEN_CORRECTION_LANGUAGE")
                .unwrap_or(defaults.correction_language),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_models(
        mut self,
        image_model: impl Into<String>,
        correction_model: impl Into<String>,
    ) -> Self {
        self.image_model = image_model.into();
        self.correction_model = correction_model.into();
        self
    }

    pub fn with_correction_language(mut self, language: impl Into<String>) -> Self {
        self.correction_language = language.into();
        self
    }

    /// The API key, or a configuration error when it is missing or blank.
    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ThumbnailError::Config(
                "GEMINI_API_KEY (or API_KEY) environment variable is not set".into(),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub formats: Vec<OutputShape>,
    pub output_dir: PathBuf,
    pub correction_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gemini: GeminiConfig::default(),
            formats: OutputShape::DEFAULT_SET.to_vec(),
            output_dir: PathBuf::from("."),
            correction_enabled: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        let formats = match env_non_empty("THUMBGEN_FORMATS") {
            Some(raw) => parse_formats(&raw)?,
            None => OutputShape::DEFAULT_SET.to_vec(),
        };
        let output_dir = env_non_empty("THUMBGEN_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let correction_enabled = env::var("THUMBGEN_CORRECTION")
            .ok()
            .map_or(true, |val| val.trim() != "false");

        Ok(Config {
            gemini: GeminiConfig::from_env(),
            formats,
            output_dir,
            correction_enabled,
        })
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn with_formats(mut self, formats: Vec<OutputShape>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_correction(mut self, enabled: bool) -> Self {
        self.correction_enabled = enabled;
        self
    }

    /// Checked once at startup so the remote-call wrappers never see a missing key.
    pub fn validate(&self) -> Result<()> {
        self.gemini.require_api_key()?;
        if self.formats.is_empty() {
            return Err(ThumbnailError::Config(
                "at least one output format is required".into(),
            ));
        }
        if self.gemini.api_base.trim().is_empty() {
            return Err(ThumbnailError::Config("Gemini API base URL is empty".into()));
        }
        Ok(())
    }
}

/// Parses a comma separated format list, dropping duplicates but keeping order.
pub fn parse_formats(raw: &str) -> Result<Vec<OutputShape>> {
    let mut formats = Vec::new();
    for item in raw.split(',').filter(|s| !s.trim().is_empty()) {
        let shape: OutputShape = item.parse()?;
        if !formats.contains(&shape) {
            formats.push(shape);
        }
    }
    Ok(formats)
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|val| !val.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_produce_wide_and_square() {
        let config = Config::default();
        assert_eq!(config.formats, vec![OutputShape::Wide, OutputShape::Square]);
        assert!(config.correction_enabled);
        assert_eq!(config.gemini.image_model, DEFAULT_IMAGE_MODEL);
        assert_eq!(config.gemini.correction_model, DEFAULT_CORRECTION_MODEL);
    }

    #[test]
    fn validate_requires_api_key() {
        let missing = Config::default();
        assert!(matches!(missing.validate(), Err(ThumbnailError::Config(_))));

        let blank = Config::default().with_gemini(GeminiConfig::new().with_api_key("   "));
        assert!(blank.validate().is_err());

        let ok = Config::default().with_gemini(GeminiConfig::new().with_api_key("k"));
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_format_list() {
        let config = Config::default()
            .with_gemini(GeminiConfig::new().with_api_key("k"))
            .with_formats(vec![]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_formats_keeps_order_and_dedups() {
        let formats = parse_formats("square, wide,1:1,").unwrap();
        assert_eq!(formats, vec![OutputShape::Square, OutputShape::Wide]);
        assert!(parse_formats("wide,banner").is_err());
    }
}
