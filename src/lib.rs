pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod prompt;
pub mod state;

pub use config::{Config, GeminiConfig};
pub use error::{Result, ThumbnailError};
pub use gemini::{GeminiClient, ImageClient, ImageGenerator, TextClient, TextCorrector};
pub use models::{
    AssetSlot, GeneratedImage, GenerationResult, ImageGenerationRequest, ModelInfo, ModelRole,
    OutputShape, TextFields, UploadedAsset, save_results,
};
pub use orchestrator::Orchestrator;
pub use prompt::PromptTemplate;
pub use state::{GenerationInputs, InputState};
