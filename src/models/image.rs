use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, ThumbnailError};
use crate::models::UploadedAsset;

/// Aspect ratio class requested from one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputShape {
    Wide,
    Square,
    Portrait,
    Story,
}

impl OutputShape {
    /// Shapes produced by a run unless configured otherwise.
    pub const DEFAULT_SET: [OutputShape; 2] = [OutputShape::Wide, OutputShape::Square];

    pub fn aspect_ratio(&self) -> &'static str {
        match self {
            OutputShape::Wide => "16:9",
            OutputShape::Square => "1:1",
            OutputShape::Portrait => "4:5",
            OutputShape::Story => "9:16",
        }
    }

    pub fn format_label(&self) -> &'static str {
        match self {
            OutputShape::Wide => "wide",
            OutputShape::Square => "square",
            OutputShape::Portrait => "portrait",
            OutputShape::Story => "story",
        }
    }

    pub fn platform_caption(&self) -> &'static str {
        match self {
            OutputShape::Wide => "YouTube (16:9)",
            OutputShape::Square => "Instagram (1:1)",
            OutputShape::Portrait => "Instagram Portrait (4:5)",
            OutputShape::Story => "Stories & Reels (9:16)",
        }
    }

    /// Composition guidance embedded in every prompt template.
    pub fn description(&self) -> &'static str {
        match self {
            OutputShape::Wide => "Generate a widescreen 16:9 image suited to a YouTube thumbnail, with a horizontal, cinematic composition.",
            OutputShape::Square => "Generate a square 1:1 image suited to an Instagram grid post, with a composition balanced inside the square frame.",
            OutputShape::Portrait => "Generate a vertical 4:5 image suited to an Instagram portrait post, with a composition taller than it is wide.",
            OutputShape::Story => "Generate a tall vertical 9:16 image suited to Stories or Reels, with a strongly vertical composition.",
        }
    }
}

impl fmt::Display for OutputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.format_label())
    }
}

impl FromStr for OutputShape {
    type Err = ThumbnailError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wide" | "16:9" | "youtube" => Ok(OutputShape::Wide),
            "square" | "1:1" | "instagram" => Ok(OutputShape::Square),
            "portrait" | "4:5" => Ok(OutputShape::Portrait),
            "story" | "9:16" | "reels" => Ok(OutputShape::Story),
            other => Err(ThumbnailError::Config(format!(
                "unknown output format '{}'",
                other
            ))),
        }
    }
}

/// One generation call: images in payload order, then the instruction text.
#[derive(Debug, Clone, Serialize)]
pub struct ImageGenerationRequest {
    pub images: Vec<UploadedAsset>,
    pub instruction: String,
    pub shape: OutputShape,
}

/// Image payload extracted from a generation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub data: String,
    pub media_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Base64 image bytes, displayed as JPEG.
    pub image_data: String,
    pub format_label: String,
    pub output_shape: OutputShape,
}

impl GenerationResult {
    pub const DISPLAY_MEDIA_TYPE: &'static str = "image/jpeg";

    pub fn new(image_data: impl Into<String>, output_shape: OutputShape) -> Self {
        Self {
            image_data: image_data.into(),
            format_label: output_shape.format_label().to_string(),
            output_shape,
        }
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", Self::DISPLAY_MEDIA_TYPE, self.image_data)
    }

    /// Proposed filename for the download action, e.g. `thumbnail-16-9-1700000000000.jpg`.
    pub fn download_filename(&self, timestamp_millis: i64) -> String {
        format!(
            "thumbnail-{}-{}.jpg",
            self.output_shape.aspect_ratio().replace(':', "-"),
            timestamp_millis
        )
    }

    pub fn save_to(&self, dir: &Path, timestamp_millis: i64) -> Result<PathBuf> {
        let bytes = STANDARD.decode(self.image_data.trim()).map_err(|e| {
            ThumbnailError::Response(format!(
                "{} image is not valid base64: {}",
                self.format_label, e
            ))
        })?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.download_filename(timestamp_millis));
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// Saves every result under one timestamp. A failed write does not stop the
/// remaining ones; outcomes come back in input order.
pub fn save_results<'a>(
    results: &'a [GenerationResult],
    dir: &Path,
    timestamp_millis: i64,
) -> Vec<(&'a GenerationResult, Result<PathBuf>)> {
    results
        .iter()
        .map(|result| (result, result.save_to(dir, timestamp_millis)))
        .collect()
}
