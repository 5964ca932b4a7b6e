use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetSlot {
    Subject,
    Background,
    StyleReference,
}

impl AssetSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetSlot::Subject => "subject",
            AssetSlot::Background => "background",
            AssetSlot::StyleReference => "style reference",
        }
    }

    pub fn read_failure_message(&self) -> &'static str {
        match self {
            AssetSlot::Subject => "Failed to read file. Please try again.",
            AssetSlot::Background => "Failed to read background file.",
            AssetSlot::StyleReference => "Failed to read style reference file.",
        }
    }
}

impl fmt::Display for AssetSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded image in transfer-ready form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedAsset {
    /// Standard base64 of the file bytes.
    pub encoded_data: String,
    pub media_type: String,
    pub display_name: String,
}

impl UploadedAsset {
    pub fn new(
        encoded_data: impl Into<String>,
        media_type: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            encoded_data: encoded_data.into(),
            media_type: media_type.into(),
            display_name: display_name.into(),
        }
    }

    pub fn from_bytes(bytes: &[u8], media_type: &str, display_name: &str) -> Self {
        Self::new(STANDARD.encode(bytes), media_type, display_name)
    }

    /// Reads and encodes an image file. The message of the error is the reason only;
    /// callers attach the slot.
    pub fn from_path(path: &Path) -> std::result::Result<Self, String> {
        let media_type = media_type_for_path(path).ok_or_else(|| {
            format!(
                "unsupported image type for {} (expected PNG, JPEG or WEBP)",
                path.display()
            )
        })?;
        let bytes = std::fs::read(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::from_bytes(&bytes, media_type, &display_name))
    }

    /// A `data:` URL for previewing the upload.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.encoded_data)
    }
}

/// Media type for the raster formats the upload slots accept.
pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}
