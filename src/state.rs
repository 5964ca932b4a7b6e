//! Input state: the uploaded assets, the editable texts, and the outcome of
//! the last run as the presentation layer sees it.

use std::path::Path;

use crate::error::{Result, ThumbnailError};
use crate::models::{AssetSlot, GenerationResult, TextFields, UploadedAsset};

/// Owned snapshot the orchestrator works from. A subject is always present.
#[derive(Debug, Clone)]
pub struct GenerationInputs {
    pub subject: UploadedAsset,
    pub background: Option<UploadedAsset>,
    pub style_reference: Option<UploadedAsset>,
    pub texts: TextFields,
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    subject: Option<UploadedAsset>,
    background: Option<UploadedAsset>,
    style_reference: Option<UploadedAsset>,
    texts: TextFields,
    results: Vec<GenerationResult>,
    error: Option<String>,
    running: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_texts(texts: TextFields) -> Self {
        Self {
            texts,
            ..Self::default()
        }
    }

    pub fn subject(&self) -> Option<&UploadedAsset> {
        self.subject.as_ref()
    }

    pub fn background(&self) -> Option<&UploadedAsset> {
        self.background.as_ref()
    }

    pub fn style_reference(&self) -> Option<&UploadedAsset> {
        self.style_reference.as_ref()
    }

    pub fn asset(&self, slot: AssetSlot) -> Option<&UploadedAsset> {
        match slot {
            AssetSlot::Subject => self.subject.as_ref(),
            AssetSlot::Background => self.background.as_ref(),
            AssetSlot::StyleReference => self.style_reference.as_ref(),
        }
    }

    pub fn texts(&self) -> &TextFields {
        &self.texts
    }

    pub fn results(&self) -> &[GenerationResult] {
        &self.results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the generate trigger should be enabled.
    pub fn can_generate(&self) -> bool {
        !self.running && self.subject.is_some()
    }

    fn slot_mut(&mut self, slot: AssetSlot) -> &mut Option<UploadedAsset> {
        match slot {
            AssetSlot::Subject => &mut self.subject,
            AssetSlot::Background => &mut self.background,
            AssetSlot::StyleReference => &mut self.style_reference,
        }
    }

    /// Replaces a slot wholesale. A new subject makes previous results and errors stale.
    pub fn set_asset(&mut self, slot: AssetSlot, asset: UploadedAsset) {
        if slot == AssetSlot::Subject {
            self.clear_outcome();
        }
        log::debug!("{} set to {}", slot, asset.display_name);
        *self.slot_mut(slot) = Some(asset);
    }

    /// Reads `path` into `slot`. On failure the slot is cleared and its message
    /// becomes the current error.
    pub fn set_asset_from_path(&mut self, slot: AssetSlot, path: &Path) -> Result<()> {
        if slot == AssetSlot::Subject {
            self.clear_outcome();
        }

        match UploadedAsset::from_path(path) {
            Ok(asset) => {
                log::info!("📁 {} loaded: {} ({})", slot, asset.display_name, asset.media_type);
                *self.slot_mut(slot) = Some(asset);
                Ok(())
            }
            Err(message) => {
                log::warn!("Could not read {} file: {}", slot, message);
                *self.slot_mut(slot) = None;
                self.error = Some(slot.read_failure_message().to_string());
                Err(ThumbnailError::AssetRead { slot, message })
            }
        }
    }

    pub fn set_subject_from_path(&mut self, path: &Path) -> Result<()> {
        self.set_asset_from_path(AssetSlot::Subject, path)
    }

    pub fn set_background_from_path(&mut self, path: &Path) -> Result<()> {
        self.set_asset_from_path(AssetSlot::Background, path)
    }

    pub fn set_style_reference_from_path(&mut self, path: &Path) -> Result<()> {
        self.set_asset_from_path(AssetSlot::StyleReference, path)
    }

    pub fn clear_asset(&mut self, slot: AssetSlot) {
        *self.slot_mut(slot) = None;
    }

    pub fn set_corner_label(&mut self, text: impl Into<String>) {
        self.texts.corner_label = text.into();
    }

    pub fn set_headline_line1(&mut self, text: impl Into<String>) {
        self.texts.headline_line1 = text.into();
    }

    pub fn set_headline_line2(&mut self, text: impl Into<String>) {
        self.texts.headline_line2 = text.into();
    }

    pub fn set_texts(&mut self, texts: TextFields) {
        self.texts = texts;
    }

    /// `None` without a subject.
    pub fn snapshot(&self) -> Option<GenerationInputs> {
        let subject = self.subject.clone()?;
        Some(GenerationInputs {
            subject,
            background: self.background.clone(),
            style_reference: self.style_reference.clone(),
            texts: self.texts.clone(),
        })
    }

    fn clear_outcome(&mut self) {
        self.results.clear();
        self.error = None;
    }

    pub(crate) fn begin_run(&mut self) {
        self.running = true;
        self.clear_outcome();
    }

    pub(crate) fn finish_run(&mut self, outcome: &Result<Vec<GenerationResult>>) {
        self.running = false;
        match outcome {
            Ok(results) => {
                self.results = results.clone();
                self.error = None;
            }
            Err(e) => {
                self.results.clear();
                self.error = Some(e.user_message());
            }
        }
    }

    pub(crate) fn fail_precondition(&mut self, err: &ThumbnailError) {
        self.error = Some(err.user_message());
    }
}
