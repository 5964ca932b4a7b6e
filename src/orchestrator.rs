use futures::future::{join3, join_all};

use crate::error::{Result, ThumbnailError};
use crate::gemini::{ImageGenerator, TextCorrector};
use crate::logger;
use crate::models::{
    GeneratedImage, GenerationResult, ImageGenerationRequest, OutputShape, TextFields,
};
use crate::prompt::PromptTemplate;
use crate::state::{GenerationInputs, InputState};

/// Runs the correction pass and then the per-shape generation calls. Both
/// groups are polled on the caller's task; nothing is spawned.
pub struct Orchestrator<C, G> {
    corrector: C,
    generator: G,
    formats: Vec<OutputShape>,
    correction_enabled: bool,
}

impl<C: TextCorrector, G: ImageGenerator> Orchestrator<C, G> {
    pub fn new(corrector: C, generator: G) -> Self {
        Self {
            corrector,
            generator,
            formats: OutputShape::DEFAULT_SET.to_vec(),
            correction_enabled: true,
        }
    }

    /// Sets the shapes generated per run, in order. Duplicates are dropped.
    pub fn with_formats(mut self, formats: Vec<OutputShape>) -> Result<Self> {
        let mut unique = Vec::with_capacity(formats.len());
        for shape in formats {
            if !unique.contains(&shape) {
                unique.push(shape);
            }
        }
        if unique.is_empty() {
            return Err(ThumbnailError::Config(
                "at least one output format is required".into(),
            ));
        }
        self.formats = unique;
        Ok(self)
    }

    pub fn with_correction(mut self, enabled: bool) -> Self {
        self.correction_enabled = enabled;
        self
    }

    pub fn formats(&self) -> &[OutputShape] {
        &self.formats
    }

    /// Corrects all three fields concurrently. A failed call keeps that field's text.
    pub async fn correct_texts(&self, texts: &TextFields) -> TextFields {
        if !self.correction_enabled {
            return texts.clone();
        }

        let (corner, line1, line2) = join3(
            self.correct_or_keep("corner label", &texts.corner_label),
            self.correct_or_keep("headline line 1", &texts.headline_line1),
            self.correct_or_keep("headline line 2", &texts.headline_line2),
        )
        .await;

        TextFields {
            corner_label: corner,
            headline_line1: line1,
            headline_line2: line2,
        }
    }

    async fn correct_or_keep(&self, field: &str, text: &str) -> String {
        match self.corrector.correct(text).await {
            Ok(corrected) => {
                if corrected != text {
                    log::info!("✏️  Corrected {}: '{}' -> '{}'", field, text, corrected);
                }
                corrected
            }
            Err(e) => {
                log::warn!("Correction of {} failed, keeping original: {}", field, e);
                text.to_string()
            }
        }
    }

    /// Generates one image per configured shape from already corrected inputs.
    pub async fn generate_images(&self, inputs: &GenerationInputs) -> Result<Vec<GenerationResult>> {
        let template = PromptTemplate::for_inputs(inputs);
        let images: Vec<_> = template.image_parts(inputs).into_iter().cloned().collect();
        log::info!(
            "🎨 Using {} template with {} image(s) for {} format(s)",
            template.name(),
            images.len(),
            self.formats.len()
        );

        let requests: Vec<ImageGenerationRequest> = self
            .formats
            .iter()
            .map(|&shape| ImageGenerationRequest {
                images: images.clone(),
                instruction: template.render(&inputs.texts, shape),
                shape,
            })
            .collect();

        let outcomes = join_all(requests.iter().map(|request| self.generator.generate(request))).await;

        assemble_results(self.formats.iter().copied().zip(outcomes))
    }

    /// Correction pass, then generation, for an input snapshot.
    pub async fn generate(&self, inputs: &GenerationInputs) -> Result<Vec<GenerationResult>> {
        let (_, outcome) = self.generate_with_corrections(inputs).await;
        outcome
    }

    async fn generate_with_corrections(
        &self,
        inputs: &GenerationInputs,
    ) -> (TextFields, Result<Vec<GenerationResult>>) {
        let _timer = logger::timer("Thumbnail generation run");

        let corrected = self.correct_texts(&inputs.texts).await;
        let working = GenerationInputs {
            texts: corrected.clone(),
            ..inputs.clone()
        };

        let outcome = self.generate_images(&working).await;
        (corrected, outcome)
    }

    /// One user-triggered run against the input state. Corrected texts are
    /// written back even when generation fails; results are replaced as a whole.
    pub async fn run<'s>(&self, state: &'s mut InputState) -> Result<&'s [GenerationResult]> {
        let Some(inputs) = state.snapshot() else {
            let err = ThumbnailError::MissingSubject;
            log::warn!("Generation requested without a subject image");
            state.fail_precondition(&err);
            return Err(err);
        };

        log::info!("🚀 Starting generation for {}", inputs.subject.display_name);
        state.begin_run();

        let (corrected, outcome) = self.generate_with_corrections(&inputs).await;
        state.set_texts(corrected);
        state.finish_run(&outcome);

        match outcome {
            Ok(_) => Ok(state.results()),
            Err(e) => Err(e),
        }
    }
}

fn assemble_results<I>(outcomes: I) -> Result<Vec<GenerationResult>>
where
    I: IntoIterator<Item = (OutputShape, Result<Option<GeneratedImage>>)>,
{
    let mut results = Vec::new();
    for (shape, outcome) in outcomes {
        match outcome {
            Ok(Some(image)) if image.data.trim().is_empty() => {
                log::warn!("Empty image payload for {} format", shape)
            }
            Ok(Some(image)) => {
                log::info!("✅ {} image generated ({})", shape.platform_caption(), image.media_type);
                results.push(GenerationResult::new(image.data, shape));
            }
            Ok(None) => log::warn!("No image returned for {} format", shape),
            Err(e) => log::warn!("Generation failed for {} format: {}", shape, e),
        }
    }

    if results.is_empty() {
        log::error!("Generation failed for all formats");
        return Err(ThumbnailError::GenerationFailed);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetSlot, UploadedAsset};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::Barrier;
    use tokio::time::timeout;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    enum Call {
        Correct(String),
        Generate(OutputShape),
    }

    type CallLog = Arc<Mutex<Vec<Call>>>;

    struct FakeCorrector {
        log: CallLog,
        fail: bool,
    }

    #[async_trait]
    impl TextCorrector for FakeCorrector {
        async fn correct(&self, text: &str) -> Result<String> {
            self.log.lock().unwrap().push(Call::Correct(text.to_string()));
            if self.fail {
                Err(ThumbnailError::Request("connection refused".into()))
            } else {
                Ok(text.replace("HISTORIA", "HISTÓRIA"))
            }
        }
    }

    #[derive(Clone, Copy)]
    enum Outcome {
        Image,
        Empty,
        Blank,
        Error,
    }

    struct FakeGenerator {
        log: CallLog,
        wide: Outcome,
        square: Outcome,
        requests: Mutex<Vec<ImageGenerationRequest>>,
    }

    #[async_trait]
    impl ImageGenerator for FakeGenerator {
        async fn generate(
            &self,
            request: &ImageGenerationRequest,
        ) -> Result<Option<GeneratedImage>> {
            self.log.lock().unwrap().push(Call::Generate(request.shape));
            self.requests.lock().unwrap().push(request.clone());
            let outcome = match request.shape {
                OutputShape::Wide => self.wide,
                _ => self.square,
            };
            match outcome {
                Outcome::Image => Ok(Some(GeneratedImage {
                    data: format!("img-{}", request.shape),
                    media_type: "image/png".into(),
                })),
                Outcome::Empty => Ok(None),
                Outcome::Blank => Ok(Some(GeneratedImage {
                    data: String::new(),
                    media_type: "image/png".into(),
                })),
                Outcome::Error => Err(ThumbnailError::Response("500".into())),
            }
        }
    }

    struct Harness {
        log: CallLog,
        generator: Arc<FakeGenerator>,
        orchestrator: Orchestrator<Arc<FakeCorrector>, Arc<FakeGenerator>>,
    }

    fn harness(correction_fails: bool, wide: Outcome, square: Outcome) -> Harness {
        let log: CallLog = Arc::default();
        let corrector = Arc::new(FakeCorrector {
            log: log.clone(),
            fail: correction_fails,
        });
        let generator = Arc::new(FakeGenerator {
            log: log.clone(),
            wide,
            square,
            requests: Mutex::new(Vec::new()),
        });
        Harness {
            log,
            generator: generator.clone(),
            orchestrator: Orchestrator::new(corrector, generator),
        }
    }

    fn asset(name: &str) -> UploadedAsset {
        UploadedAsset::new(format!("{}-data", name), "image/png", name)
    }

    fn state_with(background: bool, style: bool) -> InputState {
        let mut state = InputState::new();
        state.set_asset(AssetSlot::Subject, asset("subject"));
        if background {
            state.set_asset(AssetSlot::Background, asset("background"));
        }
        if style {
            state.set_asset(AssetSlot::StyleReference, asset("style"));
        }
        state
    }

    #[tokio::test]
    async fn example_run_corrects_three_then_generates_two() {
        let h = harness(false, Outcome::Image, Outcome::Image);
        let mut state = state_with(false, false);

        let results = h.orchestrator.run(&mut state).await.unwrap().to_vec();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].output_shape, OutputShape::Wide);
        assert_eq!(results[0].format_label, "wide");
        assert_eq!(results[1].output_shape, OutputShape::Square);
        assert_eq!(results[1].format_label, "square");

        let calls = h.log.lock().unwrap().clone();
        assert_eq!(calls.len(), 5);
        let corrected: HashSet<_> = calls[..3].iter().cloned().collect();
        let expected: HashSet<_> = [
            Call::Correct("ROGÉRIO MORRO DA CRUZ".into()),
            Call::Correct("NÃO É SÓ UM NOME,".into()),
            Call::Correct("É UMA HISTÓRIA!".into()),
        ]
        .into_iter()
        .collect();
        assert_eq!(corrected, expected);
        let shapes: HashSet<_> = calls[3..].iter().cloned().collect();
        assert_eq!(
            shapes,
            [Call::Generate(OutputShape::Wide), Call::Generate(OutputShape::Square)]
                .into_iter()
                .collect()
        );

        assert_eq!(state.results().len(), 2);
        assert!(state.error().is_none());
        assert!(!state.is_running());
    }

    #[tokio::test]
    async fn missing_subject_makes_no_calls() {
        let h = harness(false, Outcome::Image, Outcome::Image);
        let mut state = InputState::new();

        let err = h.orchestrator.run(&mut state).await.unwrap_err();
        assert!(matches!(err, ThumbnailError::MissingSubject));
        assert!(h.log.lock().unwrap().is_empty());
        assert_eq!(state.error(), Some("Please upload an image first."));
        assert!(!state.is_running());
    }

    #[tokio::test]
    async fn failed_corrections_keep_original_texts() {
        let h = harness(true, Outcome::Image, Outcome::Image);
        let mut state = state_with(false, false);
        let before = state.texts().clone();

        h.orchestrator.run(&mut state).await.unwrap();
        assert_eq!(state.texts(), &before);

        let requests = h.generator.requests.lock().unwrap();
        assert!(requests[0].instruction.contains(&before.corner_label));
    }

    #[tokio::test]
    async fn corrected_texts_are_written_back_even_when_generation_fails() {
        let h = harness(false, Outcome::Error, Outcome::Empty);
        let mut state = state_with(false, false);
        state.set_headline_line2("UMA HISTORIA");

        let err = h.orchestrator.run(&mut state).await.unwrap_err();
        assert!(matches!(err, ThumbnailError::GenerationFailed));
        assert_eq!(state.texts().headline_line2, "UMA HISTÓRIA");
    }

    #[tokio::test]
    async fn generation_uses_corrected_text() {
        let h = harness(false, Outcome::Image, Outcome::Image);
        let mut state = state_with(false, false);
        state.set_headline_line2("UMA HISTORIA");

        h.orchestrator.run(&mut state).await.unwrap();
        let requests = h.generator.requests.lock().unwrap();
        assert!(requests.iter().all(|r| r.instruction.contains("\"UMA HISTÓRIA\"")));
        assert!(requests.iter().all(|r| !r.instruction.contains("HISTORIA")));
    }

    #[tokio::test]
    async fn both_formats_empty_is_one_aggregate_error() {
        let h = harness(false, Outcome::Empty, Outcome::Error);
        let mut state = state_with(true, false);
        state.finish_run(&Ok(vec![GenerationResult::new("stale", OutputShape::Wide)]));

        let err = h.orchestrator.run(&mut state).await.unwrap_err();
        assert!(matches!(err, ThumbnailError::GenerationFailed));
        assert!(state.results().is_empty());
        assert_eq!(
            state.error(),
            Some("Failed to generate thumbnail. The model may be unavailable. Please try again later.")
        );
    }

    #[tokio::test]
    async fn partial_success_keeps_the_succeeding_shape() {
        let h = harness(false, Outcome::Error, Outcome::Image);
        let mut state = state_with(false, true);

        let results = h.orchestrator.run(&mut state).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].output_shape, OutputShape::Square);
        assert_eq!(results[0].image_data, "img-square");
    }

    #[tokio::test]
    async fn three_way_inputs_send_all_images_in_order() {
        let h = harness(false, Outcome::Image, Outcome::Image);
        let mut state = state_with(true, true);

        h.orchestrator.run(&mut state).await.unwrap();
        let requests = h.generator.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        for request in requests.iter() {
            let names: Vec<&str> = request.images.iter().map(|a| a.display_name.as_str()).collect();
            assert_eq!(names, vec!["subject", "background", "style"]);
            assert_eq!(
                request.instruction,
                PromptTemplate::CompositeAndStyle.render(state.texts(), request.shape)
            );
        }
    }

    #[tokio::test]
    async fn each_combination_selects_its_template() {
        let cases = [
            (false, false, PromptTemplate::Base),
            (true, false, PromptTemplate::Composite),
            (false, true, PromptTemplate::StyleTransfer),
            (true, true, PromptTemplate::CompositeAndStyle),
        ];
        for (background, style, template) in cases {
            let h = harness(false, Outcome::Image, Outcome::Image);
            let mut state = state_with(background, style);
            h.orchestrator.run(&mut state).await.unwrap();

            let requests = h.generator.requests.lock().unwrap();
            for request in requests.iter() {
                assert_eq!(request.instruction, template.render(state.texts(), request.shape));
            }
        }
    }

    #[tokio::test]
    async fn new_subject_after_success_clears_previous_outcome() {
        let h = harness(false, Outcome::Image, Outcome::Image);
        let mut state = state_with(false, false);
        h.orchestrator.run(&mut state).await.unwrap();
        assert_eq!(state.results().len(), 2);

        state.set_asset(AssetSlot::Subject, asset("another"));
        assert!(state.results().is_empty());
        assert!(state.error().is_none());
    }

    #[tokio::test]
    async fn disabled_correction_makes_no_correction_calls() {
        let h = harness(false, Outcome::Image, Outcome::Image);
        let orchestrator = h.orchestrator.with_correction(false);
        let inputs = state_with(false, false).snapshot().unwrap();

        let results = orchestrator.generate(&inputs).await.unwrap();
        assert_eq!(results.len(), 2);
        let calls = h.log.lock().unwrap();
        assert!(calls.iter().all(|c| matches!(c, Call::Generate(_))));
    }

    #[tokio::test]
    async fn configured_formats_drive_the_call_group() {
        let h = harness(false, Outcome::Image, Outcome::Image);
        let orchestrator = h
            .orchestrator
            .with_formats(vec![
                OutputShape::Story,
                OutputShape::Wide,
                OutputShape::Story,
                OutputShape::Portrait,
            ])
            .unwrap();
        assert_eq!(
            orchestrator.formats(),
            &[OutputShape::Story, OutputShape::Wide, OutputShape::Portrait]
        );
        let inputs = state_with(false, false).snapshot().unwrap();

        let results = orchestrator.generate(&inputs).await.unwrap();
        let shapes: Vec<_> = results.iter().map(|r| r.output_shape).collect();
        assert_eq!(
            shapes,
            vec![OutputShape::Story, OutputShape::Wide, OutputShape::Portrait]
        );
    }

    #[test]
    fn empty_format_list_is_rejected() {
        let h = harness(false, Outcome::Image, Outcome::Image);
        assert!(matches!(
            h.orchestrator.with_formats(Vec::new()),
            Err(ThumbnailError::Config(_))
        ));
    }

    #[tokio::test]
    async fn blank_payloads_for_both_formats_fail_the_run() {
        let h = harness(false, Outcome::Blank, Outcome::Blank);
        let mut state = state_with(false, false);

        let err = h.orchestrator.run(&mut state).await.unwrap_err();
        assert!(matches!(err, ThumbnailError::GenerationFailed));
        assert!(state.results().is_empty());
    }

    #[tokio::test]
    async fn blank_payload_for_one_format_is_dropped() {
        let h = harness(false, Outcome::Blank, Outcome::Image);
        let mut state = state_with(false, false);

        let results = h.orchestrator.run(&mut state).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].output_shape, OutputShape::Square);
    }

    /// Each call waits until its whole group has arrived, so calls issued
    /// one after another never complete.
    struct GatedCorrector(Barrier);

    #[async_trait]
    impl TextCorrector for GatedCorrector {
        async fn correct(&self, text: &str) -> Result<String> {
            self.0.wait().await;
            Ok(text.to_string())
        }
    }

    struct GatedGenerator(Barrier);

    #[async_trait]
    impl ImageGenerator for GatedGenerator {
        async fn generate(
            &self,
            request: &ImageGenerationRequest,
        ) -> Result<Option<GeneratedImage>> {
            self.0.wait().await;
            Ok(Some(GeneratedImage {
                data: format!("img-{}", request.shape),
                media_type: "image/png".into(),
            }))
        }
    }

    #[tokio::test]
    async fn corrections_and_generations_are_in_flight_together() {
        let orchestrator = Orchestrator::new(
            GatedCorrector(Barrier::new(3)),
            GatedGenerator(Barrier::new(2)),
        );
        let mut state = state_with(false, false);

        let results = timeout(Duration::from_secs(5), orchestrator.run(&mut state))
            .await
            .expect("calls within a group were not issued concurrently")
            .unwrap();
        assert_eq!(results.len(), 2);
    }
}
