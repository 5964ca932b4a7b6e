//! Prompt templates, one per combination of optional assets.
//!
//! Images are always sent in the order subject, background, style reference,
//! and each template refers to them by that position.

use crate::models::{OutputShape, TextFields, UploadedAsset};
use crate::state::GenerationInputs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptTemplate {
    /// Subject only; the model invents the scene.
    Base,
    /// Subject re-lit into the supplied background.
    Composite,
    /// Subject placed in a new environment built from the style reference.
    StyleTransfer,
    /// Composite into the background, then restyle to the style reference.
    CompositeAndStyle,
}

impl PromptTemplate {
    pub fn select(has_background: bool, has_style_reference: bool) -> Self {
        match (has_background, has_style_reference) {
            (false, false) => PromptTemplate::Base,
            (true, false) => PromptTemplate::Composite,
            (false, true) => PromptTemplate::StyleTransfer,
            (true, true) => PromptTemplate::CompositeAndStyle,
        }
    }

    pub fn for_inputs(inputs: &GenerationInputs) -> Self {
        Self::select(inputs.background.is_some(), inputs.style_reference.is_some())
    }

    pub fn name(&self) -> &'static str {
        match self {
            PromptTemplate::Base => "base",
            PromptTemplate::Composite => "composite",
            PromptTemplate::StyleTransfer => "style-transfer",
            PromptTemplate::CompositeAndStyle => "composite-and-style",
        }
    }

    /// Image payloads this template expects, in the order it refers to them.
    pub fn image_parts<'a>(&self, inputs: &'a GenerationInputs) -> Vec<&'a UploadedAsset> {
        let mut parts = vec![&inputs.subject];
        if matches!(self, PromptTemplate::Composite | PromptTemplate::CompositeAndStyle) {
            parts.extend(inputs.background.as_ref());
        }
        if matches!(self, PromptTemplate::StyleTransfer | PromptTemplate::CompositeAndStyle) {
            parts.extend(inputs.style_reference.as_ref());
        }
        parts
    }

    pub fn render(&self, texts: &TextFields, shape: OutputShape) -> String {
        match self {
            PromptTemplate::Base => base(texts, shape),
            PromptTemplate::Composite => composite(texts, shape),
            PromptTemplate::StyleTransfer => style_transfer(texts, shape),
            PromptTemplate::CompositeAndStyle => composite_and_style(texts, shape),
        }
    }
}

fn base(texts: &TextFields, shape: OutputShape) -> String {
    format!(
        r#"You are a top-tier visual artist and professional thumbnail designer known for photorealistic, blockbuster-poster quality graphics for high-engagement social channels.
Turn the provided character image [Image 1] into a striking, photorealistic thumbnail that stops people mid-scroll.

**GUIDING PRINCIPLE: realism above all.** The result must read as a high-budget photograph, never a digital collage.

**DIRECTIVES:**
1. **Quality: Ultra HD 4K.** Render in crisp 4K with sharp textures and clean light reflections and no compression artifacts, like a still from a cinematic production.
2. **Character integrity:** the character is untouchable. Keep their appearance, pose, expression and every detail exactly as given. Do not change them.
3. **Background:** invent a dynamic, photorealistic background that fits the character or the text, with real depth, believable textures and cinematic lighting.
4. **Text, physically present in the scene:**
   - Every line of text must sit in the scene as a physical object, casting real shadows on the background and the character and catching highlights from the light sources.
   - **Top-right corner label:** "{corner}". Clean, bold sans-serif, clearly readable yet integrated.
   - **Headline line 1:** "{line1}". Large, powerful sans-serif with soft, realistic depth shadows.
   - **Headline line 2:** "{line2}". The hero line, larger still, in a premium material such as brushed metal, gold foil or glowing neon, whichever suits the scene, lit flawlessly by the environment.
5. **Composition and finishing:** balance the frame so the eye lands on the character and the headline. Finish with cinematic color grading, a touch of lens flare where it fits, and fine grain to unify everything.
6. **Target format:** {shape} Every compositional decision must serve this format."#,
        corner = texts.corner_label,
        line1 = texts.headline_line1,
        line2 = texts.headline_line2,
        shape = shape.description(),
    )
}

fn composite(texts: &TextFields, shape: OutputShape) -> String {
    format!(
        r#"You are an expert photo compositor and visual effects artist.
Take the character in [Image 1], integrate them seamlessly into the background in [Image 2], and add text to produce a striking, realistic thumbnail.

**GUIDING PRINCIPLE: photorealism.** The result must look like one professionally shot photograph, not a cut-and-paste composite.

**DIRECTIVES:**
1. **Quality: Ultra HD 4K.** Sharp, detailed and free of artifacts.
2. **Character integrity:** keep the character from [Image 1] exactly as given. Do not alter their pose, expression or appearance.
3. **Compositing:**
   - Place the character from [Image 1] into the scene from [Image 2].
   - **Match the lighting:** re-light the character to match the background precisely in direction, color and softness.
   - **Ground the character:** cast accurate, soft shadows from the character onto the background.
4. **Text, physically present in the scene:**
   - The text must cast realistic shadows and receive light from the environment.
   - **Top-right corner label:** "{corner}".
   - **Headline line 1:** "{line1}".
   - **Headline line 2:** "{line2}". Make this line powerful and visually dominant.
5. **Finishing:** subtle color grading and effects that fuse character, background and text into one cinematic image.
6. **Target format:** {shape} Compose the final image to fit this format exactly."#,
        corner = texts.corner_label,
        line1 = texts.headline_line1,
        line2 = texts.headline_line2,
        shape = shape.description(),
    )
}

fn style_transfer(texts: &TextFields, shape: OutputShape) -> String {
    format!(
        r#"You are a master of style transfer and hyper-realistic compositing.
You receive two images: [Image 1] is the subject (a character) and [Image 2] is the style reference.
Move the character from [Image 1] into the world of [Image 2] so convincingly that they look originally photographed there.

**GUIDING PRINCIPLE: seamless integration.** The result must be indistinguishable from a single original piece, never a collage.

**DIRECTIVES:**
1. **Quality: Ultra HD 4K.** Every element, from the character image or the reference, must be sharp, detailed and blended without loss of quality.
2. **Study the reference [Image 2]:**
   - **Lighting and color:** direction, color and quality of light, and the overall grade.
   - **Texture and materials:** surfaces, grain and materials.
   - **Typography:** font, color, texture, shadows and placement of any text.
   - **Atmosphere:** the mood, whether gritty, clean, futuristic or magical.
3. **Character integrity:** the character from [Image 1] is non-negotiable. Preserve their form, pose and identity exactly.
4. **Compositing:**
   - **Re-lighting:** re-light the character to match the reference's light, with accurate new shadows on the new background and environment light wrapping around them.
   - **Environment:** build a new background for the character that reads as a natural extension of the reference's world, lighting the text as part of that scene.
   - **Text:** add the lines below styled *identically* to the reference typography, matching font, color, effects and placement logic.
     - Top-right corner label: "{corner}"
     - Headline line 1: "{line1}"
     - Headline line 2: "{line2}"
5. **Finishing:** unify the image with the reference's color grade, film grain and atmospheric effects.
6. **Target format:** {shape} Adapt the composition to this format while honoring the reference style."#,
        corner = texts.corner_label,
        line1 = texts.headline_line1,
        line2 = texts.headline_line2,
        shape = shape.description(),
    )
}

fn composite_and_style(texts: &TextFields, shape: OutputShape) -> String {
    format!(
        r#"You are a visual director combining the skills of a compositor, a lighting artist and a style specialist.
You have three inputs: [Image 1] is the subject (character), [Image 2] is the environment (background) and [Image 3] is the style guide.
Create a single thumbnail that places the character into the background while fully adopting the artistic style of the reference.

**GUIDING PRINCIPLE: artistic synthesis.** The result must be one unified, cinematic image, not a disjointed combination.

**DIRECTIVES:**
1. **Quality: Ultra HD 4K.** Impeccable, professional output.
2. **Role of each image:**
   - **[Image 1] the character:** preserve form, pose and identity exactly. This is the actor.
   - **[Image 2] the set:** the foundational background. This is the location.
   - **[Image 3] the style guide:** dictates the final look through its lighting, grading, textures and typography.
3. **Steps:**
   a. **Composite:** place the character [Image 1] into the set [Image 2].
   b. **Restyle:** apply the full style of [Image 3] to the combined scene:
      - **Lighting and color:** re-light the whole scene, character and background, to match the mood, palette and light quality of [Image 3].
      - **Texture and atmosphere:** carry over the grain, textures and atmosphere of [Image 3].
   c. **Styled text:** add the lines below styled *identically* to the typography of [Image 3], lit by the scene so they look physically present, matching font, color, effects and placement logic.
      - Top-right corner label: "{corner}"
      - Headline line 1: "{line1}"
      - Headline line 2: "{line2}"
4. **Target format:** {shape} Frame the final composition for this format while respecting the reference style."#,
        corner = texts.corner_label,
        line1 = texts.headline_line1,
        line2 = texts.headline_line2,
        shape = shape.description(),
    )
}
