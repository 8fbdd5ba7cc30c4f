//! A single transformation attempt's inputs.

use crate::image::SourceImage;
use crate::prompt::compose_instruction;
use crate::style::StyleDescriptor;

/// Inputs for one transformation, built fresh for each attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformationRequest {
    image: SourceImage,
    style_id: String,
    style_prompt: String,
    instructions: String,
}

impl TransformationRequest {
    /// Creates a request for `image` in the given style.
    pub fn new(
        image: SourceImage,
        style: &StyleDescriptor,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            image,
            style_id: style.id.clone(),
            style_prompt: style.prompt.clone(),
            instructions: instructions.into(),
        }
    }

    /// The source photo.
    pub fn image(&self) -> &SourceImage {
        &self.image
    }

    /// Id of the selected style.
    pub fn style_id(&self) -> &str {
        &self.style_id
    }

    /// The style's instruction text.
    pub fn style_prompt(&self) -> &str {
        &self.style_prompt
    }

    /// Free-text user instructions; may be empty.
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// The full text instruction sent with the image.
    pub fn instruction(&self) -> String {
        compose_instruction(&self.style_prompt, &self.instructions)
    }
}
