//! Builds the instruction sent alongside the photo.

/// Composes the single natural-language instruction for one transformation.
///
/// Style and user text are embedded verbatim, each clause closed with a
/// period. The user clause is left out entirely when there are no user
/// instructions.
pub fn compose_instruction(style_prompt: &str, user_instructions: &str) -> String {
    let mut lines = vec![
        "Transform this image into a professional studio-quality shot.".to_string(),
        format!("Follow these style guidelines: {}", sentence(style_prompt)),
    ];
    if !user_instructions.trim().is_empty() {
        lines.push(format!(
            "Additional instructions from user: {}",
            sentence(user_instructions)
        ));
    }
    lines.extend(
        [
            "Ensure high resolution, professional lighting, and realistic composition.",
            "Maintain the core identity of the subject in the photo while significantly enhancing the background, lighting, and overall professional quality.",
            "If the subject is a person, keep their face recognizable but improve the studio environment.",
        ]
        .map(str::to_string),
    );
    lines.join("\n")
}

// Appends a period unless the text already ends with one.
fn sentence(text: &str) -> String {
    if text.trim_end().ends_with('.') {
        text.to_string()
    } else {
        format!("{text}.")
    }
}
