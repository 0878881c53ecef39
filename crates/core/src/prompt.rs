//! Final-prompt assembly.
//!
//! Builds the natural-language prompt sent to the generation backend
//! from the category name, the shared base subject, the
//! category-specific description, the global style, and the
//! aspect-ratio/resolution annotation.
//!
//! Pure string transform. The same inputs must always produce the same
//! bytes: the assembled prompt is also displayed and logged verbatim,
//! and the backend archives it with the produced images.

/// Assemble the final prompt for one unit of work.
///
/// Shape: `[category], [common subject], [specific prompt]. Style:
/// [style] - Aspect Ratio: [ratio], Resolution: [label]`, where every
/// piece is optional except the category. Empty and whitespace-only
/// segments are dropped. A style that already carries a `style:` prefix
/// is appended as-is so the marker never appears twice.
pub fn assemble_prompt(
    category: &str,
    specific_prompt: &str,
    common_subject: &str,
    global_style: &str,
    aspect_ratio: &str,
    resolution: &str,
) -> String {
    let segments: Vec<&str> = [category, common_subject, specific_prompt]
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect();
    let mut prompt = segments.join(", ");

    let style = global_style.trim();
    if !style.is_empty() {
        if style.to_lowercase().starts_with("style:") {
            prompt.push_str(". ");
        } else {
            prompt.push_str(". Style: ");
        }
        prompt.push_str(style);
    }

    let mut params = Vec::new();
    if !aspect_ratio.is_empty() {
        params.push(format!("Aspect Ratio: {aspect_ratio}"));
    }
    if !resolution.is_empty() {
        params.push(format!("Resolution: {resolution}"));
    }
    if !params.is_empty() {
        prompt.push_str(" - ");
        prompt.push_str(&params.join(", "));
    }

    prompt
}
