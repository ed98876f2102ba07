//! Natural-language briefs sent to the outline provider

use docugen_ast::{GenerationParams, OutputType};

/// Build the brief for a generation request
///
/// The brief names the topic, target count, tone and language, then adds
/// instructions specific to the output type.
pub fn build_brief(params: &GenerationParams) -> String {
    let (opening, count_label, instructions) = match params.output_type {
        OutputType::Slides => (
            "Create a professional PowerPoint presentation outline.",
            "Number of slides",
            "Include a title slide and content slides with bullet points.",
        ),
        OutputType::Document => (
            "Create a professional MS Word document structure.",
            "Length (Sections)",
            "Include headings, subheadings, and detailed paragraphs.",
        ),
    };

    format!(
        "{}\nTopic: {}\n{}: {}\nTone: {}\nLanguage: {}\nInstructions: {}",
        opening,
        params.prompt.trim(),
        count_label,
        params.count,
        params.tone,
        params.language,
        instructions
    )
}
