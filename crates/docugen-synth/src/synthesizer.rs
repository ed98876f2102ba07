//! Outline synthesis: parameters in, typed outline out
//!
//! The provider is schema-constrained but knows nothing about output types,
//! so the synthesizer decodes the answer with the shape the request asked
//! for and stamps the type onto the result.

use serde::Deserialize;
use tracing::{debug, info};

use docugen_ast::{DocumentSection, GeneratedData, GenerationParams, OutputType, SlideContent};

use crate::error::{Result, SynthesisError};
use crate::provider::{OutlineProvider, SynthesisRequest};

/// Slides answer as constrained by the slides schema
#[derive(Debug, Deserialize)]
struct SlidesResponse {
    title: String,
    #[serde(default)]
    subtitle: Option<String>,
    items: Vec<SlideContent>,
}

/// Document answer as constrained by the document schema
#[derive(Debug, Deserialize)]
struct DocumentResponse {
    title: String,
    items: Vec<DocumentSection>,
}

/// Drives one provider call per request
#[derive(Debug)]
pub struct Synthesizer<P> {
    provider: P,
}

impl<P: OutlineProvider> Synthesizer<P> {
    /// Create a synthesizer over a provider
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The wrapped provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Turn parameters into an outline
    ///
    /// Parameters are validated before the provider is contacted. The
    /// provider is called exactly once; its failures are not retried.
    pub fn synthesize(&self, params: &GenerationParams) -> Result<GeneratedData> {
        params.validate()?;

        let request = SynthesisRequest::for_params(params);
        debug!(
            provider = self.provider.name(),
            output_type = %params.output_type,
            count = params.count,
            "Requesting outline"
        );

        let raw = self.provider.generate(&request)?;
        let outline = parse_outline(&raw, params.output_type)?;

        if outline.items.len() != params.count as usize {
            debug!(
                requested = params.count,
                received = outline.items.len(),
                "Provider returned a different item count"
            );
        }
        info!(
            title = %outline.title,
            items = outline.items.len(),
            output_type = %outline.output_type(),
            "Synthesized outline"
        );
        Ok(outline)
    }
}

/// Decode a provider answer into an outline of the requested type
///
/// Accepts the JSON object on its own or wrapped in a fenced code block.
pub fn parse_outline(raw: &str, output_type: OutputType) -> Result<GeneratedData> {
    let payload = strip_code_fence(raw);
    if payload.is_empty() {
        return Err(SynthesisError::EmptyResponse);
    }

    let outline = match output_type {
        OutputType::Slides => {
            let response: SlidesResponse = serde_json::from_str(payload)?;
            let data = GeneratedData::slides(response.title, response.items);
            match response.subtitle {
                Some(subtitle) => data.with_subtitle(subtitle),
                None => data,
            }
        }
        OutputType::Document => {
            let response: DocumentResponse = serde_json::from_str(payload)?;
            GeneratedData::document(response.title, response.items)
        }
    };
    Ok(outline)
}

/// Remove a surrounding ```` ``` ```` / ```` ```json ```` fence, if any
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string on the opening line
    match body.split_once('\n') {
        Some((info, inner)) if !info.contains('{') => inner.trim(),
        _ => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slides() {
        let outline = parse_outline(
            r#"{"title":"Q3 Plan","subtitle":"Board","items":[{"title":"Revenue","points":["Up 12%","New market"]}]}"#,
            OutputType::Slides,
        )
        .unwrap();

        assert_eq!(outline.output_type(), OutputType::Slides);
        assert_eq!(outline.subtitle(), Some("Board"));
        let items = outline.slide_items().unwrap();
        assert_eq!(items[0].points, vec!["Up 12%", "New market"]);
    }

    #[test]
    fn test_parse_document() {
        let outline = parse_outline(
            r#"{"title":"Report","items":[{"heading":"Intro","paragraphs":["A.","B."]}]}"#,
            OutputType::Document,
        )
        .unwrap();

        assert_eq!(outline.output_type(), OutputType::Document);
        assert_eq!(outline.section_items().unwrap()[0].heading, "Intro");
    }

    #[test]
    fn test_missing_title_is_schema_error() {
        let err = parse_outline(r#"{"items":[]}"#, OutputType::Slides).unwrap_err();
        assert!(matches!(err, SynthesisError::Schema(_)));
    }

    #[test]
    fn test_wrong_item_shape_is_schema_error() {
        let err = parse_outline(
            r#"{"title":"Report","items":[{"title":"Revenue","points":[]}]}"#,
            OutputType::Document,
        )
        .unwrap_err();
        assert!(matches!(err, SynthesisError::Schema(_)));
    }

    #[test]
    fn test_empty_answer() {
        assert!(matches!(
            parse_outline("  \n", OutputType::Slides),
            Err(SynthesisError::EmptyResponse)
        ));
    }

    #[test]
    fn test_fenced_answer() {
        let raw = "```json\n{\"title\":\"T\",\"items\":[]}\n```";
        let outline = parse_outline(raw, OutputType::Document).unwrap();
        assert_eq!(outline.title, "T");
        assert!(outline.items.is_empty());
        assert_eq!(outline.output_type(), OutputType::Document);
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("  {}  "), "{}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```{}```"), "{}");
        assert_eq!(strip_code_fence("```{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json\n{}"), "```json\n{}");
    }
}
