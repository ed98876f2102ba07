//! Synthesis through the provider seam with a scripted provider

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use docugen_ast::{GenerationParams, Language, OutputType, Tone, ValidationError};
use docugen_synth::{
    OutlineProvider, ProviderError, Session, SessionState, SynthesisError, SynthesisRequest,
    Synthesizer, FAILURE_MESSAGE,
};

/// Returns a fixed answer and records every request it sees
struct ScriptedProvider {
    answer: std::result::Result<String, u16>,
    calls: AtomicUsize,
    last_brief: Mutex<Option<String>>,
}

impl ScriptedProvider {
    fn answering(json: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(json.to_string()),
            calls: AtomicUsize::new(0),
            last_brief: Mutex::new(None),
        })
    }

    fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            answer: Err(status),
            calls: AtomicUsize::new(0),
            last_brief: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OutlineProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn generate(&self, request: &SynthesisRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_brief.lock().unwrap() = Some(request.brief.clone());
        match &self.answer {
            Ok(json) => Ok(json.clone()),
            Err(status) => Err(ProviderError::ServerError {
                status: *status,
                message: "rejected".to_string(),
            }),
        }
    }
}

fn slides_params(count: u32) -> GenerationParams {
    GenerationParams::new("Q3 planning", OutputType::Slides, Tone::Business, count, Language::English)
        .unwrap()
}

const Q3_DECK: &str = r#"{"title":"Q3 Plan","items":[{"title":"Revenue","points":["Up 12%","New market"]}]}"#;

#[test]
fn test_blank_prompt_never_reaches_provider() {
    let provider = ScriptedProvider::answering(Q3_DECK);
    let synthesizer = Synthesizer::new(provider.clone());

    let mut params = slides_params(3);
    params.prompt = String::new();

    let err = synthesizer.synthesize(&params).unwrap_err();
    assert!(matches!(
        err,
        SynthesisError::Validation(ValidationError::EmptyPrompt)
    ));
    assert_eq!(provider.calls(), 0);
}

#[test]
fn test_one_call_per_request() {
    let provider = ScriptedProvider::answering(Q3_DECK);
    let synthesizer = Synthesizer::new(provider.clone());

    let outline = synthesizer.synthesize(&slides_params(5)).unwrap();
    assert_eq!(provider.calls(), 1);
    assert_eq!(outline.output_type(), OutputType::Slides);

    // Fewer items than requested are accepted as-is
    assert_eq!(outline.items.len(), 1);

    let brief = provider.last_brief.lock().unwrap().clone().unwrap();
    assert!(brief.contains("Topic: Q3 planning"));
    assert!(brief.contains("Number of slides: 5"));
}

#[test]
fn test_type_is_stamped_from_request() {
    let provider = ScriptedProvider::answering(
        r#"{"title":"Report","items":[{"heading":"Intro","paragraphs":["A.","B."]}]}"#,
    );
    let synthesizer = Synthesizer::new(provider);
    let params =
        GenerationParams::new("Report", OutputType::Document, Tone::Academic, 1, Language::English)
            .unwrap();

    let outline = synthesizer.synthesize(&params).unwrap();
    assert_eq!(outline.output_type(), OutputType::Document);
    assert_eq!(outline.section_items().unwrap()[0].paragraphs, vec!["A.", "B."]);
}

#[test]
fn test_missing_title_fails_without_outline() {
    let good = Synthesizer::new(ScriptedProvider::answering(Q3_DECK));
    let bad_provider = ScriptedProvider::answering(r#"{"items":[]}"#);
    let bad = Synthesizer::new(bad_provider.clone());

    let mut session = Session::new(OutputType::Slides);
    session.generate(&good, &slides_params(1)).unwrap();

    let err = session.generate(&bad, &slides_params(1)).unwrap_err();
    assert!(matches!(err, SynthesisError::Schema(_)));
    assert_eq!(bad_provider.calls(), 1);

    assert_eq!(session.state(), SessionState::Failed);
    assert_eq!(session.last_error(), Some(FAILURE_MESSAGE));
    assert!(session.outline().is_none());
}

#[test]
fn test_provider_failure_is_not_retried() {
    let provider = ScriptedProvider::failing(503);
    let synthesizer = Synthesizer::new(provider.clone());
    let mut session = Session::default();

    let err = session.generate(&synthesizer, &slides_params(2)).unwrap_err();
    assert!(matches!(
        err,
        SynthesisError::Provider(ProviderError::ServerError { status: 503, .. })
    ));
    assert_eq!(provider.calls(), 1);
    assert!(session.outline().is_none());
}

#[test]
fn test_session_validation_error_leaves_state() {
    let provider = ScriptedProvider::answering(Q3_DECK);
    let synthesizer = Synthesizer::new(provider.clone());
    let mut session = Session::default();

    let mut params = slides_params(2);
    params.count = 0;

    let err = session.generate(&synthesizer, &params).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(provider.calls(), 0);
}
