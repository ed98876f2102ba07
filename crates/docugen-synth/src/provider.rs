//! The seam between synthesis and an external outline generator

use std::sync::Arc;

use docugen_ast::{GenerationParams, OutputType};
use serde_json::Value;

use crate::brief::build_brief;
use crate::error::ProviderError;
use crate::schema::response_schema;

/// One provider call: the brief plus the schema the answer must follow
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    /// Output type the response is for
    pub output_type: OutputType,
    /// Natural-language brief
    pub brief: String,
    /// Closed response schema
    pub schema: Value,
}

impl SynthesisRequest {
    /// Request for validated parameters
    pub fn for_params(params: &GenerationParams) -> Self {
        Self {
            output_type: params.output_type,
            brief: build_brief(params),
            schema: response_schema(params.output_type),
        }
    }
}

/// An external generator of schema-constrained JSON
///
/// Implementations make exactly one round-trip per call and return the raw
/// JSON text; decoding belongs to the synthesizer.
pub trait OutlineProvider: Send + Sync {
    /// Provider name, for logs
    fn name(&self) -> &str;

    /// Generate the raw JSON answer for a request
    fn generate(&self, request: &SynthesisRequest) -> Result<String, ProviderError>;
}

impl<P: OutlineProvider + ?Sized> OutlineProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn generate(&self, request: &SynthesisRequest) -> Result<String, ProviderError> {
        (**self).generate(request)
    }
}

impl<P: OutlineProvider + ?Sized> OutlineProvider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn generate(&self, request: &SynthesisRequest) -> Result<String, ProviderError> {
        (**self).generate(request)
    }
}
