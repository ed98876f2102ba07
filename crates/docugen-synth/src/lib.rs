//! # docugen-synth
//!
//! Outline synthesis for docugen.
//!
//! A [`Synthesizer`] turns [`GenerationParams`](docugen_ast::GenerationParams)
//! into a typed [`GeneratedData`](docugen_ast::GeneratedData) with exactly one
//! call to an [`OutlineProvider`]. The [`Session`] tracks the request
//! lifecycle a user interface sees and keeps only the latest result.
//!
//! ## Example
//!
//! ```
//! use docugen_ast::{GenerationParams, Language, OutputType, Tone};
//! use docugen_synth::{OutlineProvider, ProviderError, SynthesisRequest, Synthesizer};
//!
//! struct Canned;
//!
//! impl OutlineProvider for Canned {
//!     fn name(&self) -> &str {
//!         "canned"
//!     }
//!
//!     fn generate(&self, _request: &SynthesisRequest) -> Result<String, ProviderError> {
//!         Ok(r#"{"title":"Q3 Plan","items":[{"title":"Revenue","points":["Up 12%"]}]}"#.into())
//!     }
//! }
//!
//! let params = GenerationParams::new("Q3", OutputType::Slides, Tone::Business, 1, Language::English)?;
//! let outline = Synthesizer::new(Canned).synthesize(&params)?;
//! assert_eq!(outline.title, "Q3 Plan");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod brief;
pub mod config;
pub mod error;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod provider;
pub mod schema;
pub mod session;
pub mod synthesizer;

// Re-exports
pub use brief::build_brief;
pub use config::SynthConfig;
pub use error::{ConfigError, ProviderError, Result, SynthesisError};
#[cfg(feature = "gemini")]
pub use gemini::GeminiProvider;
pub use provider::{OutlineProvider, SynthesisRequest};
pub use schema::response_schema;
pub use session::{Completion, RequestTicket, Session, SessionState, FAILURE_MESSAGE};
pub use synthesizer::{parse_outline, Synthesizer};
