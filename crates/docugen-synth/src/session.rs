//! Generation session: the request lifecycle seen by a user interface
//!
//! ```text
//! Idle -> Generating -> Ready
//!                    -> Failed
//! ```
//!
//! Each submitted request gets a ticket with an increasing sequence number.
//! Only the latest ticket may change the session; older completions are
//! reported as [`Completion::Stale`] and dropped.

use tracing::{debug, warn};

use docugen_ast::{GeneratedData, GenerationParams, OutputType, ValidationError};

use crate::error::SynthesisError;
use crate::provider::OutlineProvider;
use crate::synthesizer::Synthesizer;

/// Message shown to the user when a synthesis request fails
pub const FAILURE_MESSAGE: &str = "Failed to generate content. Please check your API key.";

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing requested yet
    Idle,
    /// A request is in flight
    Generating,
    /// The latest request produced an outline
    Ready,
    /// The latest request failed
    Failed,
}

/// Handle of one submitted request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    sequence: u64,
}

impl RequestTicket {
    /// Sequence number (1 for the first request of a session)
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Outcome of delivering a result to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result belonged to the latest request and was applied
    Applied,
    /// A newer request was submitted meanwhile; the result was dropped
    Stale,
}

/// State of one user's generation workflow
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    output_type: OutputType,
    latest: u64,
    outline: Option<GeneratedData>,
    last_error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(OutputType::default())
    }
}

impl Session {
    /// Create an idle session for an output type
    pub fn new(output_type: OutputType) -> Self {
        Self {
            state: SessionState::Idle,
            output_type,
            latest: 0,
            outline: None,
            last_error: None,
        }
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Selected output type
    pub fn output_type(&self) -> OutputType {
        self.output_type
    }

    /// Outline available for export, if any
    pub fn outline(&self) -> Option<&GeneratedData> {
        self.outline.as_ref()
    }

    /// User-facing message of the last failure
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether a request is in flight
    pub fn is_generating(&self) -> bool {
        self.state == SessionState::Generating
    }

    /// Select an output type
    ///
    /// Switching to a different type discards the current outline and
    /// supersedes any request in flight.
    pub fn set_output_type(&mut self, output_type: OutputType) {
        if output_type == self.output_type {
            return;
        }
        debug!(from = %self.output_type, to = %output_type, "Output type changed");
        self.output_type = output_type;
        self.outline = None;
        match self.state {
            SessionState::Generating => {
                self.latest += 1;
                self.state = SessionState::Idle;
            }
            SessionState::Ready => self.state = SessionState::Idle,
            SessionState::Idle | SessionState::Failed => {}
        }
    }

    /// Submit a request
    ///
    /// Invalid parameters are rejected without touching the session. A valid
    /// request discards the current outline.
    pub fn begin(&mut self, params: &GenerationParams) -> Result<RequestTicket, ValidationError> {
        params.validate()?;

        self.set_output_type(params.output_type);
        self.outline = None;
        self.latest += 1;
        self.state = SessionState::Generating;
        self.last_error = None;

        debug!(sequence = self.latest, "Request submitted");
        Ok(RequestTicket {
            sequence: self.latest,
        })
    }

    /// Deliver the result of a request
    ///
    /// A success sets the outline. A failure leaves the session without one.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        result: Result<GeneratedData, SynthesisError>,
    ) -> Completion {
        if ticket.sequence != self.latest {
            warn!(
                sequence = ticket.sequence,
                latest = self.latest,
                "Dropping result of a superseded request"
            );
            return Completion::Stale;
        }

        match result {
            Ok(outline) if outline.output_type() == self.output_type => {
                self.outline = Some(outline);
                self.state = SessionState::Ready;
            }
            Ok(outline) => {
                warn!(
                    expected = %self.output_type,
                    found = %outline.output_type(),
                    "Dropping outline of the wrong type"
                );
                self.fail();
            }
            Err(err) => {
                warn!(error = %err, "Synthesis failed");
                self.fail();
            }
        }
        Completion::Applied
    }

    fn fail(&mut self) {
        self.state = SessionState::Failed;
        self.last_error = Some(FAILURE_MESSAGE.to_string());
    }

    /// Run one request to completion with a synthesizer
    ///
    /// Returns the new outline, or the error that ended the request.
    pub fn generate<P: OutlineProvider>(
        &mut self,
        synthesizer: &Synthesizer<P>,
        params: &GenerationParams,
    ) -> Result<&GeneratedData, SynthesisError> {
        self.begin(params)?;

        match synthesizer.synthesize(params) {
            Ok(outline) => {
                self.state = SessionState::Ready;
                Ok(self.outline.insert(outline))
            }
            Err(err) => {
                warn!(error = %err, "Synthesis failed");
                self.fail();
                Err(err)
            }
        }
    }
}
