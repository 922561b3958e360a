//! The classified result of one dispatch attempt.

use crate::error::{HandlerError, SyntaxReport, Unprocessable};
use serde::Serialize;
use serde_json::Value;

/// A recognised no-op: the requested effect already happened or the
/// message is superseded.
///
/// Skips are not errors. The dispatcher commits nothing, logs at warning
/// level and reports distinctly from both success and failure so callers
/// can acknowledge without alarming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skip {
    check: String,
    reason: String,
}

impl Skip {
    pub(crate) fn new(check: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            reason: reason.into(),
        }
    }

    /// Returns the name of the precondition that signalled the skip.
    #[must_use]
    pub fn check(&self) -> &str {
        &self.check
    }

    /// Returns the human-readable skip reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Record of one handler invocation during a dispatch attempt.
///
/// Event fan-out produces one report per registered handler, in
/// registration order, whether or not earlier handlers failed.
#[derive(Debug)]
pub struct HandlerReport {
    handler: String,
    disposition: Result<Option<Value>, HandlerError>,
}

impl HandlerReport {
    pub(crate) fn success(handler: impl Into<String>, output: Option<Value>) -> Self {
        Self {
            handler: handler.into(),
            disposition: Ok(output),
        }
    }

    pub(crate) fn failure(handler: impl Into<String>, error: HandlerError) -> Self {
        Self {
            handler: handler.into(),
            disposition: Err(error),
        }
    }

    /// Returns the handler's registered name.
    #[must_use]
    pub fn handler(&self) -> &str {
        &self.handler
    }

    /// Returns `true` if the invocation succeeded.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.disposition.is_ok()
    }

    /// Returns the handler's result document, if it succeeded with one.
    #[must_use]
    pub fn output(&self) -> Option<&Value> {
        match &self.disposition {
            Ok(output) => output.as_ref(),
            Err(_) => None,
        }
    }

    /// Returns the handler's error, if it failed.
    #[must_use]
    pub fn error(&self) -> Option<&HandlerError> {
        match &self.disposition {
            Ok(_) => None,
            Err(error) => Some(error),
        }
    }
}

/// The classified result of dispatching one envelope.
///
/// Produced once per dispatch attempt and never persisted by the pipeline;
/// the calling boundary decides how to map each variant (HTTP status,
/// queue acknowledgement, log record).
#[derive(Debug)]
pub enum Outcome {
    /// Every invoked handler succeeded and the unit of work committed.
    /// Carries one report per handler invocation, in registration order.
    Dispatched(Vec<HandlerReport>),

    /// A precondition recognised the message as already satisfied or
    /// stale. Nothing committed; not an error.
    Skipped(Skip),

    /// Structural validation failed. No handler was invoked and nothing
    /// committed. Carries every offending field, not just the first.
    Rejected(SyntaxReport),

    /// The message is well-formed but violates a precondition against
    /// current state. Nothing committed.
    Unprocessable(Unprocessable),

    /// At least one handler failed. Every invocation is reported, in
    /// order, and the unit of work was rolled back: a dispatch attempt
    /// commits atomically or not at all.
    Failed(Vec<HandlerReport>),
}

impl Outcome {
    /// Returns `true` for [`Outcome::Dispatched`].
    #[must_use]
    pub const fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched(_))
    }

    /// Returns `true` for [`Outcome::Skipped`].
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    /// Returns the handler reports for outcomes that invoked handlers,
    /// or an empty slice for the terminal validation outcomes.
    #[must_use]
    pub fn reports(&self) -> &[HandlerReport] {
        match self {
            Self::Dispatched(reports) | Self::Failed(reports) => reports,
            Self::Skipped(_) | Self::Rejected(_) | Self::Unprocessable(_) => &[],
        }
    }

    /// Returns the result document of a dispatched command.
    ///
    /// Commands have exactly one handler, so this is the first (only)
    /// report's output. `None` for events, failures and handlers that
    /// returned no document.
    #[must_use]
    pub fn command_output(&self) -> Option<&Value> {
        match self {
            Self::Dispatched(reports) => reports.first().and_then(HandlerReport::output),
            _ => None,
        }
    }
}
