//! Error taxonomy for the validation and dispatch pipeline.
//!
//! Uses `thiserror` for ergonomic error handling with typed variants that
//! calling boundaries can inspect and map to their native representations
//! (HTTP status codes, queue retry policies, log records).

use crate::domain::{FieldKind, MessageKind};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// A single structural validation failure for one payload field.
///
/// Syntax errors are always reported in batch via [`SyntaxReport`] so a
/// caller receives every offending field in one pass rather than one per
/// round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
pub enum SyntaxError {
    /// The payload was not a JSON object.
    #[error("payload must be a JSON object")]
    PayloadNotObject,

    /// A required field was absent (or JSON `null`) in the payload.
    #[error("field '{field}' is required")]
    MissingField {
        /// The missing field's name.
        field: String,
    },

    /// A field could not be coerced to the kind its schema declares.
    #[error("field '{field}' must be {}", .expected.expectation())]
    TypeMismatch {
        /// The offending field's name.
        field: String,
        /// The kind the schema declares for the field.
        expected: FieldKind,
    },

    /// A coerced field value violated one of its declared constraints.
    #[error("field '{field}' {violation}")]
    ConstraintViolated {
        /// The offending field's name.
        field: String,
        /// Human-readable description of the violated rule, e.g.
        /// `"must be > 0"`.
        violation: String,
    },
}

impl SyntaxError {
    /// Returns the field this error concerns, if it concerns one.
    ///
    /// [`SyntaxError::PayloadNotObject`] is the only field-less variant.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::PayloadNotObject => None,
            Self::MissingField { field }
            | Self::TypeMismatch { field, .. }
            | Self::ConstraintViolated { field, .. } => Some(field),
        }
    }

    /// Returns the failure reason without the field prefix.
    ///
    /// Boundaries render `{field, reason}` pairs from [`Self::field`] and
    /// this accessor.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::PayloadNotObject => "payload must be a JSON object".to_owned(),
            Self::MissingField { .. } => "is required".to_owned(),
            Self::TypeMismatch { expected, .. } => {
                format!("must be {}", expected.expectation())
            }
            Self::ConstraintViolated { violation, .. } => violation.clone(),
        }
    }
}

/// The complete set of syntax errors found in one payload.
///
/// Produced by the syntax validator after checking every field rule, never
/// after only the first failure. Guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{}", format_errors(.0))]
pub struct SyntaxReport(Vec<SyntaxError>);

fn format_errors(errors: &[SyntaxError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl SyntaxReport {
    /// Wraps the collected errors. Callers must pass a non-empty vector;
    /// the validator only constructs a report once at least one rule failed.
    pub(crate) fn new(errors: Vec<SyntaxError>) -> Self {
        debug_assert!(!errors.is_empty(), "syntax report without errors");
        Self(errors)
    }

    /// Returns the individual field errors in schema order.
    #[must_use]
    pub fn errors(&self) -> &[SyntaxError] {
        &self.0
    }

    /// Returns the number of collected errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the report is empty (never, by construction).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if any collected error names the given field.
    #[must_use]
    pub fn concerns_field(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field() == Some(field))
    }
}

/// Classification of semantic rejections for boundary mapping.
///
/// Boundaries choose their own representation, e.g. HTTP 404 for
/// [`Self::NotFound`], 409 for [`Self::Conflict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnprocessableKind {
    /// An entity the message references does not exist.
    NotFound,
    /// The message conflicts with current state (e.g. insufficient stock).
    Conflict,
    /// The message has been superseded by later state.
    Stale,
}

impl std::fmt::Display for UnprocessableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Stale => "stale",
        };
        f.write_str(label)
    }
}

/// A well-formed message that violates a precondition against current state.
///
/// Semantic errors never commit side effects; the unit of work is rolled
/// back before this value is reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("precondition '{check}' rejected the message ({kind}): {detail}")]
pub struct Unprocessable {
    check: String,
    kind: UnprocessableKind,
    detail: String,
}

impl Unprocessable {
    pub(crate) fn new(
        check: impl Into<String>,
        kind: UnprocessableKind,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            check: check.into(),
            kind,
            detail: detail.into(),
        }
    }

    /// Returns the name of the precondition that rejected the message.
    #[must_use]
    pub fn check(&self) -> &str {
        &self.check
    }

    /// Returns the rejection classification.
    #[must_use]
    pub const fn kind(&self) -> UnprocessableKind {
        self.kind
    }

    /// Returns the human-readable rejection detail.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// Errors raised by unit-of-work implementations.
#[derive(Debug, Clone, Error)]
pub enum UnitOfWorkError {
    /// The backing store failed.
    #[error("unit of work backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),

    /// A document could not be serialised or deserialised.
    #[error("serialisation error: {0}")]
    Serialization(String),

    /// The unit of work was already committed or rolled back.
    #[error("unit of work already completed")]
    Completed,
}

impl UnitOfWorkError {
    /// Creates a backend error from any error type.
    #[must_use]
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }

    /// Creates a serialisation error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }
}

/// Errors raised by handler implementations.
///
/// For events, one handler's error is recorded in its report and never
/// suppresses the remaining handlers.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A domain invariant rejected the operation.
    #[error("domain rule violated: {0}")]
    Domain(String),

    /// State access through the unit of work failed.
    #[error("state access failed: {0}")]
    State(#[from] UnitOfWorkError),

    /// An unexpected internal failure.
    #[error("handler failed: {0}")]
    Internal(Arc<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    /// Creates a domain-rule error.
    #[must_use]
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain(message.into())
    }

    /// Creates an internal error from any error type.
    #[must_use]
    pub fn internal(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Internal(Arc::new(err))
    }
}

/// Configuration errors detected while building registries or the bus.
///
/// All of these surface at process start, before any dispatch call: the
/// registries are frozen once construction succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A schema for this type name was already registered.
    #[error("schema for '{type_name}' is already registered")]
    DuplicateSchema {
        /// The offending type name.
        type_name: String,
    },

    /// A command type was given a second handler.
    #[error("command '{type_name}' already has a handler")]
    DuplicateCommandHandler {
        /// The offending type name.
        type_name: String,
    },

    /// A command schema has no handler bound to it.
    #[error("command '{type_name}' has no registered handler")]
    MissingCommandHandler {
        /// The offending type name.
        type_name: String,
    },

    /// A handler or precondition names a type with no registered schema.
    #[error("'{type_name}' has registrations but no schema")]
    UnregisteredType {
        /// The offending type name.
        type_name: String,
    },

    /// Handler registrations contradict the schema's declared role.
    #[error("handler registration for '{type_name}' does not match its {kind} role")]
    RoleMismatch {
        /// The offending type name.
        type_name: String,
        /// The role the schema declares.
        kind: MessageKind,
    },
}

/// Failures of the dispatch call itself, as opposed to classified outcomes.
///
/// Unknown type and infrastructure failures travel on the `Err` side of
/// `dispatch`; everything the pipeline could classify travels on the `Ok`
/// side as an [`crate::domain::Outcome`].
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The envelope names a type with no registered schema or handlers.
    #[error("unknown message type '{0}'")]
    UnknownMessageType(String),

    /// The unit of work could not be opened, read, committed or rolled back.
    #[error(transparent)]
    UnitOfWork(#[from] UnitOfWorkError),
}
