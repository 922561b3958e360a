//! Precondition port: semantic gates evaluated before handlers run.

use crate::domain::TypedMessage;
use crate::error::UnprocessableKind;
use async_trait::async_trait;

use super::unit_of_work::UnitOfWorkResult;

/// The verdict of one precondition check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The check holds; dispatch continues.
    Pass,

    /// The requested effect already happened or the message is stale;
    /// dispatch stops as a recognised no-op, not an error.
    Skip {
        /// Human-readable explanation for logs and callers.
        reason: String,
    },

    /// The message is well-formed but meaningless against current state;
    /// dispatch stops with a semantic error.
    Unprocessable {
        /// Classification for boundary mapping.
        kind: UnprocessableKind,
        /// Human-readable rejection detail.
        detail: String,
    },
}

impl Verdict {
    /// Creates a skip verdict.
    #[must_use]
    pub fn skip(reason: impl Into<String>) -> Self {
        Self::Skip {
            reason: reason.into(),
        }
    }

    /// Creates an unprocessable verdict.
    #[must_use]
    pub fn unprocessable(kind: UnprocessableKind, detail: impl Into<String>) -> Self {
        Self::Unprocessable {
            kind,
            detail: detail.into(),
        }
    }

    /// Creates a not-found rejection.
    #[must_use]
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::unprocessable(UnprocessableKind::NotFound, detail)
    }

    /// Creates a conflict rejection.
    #[must_use]
    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::unprocessable(UnprocessableKind::Conflict, detail)
    }

    /// Creates a staleness rejection.
    #[must_use]
    pub fn stale(detail: impl Into<String>) -> Self {
        Self::unprocessable(UnprocessableKind::Stale, detail)
    }

    /// Returns `true` for [`Verdict::Pass`].
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// A named semantic gate checked against current state before a handler
/// runs.
///
/// Preconditions for a message type form an ordered list evaluated
/// fail-fast: later checks may assume earlier ones held (e.g. "entity
/// exists" before "entity has sufficient quantity"). Checks read through
/// the *same* unit of work the handler will use (check-then-act within
/// one transaction) and take it by shared reference: preconditions must
/// not mutate state.
#[async_trait]
pub trait Precondition<U>: Send + Sync {
    /// Stable name used in outcomes and logs, e.g.
    /// `"referenced-entity-exists"`.
    fn name(&self) -> &str;

    /// Evaluates the gate for one message.
    ///
    /// # Errors
    ///
    /// Returns a unit-of-work error only for infrastructure failures while
    /// reading state; semantic rejections travel in the [`Verdict`].
    async fn check(&self, message: &TypedMessage, uow: &U) -> UnitOfWorkResult<Verdict>;
}
