//! Handler ports: the business-logic endpoints behind the pipeline.

use crate::domain::TypedMessage;
use crate::error::HandlerError;
use async_trait::async_trait;
use serde_json::Value;

/// Result type for handler operations.
pub type HandlerResult<T> = Result<T, HandlerError>;

/// The endpoint for a command: exactly one per command type.
///
/// A handler only ever receives messages that passed syntax validation and
/// every registered precondition, inside the same unit of work the
/// preconditions read from.
#[async_trait]
pub trait CommandHandler<U>: Send + Sync {
    /// Stable name used in handler reports and logs.
    fn name(&self) -> &str;

    /// Executes the command, optionally returning a caller-visible result
    /// document.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] when a domain invariant rejects the
    /// operation or state access fails; the dispatcher rolls the unit of
    /// work back and reports the failure.
    async fn handle(&self, message: &TypedMessage, uow: &mut U) -> HandlerResult<Option<Value>>;
}

/// An independent subscriber to an event: zero or more per event type.
///
/// Event handlers are invoked in registration order and isolated from one
/// another: a failure in one is recorded but never prevents the remaining
/// handlers from running.
#[async_trait]
pub trait EventHandler<U>: Send + Sync {
    /// Stable name used in handler reports and logs.
    fn name(&self) -> &str;

    /// Reacts to the event.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] on failure; the dispatcher records it,
    /// continues with the remaining handlers and rolls the dispatch
    /// attempt back.
    async fn handle(&self, message: &TypedMessage, uow: &mut U) -> HandlerResult<()>;
}
