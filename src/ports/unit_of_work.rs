//! Unit-of-work port: the scoped transactional boundary.

use crate::error::UnitOfWorkError;
use async_trait::async_trait;

/// Result type for unit-of-work operations.
pub type UnitOfWorkResult<T> = Result<T, UnitOfWorkError>;

/// A scoped transactional boundary for one dispatch attempt.
///
/// The dispatcher opens one unit of work per dispatch call, runs
/// preconditions and handlers against it, and finishes it on every exit
/// path: commit when all invoked handlers succeeded, rollback otherwise.
///
/// # Implementation Notes
///
/// Implementations must ensure:
/// - Reads observe the scope's own uncommitted writes (read-your-writes),
///   so a check-then-act sequence stays within one transaction.
/// - Dropping an unfinished unit of work discards its staged work; an
///   abandoned dispatch (e.g. request timeout) must not leak effects.
/// - Operations after [`Self::commit`] or [`Self::rollback`] fail with
///   [`UnitOfWorkError::Completed`].
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Atomically applies the staged work to the backing state.
    ///
    /// # Errors
    ///
    /// Returns [`UnitOfWorkError::Completed`] if the scope already
    /// finished, or a backend error when the store rejects the write.
    async fn commit(&mut self) -> UnitOfWorkResult<()>;

    /// Discards the staged work.
    ///
    /// # Errors
    ///
    /// Returns [`UnitOfWorkError::Completed`] if the scope already
    /// finished, or a backend error when cleanup fails.
    async fn rollback(&mut self) -> UnitOfWorkResult<()>;
}

/// Opens a fresh unit of work for each dispatch call.
///
/// Factories are shared across concurrent dispatches; every call to
/// [`Self::begin`] must yield an independent scope.
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    /// The unit-of-work type this factory produces. Handlers and
    /// preconditions registered with the bus are generic over it, so an
    /// application's handlers see its own transaction type, not an
    /// erased one.
    type Uow: UnitOfWork + Send;

    /// Opens a new unit of work.
    ///
    /// # Errors
    ///
    /// Returns a backend error when the underlying store cannot open a
    /// transaction (e.g. connection failure).
    async fn begin(&self) -> UnitOfWorkResult<Self::Uow>;
}
