//! Concrete implementations of the pipeline's ports.
//!
//! Only the in-memory adapter ships with the crate; real deployments bind
//! the unit-of-work port to their own store.

pub mod memory;

pub use memory::{InMemoryStateStore, InMemoryUnitOfWork, InMemoryUnitOfWorkFactory};
