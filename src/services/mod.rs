//! Orchestration services.

pub mod bus;

pub use bus::{DispatchResult, MessageBus};
