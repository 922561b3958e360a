//! Frozen handler and precondition registries.
//!
//! Both registries are built once at process start via consuming builders
//! and are read-only afterwards, so dispatch-path lookups take no locks.
//! Cross-consistency between schemas, handlers and preconditions is
//! verified when the message bus is constructed.

pub mod handlers;
pub mod preconditions;

pub use handlers::{HandlerRegistry, HandlerRegistryBuilder};
pub use preconditions::{PreconditionRegistry, PreconditionRegistryBuilder};
