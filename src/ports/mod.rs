//! Abstract trait interfaces at the pipeline's seams.
//!
//! Ports keep the dispatch state machine independent of any concrete
//! storage or domain model: the unit of work is the transactional
//! boundary, handlers are the business-logic endpoints, and preconditions
//! are the semantic gates. Adapters and applications provide the
//! implementations.

pub mod handler;
pub mod precondition;
pub mod unit_of_work;

pub use handler::{CommandHandler, EventHandler, HandlerResult};
pub use precondition::{Precondition, Verdict};
pub use unit_of_work::{UnitOfWork, UnitOfWorkFactory, UnitOfWorkResult};
