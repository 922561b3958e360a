//! Pure domain types for the validation and dispatch pipeline.
//!
//! Nothing in this module performs I/O or holds infrastructure handles.
//! The central invariant lives here: a [`TypedMessage`] can only be
//! constructed by the syntax validator, so every value of that type has
//! already passed structural validation.

pub mod envelope;
pub mod field;
pub mod message;
pub mod outcome;

pub use envelope::Envelope;
pub use field::{FieldKind, FieldValue};
pub use message::{MessageKind, TypedMessage};
pub use outcome::{HandlerReport, Outcome, Skip};
