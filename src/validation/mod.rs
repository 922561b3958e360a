//! Syntax validation: from raw payloads to typed messages.
//!
//! This is the first tier of the pipeline. It parses a raw payload against
//! a registered schema and either produces the only constructible
//! [`crate::domain::TypedMessage`] values in the crate, or a
//! [`crate::error::SyntaxReport`] enumerating every offending field.

pub mod syntax;

pub use syntax::validate_payload;
