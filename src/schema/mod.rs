//! Message schemas: the declared shape of every accepted type.
//!
//! A [`MessageSchema`] pairs a message kind with an ordered list of
//! [`FieldRule`]s. Schemas are collected into a [`SchemaRegistry`] at
//! process start and frozen; the syntax validator references them and
//! never mutates them.

pub mod registry;
pub mod rule;

pub use registry::{MessageSchema, SchemaRegistry, SchemaRegistryBuilder};
pub use rule::{FieldConstraint, FieldRule};
