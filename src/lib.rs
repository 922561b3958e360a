//! Vestibule: a tiered message-validation and dispatch pipeline.
//!
//! Inbound messages pass through three increasingly contextual gates
//! before any business logic runs:
//!
//! 1. **Syntax**: the payload is parsed against a registered schema;
//!    every structural failure is collected and reported in one pass.
//! 2. **Preconditions**: named semantic checks run against current state
//!    inside the dispatch's unit of work, distinguishing meaningless
//!    messages (unprocessable) from already-satisfied ones (skip).
//! 3. **Dispatch**: a command reaches its single handler exactly once;
//!    an event fans out to every registered handler with failures
//!    isolated per handler.
//!
//! No handler ever observes a malformed or duplicate message, and only a
//! fully validated, preconditioned message can commit a state mutation.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain** ([`domain`]): pure types (envelope, typed message,
//!   outcome) with no infrastructure dependencies
//! - **Ports** ([`ports`]): abstract trait interfaces for the unit of
//!   work, handlers and preconditions
//! - **Adapters** ([`adapters`]): concrete implementations (in-memory
//!   store for tests and embedding)
//! - **Schema & validation** ([`schema`], [`validation`]): the structural
//!   tier
//! - **Registries & services** ([`registry`], [`services`]): frozen
//!   lookup tables and the dispatching bus
//!
//! # Example
//!
//! ```
//! use mockable::DefaultClock;
//! use serde_json::json;
//! use vestibule::schema::{FieldRule, MessageSchema};
//! use vestibule::validation::validate_payload;
//!
//! let schema = MessageSchema::command("Allocate")
//!     .with_field(FieldRule::text("order_id").non_empty())
//!     .with_field(FieldRule::text("sku").non_empty())
//!     .with_field(FieldRule::integer("qty").greater_than(0));
//!
//! let message = validate_payload(
//!     &schema,
//!     &json!({"order_id": "o1", "sku": "TASTELESS-LAMP", "qty": 3}),
//!     &DefaultClock,
//! )
//! .expect("well-formed payload");
//! assert_eq!(message.integer("qty"), Some(3));
//!
//! let report = validate_payload(
//!     &schema,
//!     &json!({"order_id": "o1", "sku": "TASTELESS-LAMP", "qty": -1}),
//!     &DefaultClock,
//! )
//! .expect_err("negative quantity");
//! assert!(report.concerns_field("qty"));
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod registry;
pub mod schema;
pub mod services;
pub mod validation;

#[cfg(test)]
mod tests;
