//! The schema registry: type name to declared message shape.

use super::rule::FieldRule;
use crate::domain::MessageKind;
use crate::error::RegistryError;
use std::collections::BTreeMap;

/// The declared shape of one message type.
///
/// # Examples
///
/// ```
/// use vestibule::domain::MessageKind;
/// use vestibule::schema::{FieldRule, MessageSchema};
///
/// let schema = MessageSchema::command("Allocate")
///     .with_field(FieldRule::text("order_id").non_empty())
///     .with_field(FieldRule::integer("qty").greater_than(0));
/// assert_eq!(schema.kind(), MessageKind::Command);
/// assert_eq!(schema.fields().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSchema {
    type_name: String,
    kind: MessageKind,
    fields: Vec<FieldRule>,
}

impl MessageSchema {
    fn new(type_name: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            type_name: type_name.into(),
            kind,
            fields: Vec::new(),
        }
    }

    /// Declares a command type: one handler, a definite outcome.
    #[must_use]
    pub fn command(type_name: impl Into<String>) -> Self {
        Self::new(type_name, MessageKind::Command)
    }

    /// Declares an event type: zero or more independent handlers.
    #[must_use]
    pub fn event(type_name: impl Into<String>) -> Self {
        Self::new(type_name, MessageKind::Event)
    }

    /// Appends a field rule. Rules are evaluated, and their errors
    /// reported, in declaration order.
    #[must_use]
    pub fn with_field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    /// Returns the message type discriminant.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the declared message kind.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Returns the field rules in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }
}

/// Frozen mapping from message type name to schema.
///
/// Built once at process start via [`SchemaRegistryBuilder`] and read-only
/// thereafter, so concurrent lookups need no synchronisation.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, MessageSchema>,
}

impl SchemaRegistry {
    /// Looks up the schema for a type name.
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&MessageSchema> {
        self.schemas.get(type_name)
    }

    /// Returns `true` if a schema is registered for the type name.
    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.schemas.contains_key(type_name)
    }

    /// Iterates over the registered schemas in type-name order.
    pub fn iter(&self) -> impl Iterator<Item = &MessageSchema> {
        self.schemas.values()
    }

    /// Returns the number of registered schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns `true` if no schemas are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Builder for [`SchemaRegistry`]; registration order is preserved per
/// field within each schema, and duplicate type names are rejected.
///
/// # Examples
///
/// ```
/// use vestibule::schema::{FieldRule, MessageSchema, SchemaRegistryBuilder};
///
/// let registry = SchemaRegistryBuilder::new()
///     .register(
///         MessageSchema::command("CreateProduct")
///             .with_field(FieldRule::text("sku").non_empty()),
///     )
///     .expect("first registration")
///     .build();
/// assert!(registry.contains("CreateProduct"));
/// ```
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    schemas: BTreeMap<String, MessageSchema>,
}

impl SchemaRegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a schema.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateSchema`] if the type name is
    /// already registered.
    pub fn register(mut self, schema: MessageSchema) -> Result<Self, RegistryError> {
        let type_name = schema.type_name().to_owned();
        if self.schemas.contains_key(&type_name) {
            return Err(RegistryError::DuplicateSchema { type_name });
        }
        self.schemas.insert(type_name, schema);
        Ok(self)
    }

    /// Freezes the registry.
    #[must_use]
    pub fn build(self) -> SchemaRegistry {
        SchemaRegistry {
            schemas: self.schemas,
        }
    }
}
