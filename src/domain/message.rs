//! The validated, typed message and its kind.

use super::FieldValue;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Whether a message is an imperative request or a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// An imperative request expecting exactly one handler and a definite
    /// success or failure outcome.
    Command,
    /// A notification that may fan out to zero or more independent
    /// handlers.
    Event,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Command => "command",
            Self::Event => "event",
        };
        f.write_str(label)
    }
}

/// A message that passed syntax validation.
///
/// # Invariants
///
/// - Every field named by the schema's required rules is present with the
///   declared kind; constraints held at validation time.
/// - Instances are only constructed by the syntax validator; there is no
///   deserialisation path and no public constructor, so a `TypedMessage`
///   cannot exist for invalid raw data.
/// - Immutable after construction; a message lives for exactly one
///   dispatch call and is discarded once its outcome is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypedMessage {
    /// The message type discriminant.
    type_name: String,

    /// Whether this message is a command or an event.
    kind: MessageKind,

    /// Validated fields, keyed by field name.
    fields: BTreeMap<String, FieldValue>,

    /// When the message passed validation.
    received_at: DateTime<Utc>,
}

impl TypedMessage {
    /// Constructs a validated message. Only the syntax validator calls
    /// this; the restricted visibility carries the construction invariant.
    pub(crate) const fn new(
        type_name: String,
        kind: MessageKind,
        fields: BTreeMap<String, FieldValue>,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            type_name,
            kind,
            fields,
            received_at,
        }
    }

    /// Returns the message type discriminant.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns whether this message is a command or an event.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Returns when the message passed validation.
    #[must_use]
    pub const fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Returns the validated fields, keyed by name.
    #[must_use]
    pub const fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Returns a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns a text field's content.
    ///
    /// `None` if the field is absent or not a text value.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(FieldValue::as_text)
    }

    /// Returns an integer field's content.
    ///
    /// `None` if the field is absent or not an integer value.
    #[must_use]
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.field(name).and_then(FieldValue::as_integer)
    }

    /// Returns a boolean field's content.
    ///
    /// `None` if the field is absent or not a boolean value.
    #[must_use]
    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.field(name).and_then(FieldValue::as_boolean)
    }

    /// Returns a UUID field's content.
    ///
    /// `None` if the field is absent or not a UUID value.
    #[must_use]
    pub fn uuid(&self, name: &str) -> Option<Uuid> {
        self.field(name).and_then(FieldValue::as_uuid)
    }

    /// Returns a timestamp field's content.
    ///
    /// `None` if the field is absent or not a timestamp value.
    #[must_use]
    pub fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        self.field(name).and_then(FieldValue::as_timestamp)
    }
}
