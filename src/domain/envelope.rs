//! The untyped inbound message envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw inbound message as received from a transport.
///
/// The `type_name` selects the schema and handlers; the `payload` is
/// arbitrary structured data that has not yet been validated. Envelopes
/// round-trip through serde so HTTP and queue adapters can decode them
/// directly.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vestibule::domain::Envelope;
///
/// let envelope = Envelope::new("Allocate", json!({"order_id": "o1", "qty": 3}));
/// assert_eq!(envelope.type_name(), "Allocate");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// The message type discriminant.
    type_name: String,

    /// The raw, unvalidated payload.
    payload: Value,
}

impl Envelope {
    /// Creates an envelope from a type name and raw payload.
    #[must_use]
    pub fn new(type_name: impl Into<String>, payload: Value) -> Self {
        Self {
            type_name: type_name.into(),
            payload,
        }
    }

    /// Returns the message type discriminant.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the raw payload.
    #[must_use]
    pub const fn payload(&self) -> &Value {
        &self.payload
    }
}
