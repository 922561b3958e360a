//! Payload parsing and batch structural validation.
//!
//! Rules are evaluated in schema declaration order and every failure is
//! collected before returning, so a caller receives a complete diagnostic
//! in one pass rather than one field per round trip. Extra payload fields
//! the schema does not name are ignored.

use crate::domain::{FieldKind, FieldValue, TypedMessage};
use crate::error::{SyntaxError, SyntaxReport};
use crate::schema::{FieldRule, MessageSchema};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::Value;
use std::collections::BTreeMap;

/// Validates a raw payload against a schema.
///
/// On success the returned [`TypedMessage`] carries every present field
/// coerced to its declared kind, stamped with the clock's current time.
/// JSON `null` is treated as absent.
///
/// # Errors
///
/// Returns a [`SyntaxReport`] collecting every structural failure: missing
/// required fields, coercion failures and constraint violations, plus
/// [`SyntaxError::PayloadNotObject`] when the payload is not an object.
///
/// # Examples
///
/// ```
/// use mockable::DefaultClock;
/// use serde_json::json;
/// use vestibule::schema::{FieldRule, MessageSchema};
/// use vestibule::validation::validate_payload;
///
/// let schema = MessageSchema::command("Allocate")
///     .with_field(FieldRule::text("sku").non_empty())
///     .with_field(FieldRule::integer("qty").greater_than(0));
///
/// let message = validate_payload(
///     &schema,
///     &json!({"sku": "TASTELESS-LAMP", "qty": 3}),
///     &DefaultClock,
/// )
/// .expect("well-formed payload");
/// assert_eq!(message.integer("qty"), Some(3));
/// ```
pub fn validate_payload(
    schema: &MessageSchema,
    payload: &Value,
    clock: &impl Clock,
) -> Result<TypedMessage, SyntaxReport> {
    let Some(object) = payload.as_object() else {
        return Err(SyntaxReport::new(vec![SyntaxError::PayloadNotObject]));
    };

    let mut errors = Vec::new();
    let mut fields = BTreeMap::new();

    for rule in schema.fields() {
        let raw = object.get(rule.name()).filter(|value| !value.is_null());
        match raw {
            None => {
                if rule.is_required() {
                    errors.push(SyntaxError::MissingField {
                        field: rule.name().to_owned(),
                    });
                }
            }
            Some(present) => match coerce_field(rule, present) {
                Ok(value) => {
                    collect_violations(rule, &value, &mut errors);
                    fields.insert(rule.name().to_owned(), value);
                }
                Err(error) => errors.push(error),
            },
        }
    }

    if errors.is_empty() {
        Ok(TypedMessage::new(
            schema.type_name().to_owned(),
            schema.kind(),
            fields,
            clock.utc(),
        ))
    } else {
        Err(SyntaxReport::new(errors))
    }
}

/// Coerces one raw value to its rule's declared kind.
///
/// Coercions are deliberately narrow: integers accept JSON numbers and
/// numeric strings, booleans accept JSON booleans and the literals
/// `"true"`/`"false"`, UUIDs and timestamps parse from strings only.
///
/// # Errors
///
/// Returns [`SyntaxError::TypeMismatch`] naming the field and the expected
/// kind when the value cannot be coerced.
pub fn coerce_field(rule: &FieldRule, raw: &Value) -> Result<FieldValue, SyntaxError> {
    let coerced = match rule.kind() {
        FieldKind::Text => raw.as_str().map(|text| FieldValue::Text(text.to_owned())),
        FieldKind::Integer => coerce_integer(raw),
        FieldKind::Boolean => coerce_boolean(raw),
        FieldKind::Uuid => raw
            .as_str()
            .and_then(|text| uuid::Uuid::parse_str(text.trim()).ok())
            .map(FieldValue::Uuid),
        FieldKind::Timestamp => raw
            .as_str()
            .and_then(|text| DateTime::parse_from_rfc3339(text.trim()).ok())
            .map(|parsed| FieldValue::Timestamp(parsed.with_timezone(&Utc))),
    };

    coerced.ok_or_else(|| SyntaxError::TypeMismatch {
        field: rule.name().to_owned(),
        expected: rule.kind(),
    })
}

fn coerce_integer(raw: &Value) -> Option<FieldValue> {
    raw.as_i64()
        .or_else(|| raw.as_str().and_then(|text| text.trim().parse().ok()))
        .map(FieldValue::Integer)
}

fn coerce_boolean(raw: &Value) -> Option<FieldValue> {
    raw.as_bool()
        .or_else(|| match raw.as_str().map(str::trim) {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        })
        .map(FieldValue::Boolean)
}

fn collect_violations(rule: &FieldRule, value: &FieldValue, errors: &mut Vec<SyntaxError>) {
    for constraint in rule.constraints() {
        if let Some(violation) = constraint.violation(value) {
            errors.push(SyntaxError::ConstraintViolated {
                field: rule.name().to_owned(),
                violation,
            });
        }
    }
}
