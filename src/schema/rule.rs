//! Field rules: per-field coercion targets and value constraints.

use crate::domain::{FieldKind, FieldValue};

/// A value-level predicate attached to a field rule.
///
/// Each constraint applies to one field kind (integer bounds to integers,
/// text shape rules to text); a constraint attached to a field of another
/// kind passes vacuously, since coercion has already fixed the kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldConstraint {
    /// Integer must be strictly greater than the bound.
    GreaterThan(i64),
    /// Integer must be greater than or equal to the bound.
    AtLeast(i64),
    /// Text must contain at least one non-whitespace character.
    NonEmpty,
    /// Text must not exceed the given length in characters.
    MaxLength(usize),
    /// Text must be one of the allowed values.
    OneOf(Vec<String>),
}

impl FieldConstraint {
    /// Evaluates the constraint against a coerced value.
    ///
    /// Returns the violated-rule phrasing on failure (e.g. `"must be > 0"`)
    /// or `None` when the constraint holds.
    #[must_use]
    pub fn violation(&self, value: &FieldValue) -> Option<String> {
        match self {
            Self::GreaterThan(bound) => value.as_integer().and_then(|actual| {
                (actual <= *bound).then(|| format!("must be > {bound}"))
            }),
            Self::AtLeast(bound) => value.as_integer().and_then(|actual| {
                (actual < *bound).then(|| format!("must be >= {bound}"))
            }),
            Self::NonEmpty => value.as_text().and_then(|text| {
                text.trim()
                    .is_empty()
                    .then(|| "must not be empty".to_owned())
            }),
            Self::MaxLength(limit) => value.as_text().and_then(|text| {
                (text.chars().count() > *limit)
                    .then(|| format!("must be at most {limit} characters"))
            }),
            Self::OneOf(allowed) => value.as_text().and_then(|text| {
                (!allowed.iter().any(|candidate| candidate == text))
                    .then(|| format!("must be one of: {}", allowed.join(", ")))
            }),
        }
    }
}

/// The parsing and validation rule for one payload field.
///
/// Built fluently: the kind comes from the constructor, behaviour from the
/// chained modifiers.
///
/// # Examples
///
/// ```
/// use vestibule::schema::FieldRule;
///
/// let qty = FieldRule::integer("qty").greater_than(0);
/// assert_eq!(qty.name(), "qty");
/// assert!(qty.is_required());
///
/// let note = FieldRule::text("note").max_length(200).optional();
/// assert!(!note.is_required());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    name: String,
    kind: FieldKind,
    required: bool,
    constraints: Vec<FieldConstraint>,
}

impl FieldRule {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            constraints: Vec::new(),
        }
    }

    /// Declares a required text field.
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    /// Declares a required integer field.
    #[must_use]
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    /// Declares a required boolean field.
    #[must_use]
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    /// Declares a required UUID field.
    #[must_use]
    pub fn uuid(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Uuid)
    }

    /// Declares a required timestamp field.
    #[must_use]
    pub fn timestamp(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Timestamp)
    }

    /// Marks the field as optional: an absent value is accepted, a present
    /// value is still coerced and constrained.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Requires an integer strictly greater than `bound`.
    #[must_use]
    pub fn greater_than(mut self, bound: i64) -> Self {
        self.constraints.push(FieldConstraint::GreaterThan(bound));
        self
    }

    /// Requires an integer of at least `bound`.
    #[must_use]
    pub fn at_least(mut self, bound: i64) -> Self {
        self.constraints.push(FieldConstraint::AtLeast(bound));
        self
    }

    /// Requires text with at least one non-whitespace character.
    #[must_use]
    pub fn non_empty(mut self) -> Self {
        self.constraints.push(FieldConstraint::NonEmpty);
        self
    }

    /// Caps text length at `limit` characters.
    #[must_use]
    pub fn max_length(mut self, limit: usize) -> Self {
        self.constraints.push(FieldConstraint::MaxLength(limit));
        self
    }

    /// Restricts text to an allowed value set.
    #[must_use]
    pub fn one_of(mut self, allowed: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.constraints.push(FieldConstraint::OneOf(
            allowed.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared kind.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns `true` if the field must be present.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the declared constraints in declaration order.
    #[must_use]
    pub fn constraints(&self) -> &[FieldConstraint] {
        &self.constraints
    }
}
