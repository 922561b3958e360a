//! Precondition registry: type name to ordered semantic gates.

use crate::ports::Precondition;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Frozen precondition bindings, generic over the unit-of-work type.
///
/// Each type's preconditions form an ordered list; the engine evaluates
/// them in registration order and stops at the first non-pass verdict.
pub struct PreconditionRegistry<U> {
    checks: BTreeMap<String, Vec<Arc<dyn Precondition<U>>>>,
}

impl<U> PreconditionRegistry<U> {
    /// Returns the preconditions for a type name, in registration order.
    ///
    /// A type with no registered checks yields an empty slice: validation
    /// alone gates such messages.
    #[must_use]
    pub fn for_type(&self, type_name: &str) -> &[Arc<dyn Precondition<U>>] {
        self.checks.get(type_name).map_or(&[], Vec::as_slice)
    }

    /// Iterates over type names with registered preconditions.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.checks.keys().map(String::as_str)
    }
}

/// Builder for [`PreconditionRegistry`]; appends preserve order.
pub struct PreconditionRegistryBuilder<U> {
    checks: BTreeMap<String, Vec<Arc<dyn Precondition<U>>>>,
}

impl<U> PreconditionRegistryBuilder<U> {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            checks: BTreeMap::new(),
        }
    }

    /// Appends a precondition to a type's ordered list.
    #[must_use]
    pub fn register(
        mut self,
        type_name: impl Into<String>,
        check: Arc<dyn Precondition<U>>,
    ) -> Self {
        self.checks.entry(type_name.into()).or_default().push(check);
        self
    }

    /// Freezes the registry.
    #[must_use]
    pub fn build(self) -> PreconditionRegistry<U> {
        PreconditionRegistry {
            checks: self.checks,
        }
    }
}

impl<U> Default for PreconditionRegistryBuilder<U> {
    fn default() -> Self {
        Self::new()
    }
}
