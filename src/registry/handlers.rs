//! Handler registry: type name to command handler or event handler list.

use crate::error::RegistryError;
use crate::ports::{CommandHandler, EventHandler};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Frozen handler bindings, generic over the unit-of-work type.
///
/// Commands bind to exactly one handler; events bind to an ordered list
/// (possibly empty). Built via [`HandlerRegistryBuilder`].
pub struct HandlerRegistry<U> {
    commands: BTreeMap<String, Arc<dyn CommandHandler<U>>>,
    events: BTreeMap<String, Vec<Arc<dyn EventHandler<U>>>>,
}

impl<U> HandlerRegistry<U> {
    /// Returns the command handler for a type name.
    #[must_use]
    pub fn command(&self, type_name: &str) -> Option<&Arc<dyn CommandHandler<U>>> {
        self.commands.get(type_name)
    }

    /// Returns the event handlers for a type name, in registration order.
    ///
    /// An unknown or handler-less event type yields an empty slice.
    #[must_use]
    pub fn events(&self, type_name: &str) -> &[Arc<dyn EventHandler<U>>] {
        self.events.get(type_name).map_or(&[], Vec::as_slice)
    }

    /// Iterates over type names with a command handler.
    pub fn command_types(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Iterates over type names with event handlers.
    pub fn event_types(&self) -> impl Iterator<Item = &str> {
        self.events.keys().map(String::as_str)
    }
}

/// Builder for [`HandlerRegistry`].
///
/// A second command handler for the same type is rejected immediately:
/// the "exactly one handler per command" rule is a configuration error
/// caught at registration time, never at dispatch time.
pub struct HandlerRegistryBuilder<U> {
    commands: BTreeMap<String, Arc<dyn CommandHandler<U>>>,
    events: BTreeMap<String, Vec<Arc<dyn EventHandler<U>>>>,
}

impl<U> HandlerRegistryBuilder<U> {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: BTreeMap::new(),
            events: BTreeMap::new(),
        }
    }

    /// Binds the single handler for a command type.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateCommandHandler`] if the type
    /// already has one.
    pub fn command(
        mut self,
        type_name: impl Into<String>,
        handler: Arc<dyn CommandHandler<U>>,
    ) -> Result<Self, RegistryError> {
        let type_name = type_name.into();
        if self.commands.contains_key(&type_name) {
            return Err(RegistryError::DuplicateCommandHandler { type_name });
        }
        self.commands.insert(type_name, handler);
        Ok(self)
    }

    /// Appends a handler to an event type's ordered list.
    #[must_use]
    pub fn event(
        mut self,
        type_name: impl Into<String>,
        handler: Arc<dyn EventHandler<U>>,
    ) -> Self {
        self.events.entry(type_name.into()).or_default().push(handler);
        self
    }

    /// Freezes the registry.
    #[must_use]
    pub fn build(self) -> HandlerRegistry<U> {
        HandlerRegistry {
            commands: self.commands,
            events: self.events,
        }
    }
}

impl<U> Default for HandlerRegistryBuilder<U> {
    fn default() -> Self {
        Self::new()
    }
}
