//! The message bus: validation, gating and dispatch for one envelope.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::{Envelope, HandlerReport, MessageKind, Outcome, Skip, TypedMessage};
use crate::error::{DispatchError, RegistryError, UnitOfWorkError, Unprocessable};
use crate::ports::{UnitOfWork, UnitOfWorkFactory, Verdict};
use crate::registry::{HandlerRegistry, PreconditionRegistry};
use crate::schema::SchemaRegistry;
use crate::validation::validate_payload;

/// Result type for dispatch calls.
///
/// Classified outcomes travel on the `Ok` side; unknown message types and
/// infrastructure failures travel on the `Err` side.
pub type DispatchResult = Result<Outcome, DispatchError>;

/// First non-pass decision of the precondition engine.
enum Gate {
    Clear,
    Skipped(Skip),
    Blocked(Unprocessable),
}

/// The dispatcher: orchestrates the full pipeline for one envelope.
///
/// Per dispatch call, strictly in order:
///
/// 1. Resolve the type name against the schema registry.
/// 2. Validate syntax; a malformed payload terminates with
///    [`Outcome::Rejected`] before any state is touched.
/// 3. Open a unit of work scoped to this call.
/// 4. Evaluate preconditions in registration order, short-circuiting on
///    the first skip or rejection.
/// 5. Invoke the command handler exactly once, or every event handler in
///    registration order with failures isolated per handler.
/// 6. Commit if and only if every invoked handler succeeded; roll back
///    otherwise.
///
/// The bus is reentrant: it holds only `Arc`ed frozen registries, so
/// concurrent callers dispatch without external synchronisation, each in
/// their own unit-of-work scope.
///
/// # Example
///
/// ```ignore
/// use vestibule::services::MessageBus;
///
/// let bus = MessageBus::new(schemas, preconditions, handlers, factory, clock)?;
///
/// match bus.dispatch(&envelope).await? {
///     Outcome::Dispatched(reports) => respond_ok(reports),
///     Outcome::Skipped(skip) => respond_noop(skip.reason()),
///     Outcome::Rejected(report) => respond_bad_request(report.errors()),
///     Outcome::Unprocessable(why) => respond_for_kind(why.kind(), why.detail()),
///     Outcome::Failed(reports) => respond_server_error(reports),
/// }
/// ```
#[derive(Clone)]
pub struct MessageBus<F, C>
where
    F: UnitOfWorkFactory,
    C: Clock + Send + Sync,
{
    schemas: Arc<SchemaRegistry>,
    preconditions: Arc<PreconditionRegistry<F::Uow>>,
    handlers: Arc<HandlerRegistry<F::Uow>>,
    factory: Arc<F>,
    clock: Arc<C>,
}

impl<F, C> MessageBus<F, C>
where
    F: UnitOfWorkFactory,
    C: Clock + Send + Sync,
{
    /// Creates a bus over frozen registries, verifying their consistency.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the registries contradict each
    /// other: a command schema without a handler, handlers or
    /// preconditions naming an unregistered type, or handler roles that
    /// do not match the schema's declared kind. All such configuration
    /// errors surface here, at process start, never at dispatch time.
    pub fn new(
        schemas: Arc<SchemaRegistry>,
        preconditions: Arc<PreconditionRegistry<F::Uow>>,
        handlers: Arc<HandlerRegistry<F::Uow>>,
        factory: Arc<F>,
        clock: Arc<C>,
    ) -> Result<Self, RegistryError> {
        verify_consistency(&schemas, &preconditions, &handlers)?;
        Ok(Self {
            schemas,
            preconditions,
            handlers,
            factory,
            clock,
        })
    }

    /// Runs the full validation and dispatch state machine for one
    /// envelope.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::UnknownMessageType`] when no schema is
    ///   registered for the envelope's type name. Distinct from a syntax
    ///   rejection by construction.
    /// - [`DispatchError::UnitOfWork`] when the unit of work cannot be
    ///   opened, read, committed or rolled back.
    pub async fn dispatch(&self, envelope: &Envelope) -> DispatchResult {
        let type_name = envelope.type_name();
        let Some(schema) = self.schemas.get(type_name) else {
            return Err(DispatchError::UnknownMessageType(type_name.to_owned()));
        };
        tracing::debug!(type_name, kind = %schema.kind(), "dispatching message");

        let message = match validate_payload(schema, envelope.payload(), &*self.clock) {
            Ok(message) => message,
            Err(report) => {
                tracing::debug!(
                    type_name,
                    errors = report.len(),
                    "message rejected by syntax validation"
                );
                return Ok(Outcome::Rejected(report));
            }
        };

        let mut uow = self.factory.begin().await?;

        match self.evaluate_preconditions(&message, &uow).await {
            Ok(Gate::Clear) => {}
            Ok(Gate::Skipped(skip)) => {
                uow.rollback().await?;
                tracing::warn!(
                    type_name,
                    check = skip.check(),
                    reason = skip.reason(),
                    "message skipped"
                );
                return Ok(Outcome::Skipped(skip));
            }
            Ok(Gate::Blocked(rejection)) => {
                uow.rollback().await?;
                tracing::error!(
                    type_name,
                    check = rejection.check(),
                    kind = %rejection.kind(),
                    detail = rejection.detail(),
                    "message unprocessable"
                );
                return Ok(Outcome::Unprocessable(rejection));
            }
            Err(infrastructure) => {
                abandon(&mut uow).await;
                return Err(DispatchError::UnitOfWork(infrastructure));
            }
        }

        let reports = match schema.kind() {
            MessageKind::Command => {
                let Some(handler) = self.handlers.command(type_name) else {
                    // Construction verifies every command has a handler;
                    // guard the invariant rather than trusting it.
                    abandon(&mut uow).await;
                    return Err(DispatchError::UnknownMessageType(type_name.to_owned()));
                };
                let report = match handler.handle(&message, &mut uow).await {
                    Ok(output) => HandlerReport::success(handler.name(), output),
                    Err(error) => HandlerReport::failure(handler.name(), error),
                };
                vec![report]
            }
            MessageKind::Event => self.fan_out(&message, &mut uow).await,
        };

        finalize(uow, reports, type_name).await
    }

    /// Evaluates the type's preconditions in order, stopping at the first
    /// non-pass verdict.
    async fn evaluate_preconditions(
        &self,
        message: &TypedMessage,
        uow: &F::Uow,
    ) -> Result<Gate, UnitOfWorkError> {
        for check in self.preconditions.for_type(message.type_name()) {
            match check.check(message, uow).await? {
                Verdict::Pass => {}
                Verdict::Skip { reason } => {
                    return Ok(Gate::Skipped(Skip::new(check.name(), reason)));
                }
                Verdict::Unprocessable { kind, detail } => {
                    return Ok(Gate::Blocked(Unprocessable::new(check.name(), kind, detail)));
                }
            }
        }
        Ok(Gate::Clear)
    }

    /// Invokes every event handler in registration order, isolating
    /// failures so each handler is at least attempted.
    async fn fan_out(&self, message: &TypedMessage, uow: &mut F::Uow) -> Vec<HandlerReport> {
        let handlers = self.handlers.events(message.type_name());
        let mut reports = Vec::with_capacity(handlers.len());
        for handler in handlers {
            let report = match handler.handle(message, uow).await {
                Ok(()) => HandlerReport::success(handler.name(), None),
                Err(error) => HandlerReport::failure(handler.name(), error),
            };
            reports.push(report);
        }
        reports
    }
}

/// Commits when every invoked handler succeeded, rolls back otherwise.
async fn finalize<U: UnitOfWork>(
    mut uow: U,
    reports: Vec<HandlerReport>,
    type_name: &str,
) -> DispatchResult {
    if reports.iter().all(HandlerReport::succeeded) {
        uow.commit().await?;
        tracing::debug!(type_name, handlers = reports.len(), "dispatch committed");
        return Ok(Outcome::Dispatched(reports));
    }

    for report in reports.iter().filter(|report| !report.succeeded()) {
        if let Some(error) = report.error() {
            tracing::error!(
                type_name,
                handler = report.handler(),
                error = %error,
                "handler failed"
            );
        }
    }
    uow.rollback().await?;
    Ok(Outcome::Failed(reports))
}

/// Best-effort rollback on an already-failing path; the primary error
/// takes precedence, a secondary rollback failure is only logged.
async fn abandon<U: UnitOfWork>(uow: &mut U) {
    if let Err(rollback_error) = uow.rollback().await {
        tracing::error!(error = %rollback_error, "rollback after failure also failed");
    }
}

/// Verifies schemas, preconditions and handlers agree before freezing.
fn verify_consistency<U>(
    schemas: &SchemaRegistry,
    preconditions: &PreconditionRegistry<U>,
    handlers: &HandlerRegistry<U>,
) -> Result<(), RegistryError> {
    for schema in schemas.iter() {
        let type_name = schema.type_name();
        match schema.kind() {
            MessageKind::Command => {
                if handlers.command(type_name).is_none() {
                    return Err(RegistryError::MissingCommandHandler {
                        type_name: type_name.to_owned(),
                    });
                }
                if !handlers.events(type_name).is_empty() {
                    return Err(RegistryError::RoleMismatch {
                        type_name: type_name.to_owned(),
                        kind: MessageKind::Command,
                    });
                }
            }
            MessageKind::Event => {
                if handlers.command(type_name).is_some() {
                    return Err(RegistryError::RoleMismatch {
                        type_name: type_name.to_owned(),
                        kind: MessageKind::Event,
                    });
                }
            }
        }
    }

    let registered_names = handlers
        .command_types()
        .chain(handlers.event_types())
        .chain(preconditions.type_names());
    for type_name in registered_names {
        if !schemas.contains(type_name) {
            return Err(RegistryError::UnregisteredType {
                type_name: type_name.to_owned(),
            });
        }
    }

    Ok(())
}
