//! Structural validation failures and unknown message types.

use super::helpers::{allocation_bus, create_product, runtime, store};
use eyre::ensure;
use rstest::rstest;
use serde_json::json;
use std::io;
use tokio::runtime::Runtime;
use vestibule::adapters::memory::InMemoryStateStore;
use vestibule::domain::{Envelope, Outcome};
use vestibule::error::{DispatchError, SyntaxError};

#[rstest]
fn every_missing_required_field_is_named(
    runtime: io::Result<Runtime>,
    store: InMemoryStateStore,
) -> eyre::Result<()> {
    let rt = runtime?;
    let bus = allocation_bus(&store);

    let outcome = rt.block_on(bus.dispatch(&Envelope::new(
        "Allocate",
        json!({"sku": "TASTELESS-LAMP"}),
    )))?;

    let Outcome::Rejected(report) = &outcome else {
        eyre::bail!("expected rejection, got {outcome:?}");
    };
    assert_eq!(report.len(), 2);
    ensure!(report.concerns_field("order_id"), "order_id should be named");
    ensure!(report.concerns_field("qty"), "qty should be named");
    ensure!(store.is_empty(), "nothing may be committed");
    Ok(())
}

#[rstest]
fn coercion_failures_name_the_expected_kind(
    runtime: io::Result<Runtime>,
    store: InMemoryStateStore,
) -> eyre::Result<()> {
    let rt = runtime?;
    let bus = allocation_bus(&store);

    let outcome = rt.block_on(bus.dispatch(&Envelope::new(
        "Allocate",
        json!({"order_id": "o1", "sku": "TASTELESS-LAMP", "qty": "plenty"}),
    )))?;

    let Outcome::Rejected(report) = &outcome else {
        eyre::bail!("expected rejection, got {outcome:?}");
    };
    let error = report
        .errors()
        .first()
        .ok_or_else(|| eyre::eyre!("report should carry one error"))?;
    assert_eq!(error.field(), Some("qty"));
    assert_eq!(error.reason(), "must be an integer");
    ensure!(store.is_empty(), "nothing may be committed");
    Ok(())
}

#[rstest]
fn rejected_messages_never_reach_state(
    runtime: io::Result<Runtime>,
    store: InMemoryStateStore,
) -> eyre::Result<()> {
    let rt = runtime?;
    let bus = allocation_bus(&store);

    let outcome = rt.block_on(bus.dispatch(&create_product("TASTELESS-LAMP", "Lamp", -1)))?;

    let Outcome::Rejected(report) = &outcome else {
        eyre::bail!("expected rejection, got {outcome:?}");
    };
    let error = report
        .errors()
        .first()
        .ok_or_else(|| eyre::eyre!("report should carry one error"))?;
    assert_eq!(error.field(), Some("stock"));
    assert_eq!(error.reason(), "must be >= 0");
    ensure!(store.is_empty(), "rejected creation must not be stored");
    Ok(())
}

#[rstest]
fn non_object_payloads_are_rejected_structurally(
    runtime: io::Result<Runtime>,
    store: InMemoryStateStore,
) -> eyre::Result<()> {
    let rt = runtime?;
    let bus = allocation_bus(&store);

    let outcome =
        rt.block_on(bus.dispatch(&Envelope::new("Allocate", json!("not an object"))))?;

    let Outcome::Rejected(report) = &outcome else {
        eyre::bail!("expected rejection, got {outcome:?}");
    };
    ensure!(
        matches!(report.errors(), [SyntaxError::PayloadNotObject]),
        "expected a payload-shape failure"
    );
    ensure!(store.is_empty(), "nothing may be committed");
    Ok(())
}

#[rstest]
fn unknown_message_types_are_never_conflated_with_syntax_errors(
    runtime: io::Result<Runtime>,
    store: InMemoryStateStore,
) -> eyre::Result<()> {
    let rt = runtime?;
    let bus = allocation_bus(&store);

    let result = rt.block_on(bus.dispatch(&Envelope::new("Deallocate", json!({}))));

    ensure!(
        matches!(
            result,
            Err(DispatchError::UnknownMessageType(ref type_name)) if type_name == "Deallocate"
        ),
        "unknown type should surface on the error side"
    );
    ensure!(store.is_empty(), "nothing may be committed");
    Ok(())
}
