//! Command flow: validation, precondition gating and committed effects.

use super::helpers::{allocate, allocation_bus, create_product, runtime, store};
use eyre::ensure;
use rstest::rstest;
use serde_json::json;
use std::io;
use tokio::runtime::Runtime;
use vestibule::adapters::memory::InMemoryStateStore;
use vestibule::domain::Outcome;
use vestibule::error::UnprocessableKind;

#[rstest]
fn allocation_with_known_sku_and_sufficient_stock_dispatches(
    runtime: io::Result<Runtime>,
    store: InMemoryStateStore,
) -> eyre::Result<()> {
    let rt = runtime?;
    let bus = allocation_bus(&store);

    let created =
        rt.block_on(bus.dispatch(&create_product("TASTELESS-LAMP", "Tasteless lamp", 10)))?;
    ensure!(created.is_dispatched(), "product creation should dispatch");

    let outcome = rt.block_on(bus.dispatch(&allocate("o1", "TASTELESS-LAMP", 3)))?;
    ensure!(
        outcome.is_dispatched(),
        "allocation should dispatch, got {outcome:?}"
    );
    assert_eq!(
        outcome.command_output(),
        Some(&json!({
            "order_id": "o1",
            "sku": "TASTELESS-LAMP",
            "qty": 3,
            "remaining": 7
        }))
    );
    assert_eq!(
        store.document("allocations", "o1"),
        Some(json!({"order_id": "o1", "sku": "TASTELESS-LAMP", "qty": 3}))
    );
    let product = store
        .document("products", "TASTELESS-LAMP")
        .ok_or_else(|| eyre::eyre!("product should exist"))?;
    assert_eq!(product.get("stock"), Some(&json!(7)));
    Ok(())
}

#[rstest]
fn negative_quantity_is_rejected_with_field_detail(
    runtime: io::Result<Runtime>,
    store: InMemoryStateStore,
) -> eyre::Result<()> {
    let rt = runtime?;
    let bus = allocation_bus(&store);
    rt.block_on(bus.dispatch(&create_product("TASTELESS-LAMP", "Tasteless lamp", 10)))?;

    let outcome = rt.block_on(bus.dispatch(&allocate("o1", "TASTELESS-LAMP", -1)))?;

    let Outcome::Rejected(report) = &outcome else {
        eyre::bail!("expected rejection, got {outcome:?}");
    };
    let error = report
        .errors()
        .first()
        .ok_or_else(|| eyre::eyre!("report should carry one error"))?;
    assert_eq!(error.field(), Some("qty"));
    assert_eq!(error.reason(), "must be > 0");
    ensure!(
        store.document("allocations", "o1").is_none(),
        "a rejected allocation must not be stored"
    );
    Ok(())
}

#[rstest]
fn unknown_sku_is_unprocessable_not_found(
    runtime: io::Result<Runtime>,
    store: InMemoryStateStore,
) -> eyre::Result<()> {
    let rt = runtime?;
    let bus = allocation_bus(&store);

    let outcome = rt.block_on(bus.dispatch(&allocate("o1", "NONEXISTENT-SOFA", 3)))?;

    let Outcome::Unprocessable(rejection) = &outcome else {
        eyre::bail!("expected unprocessable, got {outcome:?}");
    };
    assert_eq!(rejection.kind(), UnprocessableKind::NotFound);
    assert_eq!(rejection.check(), "product-exists");
    ensure!(store.is_empty(), "nothing may be committed");
    Ok(())
}

#[rstest]
fn insufficient_stock_is_a_conflict(
    runtime: io::Result<Runtime>,
    store: InMemoryStateStore,
) -> eyre::Result<()> {
    let rt = runtime?;
    let bus = allocation_bus(&store);
    rt.block_on(bus.dispatch(&create_product("TASTELESS-LAMP", "Tasteless lamp", 2)))?;

    let outcome = rt.block_on(bus.dispatch(&allocate("o1", "TASTELESS-LAMP", 5)))?;

    let Outcome::Unprocessable(rejection) = &outcome else {
        eyre::bail!("expected unprocessable, got {outcome:?}");
    };
    assert_eq!(rejection.kind(), UnprocessableKind::Conflict);
    assert_eq!(rejection.check(), "stock-available");

    let product = store
        .document("products", "TASTELESS-LAMP")
        .ok_or_else(|| eyre::eyre!("product should exist"))?;
    assert_eq!(product.get("stock"), Some(&json!(2)));
    Ok(())
}

#[rstest]
fn successive_allocations_decrement_stock_in_turn(
    runtime: io::Result<Runtime>,
    store: InMemoryStateStore,
) -> eyre::Result<()> {
    let rt = runtime?;
    let bus = allocation_bus(&store);
    rt.block_on(bus.dispatch(&create_product("TASTELESS-LAMP", "Tasteless lamp", 10)))?;

    let first = rt.block_on(bus.dispatch(&allocate("o1", "TASTELESS-LAMP", 3)))?;
    let second = rt.block_on(bus.dispatch(&allocate("o2", "TASTELESS-LAMP", 4)))?;
    ensure!(first.is_dispatched() && second.is_dispatched(), "both allocations dispatch");

    let product = store
        .document("products", "TASTELESS-LAMP")
        .ok_or_else(|| eyre::eyre!("product should exist"))?;
    assert_eq!(product.get("stock"), Some(&json!(3)));
    ensure!(store.document("allocations", "o2").is_some(), "second allocation stored");
    Ok(())
}
