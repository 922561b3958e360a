//! Event fan-out: ordering, isolation and atomic rollback.

use super::helpers::{allocation_bus, flaky_order_bus, order_placed, runtime, store};
use eyre::ensure;
use rstest::rstest;
use std::io;
use std::sync::atomic::Ordering;
use tokio::runtime::Runtime;
use vestibule::adapters::memory::InMemoryStateStore;
use vestibule::domain::Outcome;

#[rstest]
fn events_fan_out_to_every_subscriber_in_order(
    runtime: io::Result<Runtime>,
    store: InMemoryStateStore,
) -> eyre::Result<()> {
    let rt = runtime?;
    let bus = allocation_bus(&store);

    let outcome = rt.block_on(bus.dispatch(&order_placed("o1")))?;

    let Outcome::Dispatched(reports) = &outcome else {
        eyre::bail!("expected dispatch, got {outcome:?}");
    };
    let names: Vec<&str> = reports.iter().map(|report| report.handler()).collect();
    assert_eq!(names, ["record-order", "audit-trail"]);
    ensure!(
        store.document("orders", "o1").is_some(),
        "order record should be committed"
    );
    ensure!(
        store.document("audit", "o1").is_some(),
        "audit entry should be committed"
    );
    Ok(())
}

#[rstest]
fn one_failing_subscriber_never_silences_the_others(
    runtime: io::Result<Runtime>,
    store: InMemoryStateStore,
) -> eyre::Result<()> {
    let rt = runtime?;
    let (bus, record_calls, audit_calls) = flaky_order_bus(&store);
    let before = store.snapshot();

    let outcome = rt.block_on(bus.dispatch(&order_placed("o1")))?;

    let Outcome::Failed(reports) = &outcome else {
        eyre::bail!("expected failure, got {outcome:?}");
    };
    let names: Vec<&str> = reports.iter().map(|report| report.handler()).collect();
    assert_eq!(names, ["record-order", "notify-billing", "audit-trail"]);
    let dispositions: Vec<bool> = reports.iter().map(|report| report.succeeded()).collect();
    assert_eq!(dispositions, [true, false, true]);

    // Every subscriber around the failure actually ran.
    assert_eq!(record_calls.load(Ordering::SeqCst), 1);
    assert_eq!(audit_calls.load(Ordering::SeqCst), 1);

    // One failure rolls the whole dispatch attempt back.
    assert_eq!(store.snapshot(), before);
    Ok(())
}

#[rstest]
fn repeated_events_reach_subscribers_each_time(
    runtime: io::Result<Runtime>,
    store: InMemoryStateStore,
) -> eyre::Result<()> {
    let rt = runtime?;
    let bus = allocation_bus(&store);

    let first = rt.block_on(bus.dispatch(&order_placed("o1")))?;
    let second = rt.block_on(bus.dispatch(&order_placed("o2")))?;

    ensure!(
        first.is_dispatched() && second.is_dispatched(),
        "events have no idempotency gate by default"
    );
    ensure!(
        store.document("orders", "o2").is_some(),
        "second order record should be committed"
    );
    Ok(())
}
