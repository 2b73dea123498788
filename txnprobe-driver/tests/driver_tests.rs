//! Tests for the driver contract.
//!
//! These tests validate the transaction bookkeeping every driver must honor
//! and can be used to test any driver implementation.

use serde_json::json;
use txnprobe_core::{SessionId, SessionOptions};
use txnprobe_driver::backends::MemoryDriver;
use txnprobe_driver::{Driver, DriverError, DriverResult, Filter, Namespace, ProbeCommand, SessionContext};

/// A test harness trait for testing driver implementations.
///
/// Implementors provide a driver plus a way to act as another client on a
/// session, which the contract tests need to set up server-side state.
pub trait TestHarness {
    /// The driver type being tested.
    type Driver: Driver;

    /// Create a new driver for testing.
    fn create_driver() -> DriverResult<Self::Driver>;

    /// Start transaction `number` on session `id` from another client.
    fn begin_elsewhere(driver: &Self::Driver, id: SessionId, number: i64) -> DriverResult<()>;

    /// Seed a document into `namespace`.
    fn seed(driver: &Self::Driver, namespace: &Namespace, document: serde_json::Value) -> DriverResult<()>;
}

/// Run the standard test suite against a driver.
pub fn run_test_suite<H: TestHarness>() {
    test_first_message_starts_transaction::<H>();
    test_continuing_unknown_transaction_fails::<H>();
    test_stale_number_is_reported::<H>();
    test_unsatisfiable_update_modifies_nothing::<H>();
}

fn ns() -> Namespace {
    Namespace::new("__txnprobe", "probe")
}

fn session<H: TestHarness>(
    driver: &H::Driver,
    id: SessionId,
    number: i64,
) -> SessionContext<<H::Driver as Driver>::Handle> {
    let mut ctx = driver.create_session(id, &SessionOptions::transacted()).expect("failed to create session");
    assert_eq!(ctx.transaction_number(), 0);
    ctx.advance_transaction_number(number);
    ctx.start_transaction().expect("failed to start transaction");
    ctx
}

fn test_first_message_starts_transaction<H: TestHarness>() {
    let driver = H::create_driver().expect("failed to create driver");
    let id = SessionId::random();

    let mut ctx = session::<H>(&driver, id, 1);
    driver.execute(&ctx, &ProbeCommand::find(ns(), "_id", 1)).expect("first message starts");

    // Continuing the transaction it started succeeds.
    ctx.set_message_sent_in_current_transaction(true);
    driver.execute(&ctx, &ProbeCommand::find(ns(), "_id", 1)).expect("continuation succeeds");
}

fn test_continuing_unknown_transaction_fails<H: TestHarness>() {
    let driver = H::create_driver().expect("failed to create driver");
    let mut ctx = session::<H>(&driver, SessionId::random(), 1);
    ctx.set_message_sent_in_current_transaction(true);

    let err = driver.execute(&ctx, &ProbeCommand::find(ns(), "_id", 1)).expect_err("must fail");
    let server = err.as_server_error().expect("server error");
    assert_eq!(server.code, 251);
    assert!(server.message.contains("Given transaction number 1 does not match any in-progress transactions"));
}

fn test_stale_number_is_reported<H: TestHarness>() {
    let driver = H::create_driver().expect("failed to create driver");
    let id = SessionId::random();
    H::begin_elsewhere(&driver, id, 8).expect("failed to begin elsewhere");

    let mut ctx = session::<H>(&driver, id, 1);
    ctx.set_message_sent_in_current_transaction(true);
    let err = driver.execute(&ctx, &ProbeCommand::find(ns(), "_id", 1)).expect_err("must fail");
    assert!(matches!(
        err,
        DriverError::Server(ref e) if e.code == 225 && e.message.contains("newer transaction 8 has already started")
    ));
}

fn test_unsatisfiable_update_modifies_nothing<H: TestHarness>() {
    let driver = H::create_driver().expect("failed to create driver");
    H::seed(&driver, &ns(), json!({"_id": 1, "a": 0})).expect("failed to seed");

    let ctx = session::<H>(&driver, SessionId::random(), 1);
    let reply = driver
        .execute(&ctx, &ProbeCommand::update_one(ns(), Filter::missing("_id"), "a", json!(1)))
        .expect("update succeeds");
    assert_eq!(reply.matched, 0);
    assert_eq!(reply.modified, 0);
}

// ============================================================================
// Memory backend
// ============================================================================

struct MemoryHarness;

impl TestHarness for MemoryHarness {
    type Driver = MemoryDriver;

    fn create_driver() -> DriverResult<Self::Driver> {
        Ok(MemoryDriver::new())
    }

    fn begin_elsewhere(driver: &Self::Driver, id: SessionId, number: i64) -> DriverResult<()> {
        driver.begin_transaction(id, number)
    }

    fn seed(driver: &Self::Driver, namespace: &Namespace, document: serde_json::Value) -> DriverResult<()> {
        driver.insert(namespace, document)
    }
}

#[test]
fn test_memory_driver_compliance() {
    run_test_suite::<MemoryHarness>();
}

#[test]
fn test_memory_driver_leaves_documents_untouched() {
    let driver = MemoryDriver::new();
    driver.insert(&ns(), json!({"_id": 1, "a": 0})).expect("insert");

    let ctx = session::<MemoryHarness>(&driver, SessionId::random(), 1);
    driver
        .execute(&ctx, &ProbeCommand::update_one(ns(), Filter::missing("_id"), "a", json!(1)))
        .expect("update succeeds");

    assert_eq!(driver.documents(&ns()).expect("documents"), vec![json!({"_id": 1, "a": 0})]);
}
