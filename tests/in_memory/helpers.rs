//! Shared test helpers for in-memory integration tests.

use mockable::DefaultClock;
use rstest::fixture;
use std::io;
use taskboard::board::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Capability, CapabilitySet, MemberId, Task},
};
use tokio::runtime::Runtime;

/// Member posting tasks in these tests.
pub const CREATOR: MemberId = MemberId::new(501);

/// Member claiming tasks in these tests.
pub const PUSHER: MemberId = MemberId::new(502);

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Provides a fresh in-memory repository for each test.
#[fixture]
pub fn repo() -> InMemoryTaskRepository {
    InMemoryTaskRepository::new()
}

/// Provides a clock for task timestamps.
#[fixture]
pub fn clock() -> DefaultClock {
    DefaultClock
}

/// Provides an open task posted by [`CREATOR`].
#[fixture]
pub fn open_task(clock: DefaultClock) -> Task {
    Task::create(
        "Hang the new shelves",
        None,
        CREATOR,
        CapabilitySet::none().with(Capability::CreateTask),
        &clock,
    )
    .expect("task creation")
}
