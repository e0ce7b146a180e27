//! Storage tests for [`InMemoryTaskRepository`].

use crate::in_memory::helpers::{PUSHER, clock, open_task, repo, runtime};
use mockable::DefaultClock;
use rstest::rstest;
use std::io;
use taskboard::board::{
    adapters::memory::InMemoryTaskRepository,
    domain::{CapabilitySet, Task, TaskId, TaskState},
    ports::{TaskRepository, TaskRepositoryError},
};
use tokio::runtime::Runtime;

/// Tests that stored tasks can be read back unchanged.
#[rstest]
fn stored_task_is_retrievable(
    runtime: io::Result<Runtime>,
    repo: InMemoryTaskRepository,
    open_task: Task,
) {
    let rt = runtime.expect("runtime creation");

    rt.block_on(repo.store(&open_task)).expect("store");
    let fetched = rt
        .block_on(repo.find_by_id(open_task.id()))
        .expect("lookup");

    assert_eq!(fetched, Some(open_task));
}

/// Tests that unknown identifiers yield `None` rather than an error.
#[rstest]
fn missing_task_is_none(runtime: io::Result<Runtime>, repo: InMemoryTaskRepository) {
    let rt = runtime.expect("runtime creation");

    let fetched = rt.block_on(repo.find_by_id(TaskId::new())).expect("lookup");

    assert_eq!(fetched, None);
}

/// Tests that storing the same task twice is rejected.
#[rstest]
fn duplicate_task_id_rejected(
    runtime: io::Result<Runtime>,
    repo: InMemoryTaskRepository,
    open_task: Task,
) {
    let rt = runtime.expect("runtime creation");
    rt.block_on(repo.store(&open_task)).expect("first store");

    let result = rt.block_on(repo.store(&open_task));

    assert!(
        matches!(result, Err(TaskRepositoryError::DuplicateTask(id)) if id == open_task.id()),
        "Should reject duplicate task ID"
    );
}

/// Tests that a conditional update applies when the stored state matches.
#[rstest]
fn update_applies_when_state_matches(
    runtime: io::Result<Runtime>,
    repo: InMemoryTaskRepository,
    clock: DefaultClock,
    open_task: Task,
) {
    let rt = runtime.expect("runtime creation");
    rt.block_on(repo.store(&open_task)).expect("store");
    let mut claimed = open_task.clone();
    claimed
        .claim(PUSHER, CapabilitySet::all(), &clock)
        .expect("claim");

    rt.block_on(repo.update_if_state(&claimed, TaskState::Open))
        .expect("conditional update");
    let fetched = rt
        .block_on(repo.find_by_id(open_task.id()))
        .expect("lookup");

    assert_eq!(fetched, Some(claimed));
}

/// Tests that a stale snapshot cannot overwrite a newer state.
#[rstest]
fn stale_update_reports_conflict(
    runtime: io::Result<Runtime>,
    repo: InMemoryTaskRepository,
    clock: DefaultClock,
    open_task: Task,
) {
    let rt = runtime.expect("runtime creation");
    rt.block_on(repo.store(&open_task)).expect("store");
    let mut first = open_task.clone();
    first
        .claim(PUSHER, CapabilitySet::all(), &clock)
        .expect("claim");
    rt.block_on(repo.update_if_state(&first, TaskState::Open))
        .expect("first update");

    let result = rt.block_on(repo.update_if_state(&first, TaskState::Open));

    assert!(
        matches!(
            result,
            Err(TaskRepositoryError::StateConflict {
                expected: TaskState::Open,
                actual: TaskState::Claimed,
                ..
            })
        ),
        "Should refuse to overwrite a task that moved on"
    );
}

/// Tests that conditional updates require an existing task.
#[rstest]
fn update_of_missing_task_is_not_found(
    runtime: io::Result<Runtime>,
    repo: InMemoryTaskRepository,
    open_task: Task,
) {
    let rt = runtime.expect("runtime creation");

    let result = rt.block_on(repo.update_if_state(&open_task, TaskState::Open));

    assert!(matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == open_task.id()));
}
