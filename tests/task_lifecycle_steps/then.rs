//! Then steps for task board lifecycle BDD scenarios.

use super::world::{BoardWorld, run_async};
use rstest_bdd_macros::then;
use taskboard::board::domain::{DeliveryKind, MemberId, Task, TaskState};

fn stored_task(world: &BoardWorld) -> Result<Task, eyre::Report> {
    let task_id = world
        .task_id
        .ok_or_else(|| eyre::eyre!("missing posted task in scenario world"))?;
    run_async(world.board.lifecycle().find_task(task_id))?
        .ok_or_else(|| eyre::eyre!("task {task_id} is not stored"))
}

#[then(r#"the task state is "{state}""#)]
fn task_state_is(world: &BoardWorld, state: String) -> Result<(), eyre::Report> {
    let expected = [TaskState::Open, TaskState::Claimed, TaskState::Resolved]
        .into_iter()
        .find(|candidate| candidate.as_str() == state)
        .ok_or_else(|| eyre::eyre!("invalid expected state in scenario: {state}"))?;
    let task = stored_task(world)?;

    if task.state() != expected {
        return Err(eyre::eyre!(
            "expected state {}, found {}",
            expected.as_str(),
            task.state().as_str()
        ));
    }
    Ok(())
}

#[then("the task is claimed by member {member:u64}")]
fn task_is_claimed_by(world: &BoardWorld, member: u64) -> Result<(), eyre::Report> {
    let task = stored_task(world)?;
    eyre::ensure!(
        task.claimant() == Some(MemberId::new(member)),
        "expected claimant {member}, found {:?}",
        task.claimant()
    );
    Ok(())
}

#[then(r#"the action is refused as "{kind}""#)]
fn action_is_refused_as(world: &BoardWorld, kind: String) -> Result<(), eyre::Report> {
    let report = world
        .last_report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing action report"))?;

    match report.outcome() {
        Err(error) if error.kind().as_str() == kind => Ok(()),
        other => Err(eyre::eyre!("expected refusal as {kind}, got {other:?}")),
    }
}

#[then("member {member:u64} receives a direct message")]
fn member_receives_direct_message(world: &BoardWorld, member: u64) -> Result<(), eyre::Report> {
    let recipient = Some(MemberId::new(member));
    let received = world.sink.delivered().iter().any(|intent| {
        intent.kind() == DeliveryKind::DirectMessage && intent.recipient() == recipient
    });
    eyre::ensure!(received, "member {member} received no direct message");
    Ok(())
}

#[then("exactly one resolution record is posted")]
fn one_resolution_record(world: &BoardWorld) -> Result<(), eyre::Report> {
    let records = world
        .sink
        .delivered()
        .iter()
        .filter(|intent| intent.kind() == DeliveryKind::PublicResolvedFeedPost)
        .count();
    eyre::ensure!(records == 1, "expected one resolution record, found {records}");
    Ok(())
}

#[then("the direct message is reported as undelivered")]
fn direct_message_undelivered(world: &BoardWorld) -> Result<(), eyre::Report> {
    let report = world
        .last_report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing action report"))?;
    let undelivered = report
        .delivery()
        .failures()
        .iter()
        .any(|failure| failure.kind() == DeliveryKind::DirectMessage);
    eyre::ensure!(undelivered, "direct message failure was not reported");
    Ok(())
}
