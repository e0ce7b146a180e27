//! When steps for task board lifecycle BDD scenarios.

use super::world::{BoardWorld, run_async};
use rstest_bdd_macros::when;
use taskboard::board::{
    domain::{MemberId, TaskId},
    services::{BoardAction, ClaimTaskRequest, CreateTaskRequest, ResolveTaskRequest},
};

fn post(world: &mut BoardWorld, request: CreateTaskRequest) {
    let report = run_async(world.board.handle(BoardAction::Create(request)));
    if let Ok(task) = report.outcome() {
        world.task_id = Some(task.id());
    }
    world.last_report = Some(report);
}

fn current_task(world: &BoardWorld) -> Result<TaskId, eyre::Report> {
    world
        .task_id
        .ok_or_else(|| eyre::eyre!("missing posted task in scenario world"))
}

#[when(r#"member {member:u64} posts the task "{description}""#)]
fn member_posts_task(world: &mut BoardWorld, member: u64, description: String) {
    let creator = MemberId::new(member);
    let request = CreateTaskRequest::new(description, creator, world.capabilities_of(creator));
    post(world, request);
}

#[when(r#"member {member:u64} posts the priced task "{description}" for "{price}""#)]
fn member_posts_priced_task(
    world: &mut BoardWorld,
    member: u64,
    description: String,
    price: String,
) {
    let creator = MemberId::new(member);
    let request = CreateTaskRequest::new(description, creator, world.capabilities_of(creator))
        .with_price(price);
    post(world, request);
}

#[when("member {member:u64} claims the task")]
fn member_claims_task(world: &mut BoardWorld, member: u64) -> Result<(), eyre::Report> {
    let task_id = current_task(world)?;
    let actor = MemberId::new(member);
    let request = ClaimTaskRequest::new(task_id, actor, world.capabilities_of(actor));
    world.last_report = Some(run_async(world.board.handle(BoardAction::Claim(request))));
    Ok(())
}

#[when("member {member:u64} resolves the task")]
fn member_resolves_task(world: &mut BoardWorld, member: u64) -> Result<(), eyre::Report> {
    let task_id = current_task(world)?;
    let request = ResolveTaskRequest::new(task_id, MemberId::new(member));
    world.last_report = Some(run_async(world.board.handle(BoardAction::Resolve(request))));
    Ok(())
}
