//! Given steps for task board lifecycle BDD scenarios.

use super::world::BoardWorld;
use rstest_bdd_macros::given;
use taskboard::board::domain::MemberId;

#[given("a task board")]
fn a_task_board(world: &mut BoardWorld) {
    *world = BoardWorld::default();
}

#[given("a task board where direct messages fail")]
fn a_board_where_direct_messages_fail(world: &mut BoardWorld) {
    world.fail_direct_messages();
}

#[given(r#"member {member:u64} holds the roles "{roles}""#)]
fn member_holds_roles(world: &mut BoardWorld, member: u64, roles: String) {
    let parsed = roles
        .split(',')
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    world.roles.insert(MemberId::new(member), parsed);
}
