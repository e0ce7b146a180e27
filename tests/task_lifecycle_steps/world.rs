//! Shared world state for task board lifecycle BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::{
    board::{
        adapters::memory::{InMemoryTaskRepository, RecordingNotificationSink},
        domain::{CapabilitySet, DeliveryKind, MemberId, RolePolicy, TaskId},
        services::{ActionReport, DeliveryPolicy, NotificationDelivery, TaskBoard, TaskLifecycleService},
    },
    config::RoleConfig,
};

/// Board type used by the BDD world.
pub type TestBoard = TaskBoard<InMemoryTaskRepository, DefaultClock, RecordingNotificationSink>;

/// Scenario world for task board behaviour tests.
pub struct BoardWorld {
    pub board: TestBoard,
    pub sink: RecordingNotificationSink,
    pub policy: RolePolicy,
    pub roles: HashMap<MemberId, Vec<String>>,
    pub task_id: Option<TaskId>,
    pub last_report: Option<ActionReport>,
}

impl BoardWorld {
    /// Creates a world whose board delivers through `sink`.
    #[must_use]
    pub fn with_sink(sink: RecordingNotificationSink) -> Self {
        let board = TaskBoard::new(
            TaskLifecycleService::new(
                Arc::new(InMemoryTaskRepository::new()),
                Arc::new(DefaultClock),
            ),
            NotificationDelivery::new(Arc::new(sink.clone()), DeliveryPolicy::default()),
        );

        Self {
            board,
            sink,
            policy: RoleConfig::default().policy(),
            roles: HashMap::new(),
            task_id: None,
            last_report: None,
        }
    }

    /// Makes every direct message delivery fail from now on.
    pub fn fail_direct_messages(&mut self) {
        let sink = RecordingNotificationSink::new().failing(DeliveryKind::DirectMessage);
        *self = Self::with_sink(sink);
    }

    /// Returns the capabilities `member` currently holds.
    #[must_use]
    pub fn capabilities_of(&self, member: MemberId) -> CapabilitySet {
        self.roles
            .get(&member)
            .map_or_else(CapabilitySet::none, |roles| self.policy.capabilities_for(roles))
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::with_sink(RecordingNotificationSink::new())
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
