//! Service layer for task creation, claiming and resolution.

use crate::board::{
    domain::{CapabilitySet, MemberId, Task, TaskDomainError, TaskId, TaskState},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;

use super::error::{TaskBoardError, TaskBoardResult};

/// Request payload for posting a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    description: String,
    price: Option<String>,
    creator: MemberId,
    capabilities: CapabilitySet,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        creator: MemberId,
        capabilities: CapabilitySet,
    ) -> Self {
        Self {
            description: description.into(),
            price: None,
            creator,
            capabilities,
        }
    }

    /// Sets the free-text price annotation.
    #[must_use]
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    /// Returns the member posting the task.
    #[must_use]
    pub const fn creator(&self) -> MemberId {
        self.creator
    }
}

/// Request payload for claiming an open task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimTaskRequest {
    task_id: TaskId,
    actor: MemberId,
    capabilities: CapabilitySet,
}

impl ClaimTaskRequest {
    /// Creates a claim request.
    #[must_use]
    pub const fn new(task_id: TaskId, actor: MemberId, capabilities: CapabilitySet) -> Self {
        Self {
            task_id,
            actor,
            capabilities,
        }
    }

    /// Returns the claimed task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the member claiming the task.
    #[must_use]
    pub const fn actor(&self) -> MemberId {
        self.actor
    }
}

/// Request payload for resolving a claimed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveTaskRequest {
    task_id: TaskId,
    actor: MemberId,
    actor_name: Option<String>,
}

impl ResolveTaskRequest {
    /// Creates a resolve request.
    #[must_use]
    pub const fn new(task_id: TaskId, actor: MemberId) -> Self {
        Self {
            task_id,
            actor,
            actor_name: None,
        }
    }

    /// Sets the display name used when telling the creator who resolved the
    /// task.
    #[must_use]
    pub fn with_actor_name(mut self, name: impl Into<String>) -> Self {
        self.actor_name = Some(name.into());
        self
    }

    /// Returns the resolved task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the member resolving the task.
    #[must_use]
    pub const fn actor(&self) -> MemberId {
        self.actor
    }

    /// Returns the actor's display name, if supplied.
    #[must_use]
    pub fn actor_name(&self) -> Option<&str> {
        self.actor_name.as_deref()
    }
}

/// Task lifecycle orchestration service.
///
/// Each transition loads the task, applies the domain guard, and commits with
/// a compare-and-set on the state it read. A writer that loses the race sees
/// the same invalid-transition error as one that arrived late.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Posts a new open task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Domain`] when the description is blank or
    /// the creator may not post tasks, and [`TaskBoardError::Repository`]
    /// when the task cannot be stored.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskBoardResult<Task> {
        let task = Task::create(
            request.description,
            request.price,
            request.creator,
            request.capabilities,
            &*self.clock,
        )?;
        self.repository.store(&task).await?;
        tracing::info!(task_id = %task.id(), creator = %task.creator(), "task created");
        Ok(task)
    }

    /// Claims an open task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::TaskNotFound`] for unknown tasks and
    /// [`TaskBoardError::Domain`] when the task is not open or the actor may
    /// not claim tasks.
    pub async fn claim_task(&self, request: ClaimTaskRequest) -> TaskBoardResult<Task> {
        let mut task = self.load(request.task_id).await?;
        let observed = task.state();
        task.claim(request.actor, request.capabilities, &*self.clock)?;
        self.commit(&task, observed).await?;
        tracing::info!(task_id = %task.id(), claimant = %request.actor, "task claimed");
        Ok(task)
    }

    /// Resolves a claimed task on behalf of its claimant.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::TaskNotFound`] for unknown tasks and
    /// [`TaskBoardError::Domain`] when the task is not claimed or the actor is
    /// not the claimant.
    pub async fn resolve_task(&self, request: &ResolveTaskRequest) -> TaskBoardResult<Task> {
        let mut task = self.load(request.task_id).await?;
        let observed = task.state();
        task.resolve(request.actor, &*self.clock)?;
        self.commit(&task, observed).await?;
        tracing::info!(task_id = %task.id(), claimant = %request.actor, "task resolved");
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Repository`] when the lookup fails.
    pub async fn find_task(&self, task_id: TaskId) -> TaskBoardResult<Option<Task>> {
        Ok(self.repository.find_by_id(task_id).await?)
    }

    async fn load(&self, task_id: TaskId) -> TaskBoardResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskBoardError::TaskNotFound(task_id))
    }

    async fn commit(&self, task: &Task, observed: TaskState) -> TaskBoardResult<()> {
        match self.repository.update_if_state(task, observed).await {
            Ok(()) => Ok(()),
            Err(TaskRepositoryError::StateConflict {
                task_id, actual, ..
            }) => Err(TaskDomainError::InvalidStateTransition {
                task_id,
                from: actual,
                to: task.state(),
            }
            .into()),
            Err(err) => Err(err.into()),
        }
    }
}
