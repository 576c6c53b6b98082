use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::project::{Project, TaskRef};
use crate::task::{ProjectRef, Task};
use crate::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Typed accessors over the two document collections.
///
/// The engines are written against this trait so the unit tests can run on
/// the in-memory adapter while production uses redb. Mutating methods return
/// the number of documents they touched: the association engine treats a
/// zero-modified write inside a paired sequence as a failed association.
pub trait Repository {
    // Projects
    fn insert_project(&self, project: &Project) -> StoreResult<()>;
    fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>>;
    fn list_projects(&self) -> StoreResult<Vec<Project>>;
    fn update_project(&self, project: &Project) -> StoreResult<u64>;
    fn delete_project(&self, id: Uuid) -> StoreResult<u64>;
    /// Appends a task reference to the project's `tasks` list.
    fn push_task_ref(&self, project_id: Uuid, entry: TaskRef) -> StoreResult<u64>;
    /// Removes every reference to `task_id` from the project's `tasks` list.
    fn pull_task_ref(&self, project_id: Uuid, task_id: Uuid) -> StoreResult<u64>;

    // Tasks
    fn insert_task(&self, task: &Task) -> StoreResult<()>;
    fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;
    fn list_tasks(&self) -> StoreResult<Vec<Task>>;
    fn update_task(&self, task: &Task) -> StoreResult<u64>;
    fn delete_task(&self, id: Uuid) -> StoreResult<u64>;
    /// Overwrites the task's project back-reference and stamps `updatedAt`.
    fn set_task_project(
        &self,
        task_id: Uuid,
        project: Option<ProjectRef>,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<u64>;

    fn project_exists(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.find_project(id)?.is_some())
    }
}
