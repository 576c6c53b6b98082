use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::data_access::repository::{Repository, StoreResult};
use crate::project::{Project, TaskRef};
use crate::task::{ProjectRef, Task};

/// In-memory store adapter with the same contract as [`DataContext`].
/// The engine unit tests run against this instead of a database file.
///
/// [`DataContext`]: crate::data_access::data_context::DataContext
#[derive(Clone, Default)]
pub struct MemoryContext {
    inner: Arc<RwLock<Collections>>,
}

#[derive(Default)]
struct Collections {
    projects: HashMap<Uuid, Project>,
    tasks: HashMap<Uuid, Task>,
}

impl MemoryContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Collections> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Collections> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Repository for MemoryContext {
    fn insert_project(&self, project: &Project) -> StoreResult<()> {
        self.write().projects.insert(project.id, project.clone());
        Ok(())
    }

    fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(self.read().projects.get(&id).cloned())
    }

    fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let mut projects: Vec<Project> = self.read().projects.values().cloned().collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(projects)
    }

    fn update_project(&self, project: &Project) -> StoreResult<u64> {
        let mut inner = self.write();
        match inner.projects.get_mut(&project.id) {
            Some(doc) => {
                *doc = project.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_project(&self, id: Uuid) -> StoreResult<u64> {
        Ok(self.write().projects.remove(&id).map_or(0, |_| 1))
    }

    fn push_task_ref(&self, project_id: Uuid, entry: TaskRef) -> StoreResult<u64> {
        let mut inner = self.write();
        match inner.projects.get_mut(&project_id) {
            Some(project) => {
                project.tasks.push(entry);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn pull_task_ref(&self, project_id: Uuid, task_id: Uuid) -> StoreResult<u64> {
        let mut inner = self.write();
        match inner.projects.get_mut(&project_id) {
            Some(project) => {
                let before = project.tasks.len();
                project.tasks.retain(|entry| entry.task_id != task_id);
                Ok(if project.tasks.len() != before { 1 } else { 0 })
            }
            None => Ok(0),
        }
    }

    fn insert_task(&self, task: &Task) -> StoreResult<()> {
        self.write().tasks.insert(task.id, task.clone());
        Ok(())
    }

    fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(self.read().tasks.get(&id).cloned())
    }

    fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self.read().tasks.values().cloned().collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(tasks)
    }

    fn update_task(&self, task: &Task) -> StoreResult<u64> {
        let mut inner = self.write();
        match inner.tasks.get_mut(&task.id) {
            Some(doc) => {
                *doc = task.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_task(&self, id: Uuid) -> StoreResult<u64> {
        Ok(self.write().tasks.remove(&id).map_or(0, |_| 1))
    }

    fn set_task_project(
        &self,
        task_id: Uuid,
        project: Option<ProjectRef>,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<u64> {
        let mut inner = self.write();
        match inner.tasks.get_mut(&task_id) {
            Some(task) => {
                task.project = project;
                task.updated_at = updated_at;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
