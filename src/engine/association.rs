use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::data_access::repository::Repository;
use crate::engine::locks::TaskLockMap;
use crate::project::TaskRef;
use crate::shared::validation::parse_id;
use crate::task::ProjectRef;
use crate::{EngineError, EngineResult};

/// Maintains the denormalized task–project association.
///
/// Every mutation writes both sides of the link: the `project` back-reference
/// on the task and the `tasks` entry on the project. There is no
/// cross-collection transaction underneath, so a write that reports zero
/// documents modified surfaces as `AssociationWriteFailed` instead of being
/// ignored. Mutations for the same task are serialized through
/// [`TaskLockMap`].
pub struct AssociationEngine<R> {
    repo: R,
    locks: TaskLockMap,
}

impl<R: Repository> AssociationEngine<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            locks: TaskLockMap::new(),
        }
    }

    /// Links a task to a project. Fails with `AlreadyAssigned` when the task
    /// already points at this project. A task assigned elsewhere is
    /// reassigned: its entry is pulled from the previous project so the two
    /// collections keep agreeing about membership.
    pub fn assign_task(&self, task_id: &str, project_id: &str) -> EngineResult<()> {
        let task_id = parse_id("task", task_id)?;
        let project_id = parse_id("project", project_id)?;
        let _guard = self.locks.lock(task_id);

        let task = self
            .repo
            .find_task(task_id)?
            .ok_or_else(|| EngineError::not_found("task", task_id))?;
        let project = self
            .repo
            .find_project(project_id)?
            .ok_or_else(|| EngineError::not_found("project", project_id))?;

        if task.is_assigned_to_project(project_id) {
            return Err(EngineError::AlreadyAssigned {
                task_id,
                project_id,
            });
        }
        let previous = task.project.as_ref().map(|p| p.project_id);

        let now = Utc::now();
        let pushed = self.repo.push_task_ref(
            project_id,
            TaskRef {
                task_id,
                task_name: task.name.clone(),
            },
        )?;
        if pushed == 0 {
            return Err(EngineError::AssociationWriteFailed {
                entity: "project",
                id: project_id,
            });
        }

        if let Some(previous_id) = previous {
            // Drop the stale entry; the previous project may already have
            // been deleted, which is not an error here.
            self.repo.pull_task_ref(previous_id, task_id)?;
        }

        let set = self.repo.set_task_project(
            task_id,
            Some(ProjectRef {
                project_id,
                project_name: project.name.clone(),
            }),
            now,
        )?;
        if set == 0 {
            return Err(EngineError::AssociationWriteFailed {
                entity: "task",
                id: task_id,
            });
        }

        info!(%task_id, %project_id, "task assigned to project");
        Ok(())
    }

    /// Moves a task from one project to another. The destination push runs
    /// before the source pull, so a partial failure leaves the task visible
    /// in too many projects rather than in none.
    pub fn move_task(
        &self,
        task_id: &str,
        source_project_id: &str,
        destination_project_id: &str,
    ) -> EngineResult<()> {
        let task_id = parse_id("task", task_id)?;
        let source_id = parse_id("source project", source_project_id)?;
        let destination_id = parse_id("destination project", destination_project_id)?;
        let _guard = self.locks.lock(task_id);

        let task = self
            .repo
            .find_task(task_id)?
            .ok_or_else(|| EngineError::not_found("task", task_id))?;
        self.repo
            .find_project(source_id)?
            .ok_or_else(|| EngineError::not_found("source project", source_id))?;
        let destination = self
            .repo
            .find_project(destination_id)?
            .ok_or_else(|| EngineError::not_found("destination project", destination_id))?;

        // A task that is unassigned, or assigned to some other project, is
        // not in the declared source.
        if !task.is_assigned_to_project(source_id) {
            return Err(EngineError::NotInSourceProject {
                task_id,
                project_id: source_id,
            });
        }
        if task.is_assigned_to_project(destination_id) {
            return Err(EngineError::AlreadyAssigned {
                task_id,
                project_id: destination_id,
            });
        }

        let now = Utc::now();
        let pushed = self.repo.push_task_ref(
            destination_id,
            TaskRef {
                task_id,
                task_name: task.name.clone(),
            },
        )?;
        if pushed == 0 {
            return Err(EngineError::AssociationWriteFailed {
                entity: "project",
                id: destination_id,
            });
        }

        let pulled = self.repo.pull_task_ref(source_id, task_id)?;
        if pulled == 0 {
            return Err(EngineError::AssociationWriteFailed {
                entity: "project",
                id: source_id,
            });
        }

        let set = self.repo.set_task_project(
            task_id,
            Some(ProjectRef {
                project_id: destination_id,
                project_name: destination.name.clone(),
            }),
            now,
        )?;
        if set == 0 {
            return Err(EngineError::AssociationWriteFailed {
                entity: "task",
                id: task_id,
            });
        }

        info!(%task_id, %source_id, %destination_id, "task moved between projects");
        Ok(())
    }

    /// Deletes a project after unassigning every task that references it, so
    /// no task is left pointing at a project that no longer exists.
    pub fn delete_project(&self, project_id: &str) -> EngineResult<()> {
        let project_id = parse_id("project", project_id)?;

        self.repo
            .find_project(project_id)?
            .ok_or_else(|| EngineError::not_found("project", project_id))?;

        let now = Utc::now();
        for task in self.repo.list_tasks()? {
            if !task.is_assigned_to_project(project_id) {
                continue;
            }
            let _guard = self.locks.lock(task.id);
            // The scan ran before this lock was held, so re-read: the task
            // may have been moved elsewhere or deleted in the meantime, and
            // nulling its reference then would desync the other project.
            if let Some(current) = self.repo.find_task(task.id)? {
                if current.is_assigned_to_project(project_id) {
                    self.repo.set_task_project(task.id, None, now)?;
                }
            }
        }

        let deleted = self.repo.delete_project(project_id)?;
        if deleted == 0 {
            return Err(EngineError::not_found("project", project_id));
        }

        info!(%project_id, "project deleted, tasks unassigned");
        Ok(())
    }

    /// Deletes a task, pulling its entry from the owning project first so
    /// the project's task list does not keep a dangling reference.
    pub fn delete_task(&self, task_id: &str) -> EngineResult<()> {
        let task_id = parse_id("task", task_id)?;
        let _guard = self.locks.lock(task_id);

        let task = self
            .repo
            .find_task(task_id)?
            .ok_or_else(|| EngineError::not_found("task", task_id))?;

        if let Some(project_ref) = &task.project {
            self.repo.pull_task_ref(project_ref.project_id, task_id)?;
        }

        let deleted = self.repo.delete_task(task_id)?;
        if deleted == 0 {
            return Err(EngineError::not_found("task", task_id));
        }

        info!(%task_id, "task deleted");
        Ok(())
    }
}
