use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::create_task_request::CreateTaskRequest;
use crate::shared::validation::{check_date_order, required, required_text};
use crate::task_priority::TaskPriority;
use crate::task_status::TaskStatus;
use crate::update_task_request::UpdateTaskRequest;
use crate::EngineResult;

/// Back-reference to the owning project — the task-side half of the
/// denormalized association. Absent means unassigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRef {
    pub project_id: Uuid,
    pub project_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assigned_to: String,
    pub start_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_completed: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Tasks are created unassigned; the association engine links them to a
    /// project afterwards.
    pub fn new(request: CreateTaskRequest) -> EngineResult<Self> {
        let name = required_text("task name", request.name)?;
        let priority = required("priority", request.priority)?;
        let assigned_to = required_text("assignee", request.assigned_to)?;
        let start_date = required("start date", request.start_date)?;
        let due_date = required("end date", request.due_date)?;
        check_date_order(start_date, due_date)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description: request.description,
            status: TaskStatus::ToDo,
            priority,
            assigned_to,
            start_date,
            due_date,
            date_completed: None,
            project: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a full update. Status has its own transition below, and the
    /// project back-reference is only ever mutated by the association engine.
    pub fn apply_update(&mut self, request: UpdateTaskRequest, now: DateTime<Utc>) -> EngineResult<()> {
        let name = required_text("task name", request.name)?;
        let priority = required("priority", request.priority)?;
        let assigned_to = required_text("assignee", request.assigned_to)?;
        let start_date = required("start date", request.start_date)?;
        let due_date = required("end date", request.due_date)?;
        check_date_order(start_date, due_date)?;

        self.name = name;
        self.description = request.description;
        self.priority = priority;
        self.assigned_to = assigned_to;
        self.start_date = start_date;
        self.due_date = due_date;
        self.updated_at = now;
        Ok(())
    }

    /// Status transition with its side effects: done/closed stamp
    /// `dateCompleted`; moving back to to-do clears it and resets the
    /// scheduling window to today / tomorrow; every other status just
    /// clears `dateCompleted`.
    pub fn change_status(&mut self, status: TaskStatus, now: DateTime<Utc>) {
        self.status = status;
        if status.is_completed() {
            self.date_completed = Some(now);
        } else {
            self.date_completed = None;
            if status == TaskStatus::ToDo {
                self.start_date = now;
                self.due_date = now + Duration::days(1);
            }
        }
        self.updated_at = now;
    }

    pub fn is_assigned_to_project(&self, project_id: Uuid) -> bool {
        self.project
            .as_ref()
            .is_some_and(|p| p.project_id == project_id)
    }
}
