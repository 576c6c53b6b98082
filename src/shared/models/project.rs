use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::create_project_request::CreateProjectRequest;
use crate::project_status::ProjectStatus;
use crate::shared::validation::{check_date_order, required, required_text};
use crate::update_project_request::UpdateProjectRequest;
use crate::EngineResult;

/// Lightweight reference to a task carried on its project — the project-side
/// half of the denormalized association.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRef {
    pub task_id: Uuid,
    pub task_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub start_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    /// Tasks currently assigned to this project, in assignment order.
    #[serde(default)]
    pub tasks: Vec<TaskRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(request: CreateProjectRequest) -> EngineResult<Self> {
        let name = required_text("project name", request.name)?;
        let start_date = required("start date", request.start_date)?;
        let due_date = required("end date", request.due_date)?;
        check_date_order(start_date, due_date)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description: request.description,
            status: ProjectStatus::Started,
            start_date,
            due_date,
            tasks: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a full update. The `tasks` list is deliberately untouched —
    /// only the association engine mutates it.
    pub fn apply_update(&mut self, request: UpdateProjectRequest, now: DateTime<Utc>) -> EngineResult<()> {
        let name = required_text("project name", request.name)?;
        let status = required("project status", request.status)?;
        let start_date = required("start date", request.start_date)?;
        let due_date = required("end date", request.due_date)?;
        check_date_order(start_date, due_date)?;

        self.name = name;
        self.description = request.description;
        self.status = status;
        self.start_date = start_date;
        self.due_date = due_date;
        self.updated_at = now;
        Ok(())
    }

    pub fn contains_task(&self, task_id: Uuid) -> bool {
        self.tasks.iter().any(|entry| entry.task_id == task_id)
    }
}
