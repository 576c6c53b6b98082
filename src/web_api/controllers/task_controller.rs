use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use crate::data_access::repository::Repository;
use crate::shared::validation::{parse_id, required, required_text};
use crate::{
    app_state::SharedState, change_task_status_request::ChangeTaskStatusRequest,
    create_task_request::CreateTaskRequest, name_query::NameQuery, task::Task,
    update_task_request::UpdateTaskRequest, EngineError, EngineResult,
};

pub struct TaskController {}

impl TaskController {
    pub async fn create(
        State(state): State<SharedState>,
        Json(body): Json<CreateTaskRequest>,
    ) -> EngineResult<(StatusCode, Json<Task>)> {
        let task = Task::new(body)?;
        state.data_context.insert_task(&task)?;
        tracing::info!(task_id = %task.id, "task created");
        Ok((StatusCode::CREATED, Json(task)))
    }

    pub async fn get_all(State(state): State<SharedState>) -> EngineResult<Json<Vec<Task>>> {
        Ok(Json(state.data_context.list_tasks()?))
    }

    pub async fn get_by_project(
        State(state): State<SharedState>,
        Path(id): Path<String>,
    ) -> EngineResult<Json<Vec<Task>>> {
        let project_id = parse_id("project", &id)?;
        if !state.data_context.project_exists(project_id)? {
            return Err(EngineError::not_found("project", project_id));
        }
        let tasks = state
            .data_context
            .list_tasks()?
            .into_iter()
            .filter(|task| task.is_assigned_to_project(project_id))
            .collect();
        Ok(Json(tasks))
    }

    pub async fn update(
        State(state): State<SharedState>,
        Path(id): Path<String>,
        Json(body): Json<UpdateTaskRequest>,
    ) -> EngineResult<Json<Task>> {
        let task_id = parse_id("task", &id)?;
        let mut task = state
            .data_context
            .find_task(task_id)?
            .ok_or_else(|| EngineError::not_found("task", task_id))?;

        task.apply_update(body, Utc::now())?;
        if state.data_context.update_task(&task)? == 0 {
            return Err(EngineError::not_found("task", task_id));
        }
        Ok(Json(task))
    }

    pub async fn change_status(
        State(state): State<SharedState>,
        Path(id): Path<String>,
        Json(body): Json<ChangeTaskStatusRequest>,
    ) -> EngineResult<Json<Task>> {
        let task_id = parse_id("task", &id)?;
        let status = required("task status", body.status)?;
        let mut task = state
            .data_context
            .find_task(task_id)?
            .ok_or_else(|| EngineError::not_found("task", task_id))?;

        task.change_status(status, Utc::now());
        if state.data_context.update_task(&task)? == 0 {
            return Err(EngineError::not_found("task", task_id));
        }
        Ok(Json(task))
    }

    pub async fn delete(
        State(state): State<SharedState>,
        Path(id): Path<String>,
    ) -> EngineResult<StatusCode> {
        state.association.delete_task(&id)?;
        Ok(StatusCode::NO_CONTENT)
    }

    pub async fn search(
        State(state): State<SharedState>,
        Query(query): Query<NameQuery>,
    ) -> EngineResult<Json<Vec<Task>>> {
        let keyword = required_text("search parameter (name)", query.name)?;
        Ok(Json(state.query.search_tasks_by_name(&keyword)?))
    }

    pub async fn filter_by_status(
        State(state): State<SharedState>,
        Path(status): Path<String>,
    ) -> EngineResult<Json<Vec<Task>>> {
        Ok(Json(state.query.filter_tasks_by_status(&status)?))
    }

    pub async fn sort(
        State(state): State<SharedState>,
        Path(parameter): Path<String>,
    ) -> EngineResult<Json<Vec<Task>>> {
        Ok(Json(state.query.sort_tasks(&parameter)?))
    }
}
