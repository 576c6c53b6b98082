use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use crate::data_access::repository::Repository;
use crate::shared::validation::{parse_id, required_text};
use crate::{
    app_state::SharedState, assign_task_request::AssignTaskRequest,
    create_project_request::CreateProjectRequest, move_task_request::MoveTaskRequest,
    name_query::NameQuery, project::Project, task::Task,
    update_project_request::UpdateProjectRequest, EngineError, EngineResult,
};

pub struct ProjectController {}

impl ProjectController {
    pub async fn create(
        State(state): State<SharedState>,
        Json(body): Json<CreateProjectRequest>,
    ) -> EngineResult<(StatusCode, Json<Project>)> {
        let project = Project::new(body)?;
        state.data_context.insert_project(&project)?;
        tracing::info!(project_id = %project.id, "project created");
        Ok((StatusCode::CREATED, Json(project)))
    }

    pub async fn get_all(State(state): State<SharedState>) -> EngineResult<Json<Vec<Project>>> {
        Ok(Json(state.data_context.list_projects()?))
    }

    pub async fn update(
        State(state): State<SharedState>,
        Path(id): Path<String>,
        Json(body): Json<UpdateProjectRequest>,
    ) -> EngineResult<Json<Project>> {
        let project_id = parse_id("project", &id)?;
        let mut project = state
            .data_context
            .find_project(project_id)?
            .ok_or_else(|| EngineError::not_found("project", project_id))?;

        project.apply_update(body, Utc::now())?;
        if state.data_context.update_project(&project)? == 0 {
            return Err(EngineError::not_found("project", project_id));
        }
        Ok(Json(project))
    }

    pub async fn delete(
        State(state): State<SharedState>,
        Path(id): Path<String>,
    ) -> EngineResult<StatusCode> {
        state.association.delete_project(&id)?;
        Ok(StatusCode::NO_CONTENT)
    }

    pub async fn assign_task(
        State(state): State<SharedState>,
        Json(body): Json<AssignTaskRequest>,
    ) -> EngineResult<StatusCode> {
        state.association.assign_task(&body.task_id, &body.project_id)?;
        Ok(StatusCode::OK)
    }

    pub async fn move_task(
        State(state): State<SharedState>,
        Json(body): Json<MoveTaskRequest>,
    ) -> EngineResult<StatusCode> {
        state.association.move_task(
            &body.task_id,
            &body.source_project_id,
            &body.destination_project_id,
        )?;
        Ok(StatusCode::OK)
    }

    pub async fn filter_tasks(
        State(state): State<SharedState>,
        Query(query): Query<NameQuery>,
    ) -> EngineResult<Json<Vec<Task>>> {
        let name = required_text("project name", query.name)?;
        Ok(Json(state.query.filter_tasks_by_project_name(&name)?))
    }

    pub async fn sort(
        State(state): State<SharedState>,
        Path(parameter): Path<String>,
    ) -> EngineResult<Json<Vec<Project>>> {
        Ok(Json(state.query.sort_projects(&parameter)?))
    }
}
