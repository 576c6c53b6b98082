use axum::extract::State;
use axum::Json;

use crate::{
    app_state::SharedState, project_due_today_response::ProjectDueTodayResponse, task::Task,
    EngineResult,
};

pub struct AggregationController {}

impl AggregationController {
    pub async fn get_projects_due_today(
        State(state): State<SharedState>,
    ) -> EngineResult<Json<Vec<ProjectDueTodayResponse>>> {
        Ok(Json(state.query.projects_due_today()?))
    }

    pub async fn get_tasks_due_today(
        State(state): State<SharedState>,
    ) -> EngineResult<Json<Vec<Task>>> {
        Ok(Json(state.query.tasks_due_today()?))
    }
}
