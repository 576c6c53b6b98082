use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{app_state::AppState, project_controller::ProjectController};

pub const ROUTER_PATH: &str = "/projects";

pub fn get_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            ROUTER_PATH,
            post(ProjectController::create).get(ProjectController::get_all),
        )
        .route(
            format!("{}/assign-task", ROUTER_PATH).as_str(),
            post(ProjectController::assign_task),
        )
        .route(
            format!("{}/move-task-between-projects", ROUTER_PATH).as_str(),
            post(ProjectController::move_task),
        )
        .route(
            format!("{}/filter", ROUTER_PATH).as_str(),
            get(ProjectController::filter_tasks),
        )
        .route(
            format!("{}/sort/:parameter", ROUTER_PATH).as_str(),
            get(ProjectController::sort),
        )
        .route(
            format!("{}/:id", ROUTER_PATH).as_str(),
            put(ProjectController::update).delete(ProjectController::delete),
        )
        .with_state(app_state)
}
