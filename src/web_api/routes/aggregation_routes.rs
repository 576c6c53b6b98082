use std::sync::Arc;

use axum::{routing::get, Router};

use crate::{aggregation_controller::AggregationController, app_state::AppState};

pub const ROUTER_PATH: &str = "/aggregations";

pub fn get_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            format!("{}/projects-due-today", ROUTER_PATH).as_str(),
            get(AggregationController::get_projects_due_today),
        )
        .route(
            format!("{}/tasks-due-today", ROUTER_PATH).as_str(),
            get(AggregationController::get_tasks_due_today),
        )
        .with_state(app_state)
}
