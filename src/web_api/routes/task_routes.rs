use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{app_state::AppState, task_controller::TaskController};

pub const ROUTER_PATH: &str = "/tasks";

pub fn get_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            ROUTER_PATH,
            post(TaskController::create).get(TaskController::get_all),
        )
        .route(
            format!("{}/search", ROUTER_PATH).as_str(),
            get(TaskController::search),
        )
        .route(
            format!("{}/status/:status", ROUTER_PATH).as_str(),
            get(TaskController::filter_by_status),
        )
        .route(
            format!("{}/sort/:parameter", ROUTER_PATH).as_str(),
            get(TaskController::sort),
        )
        .route(
            format!("{}/by-project/:id", ROUTER_PATH).as_str(),
            get(TaskController::get_by_project),
        )
        .route(
            format!("{}/:id", ROUTER_PATH).as_str(),
            put(TaskController::update)
                .patch(TaskController::change_status)
                .delete(TaskController::delete),
        )
        .with_state(app_state)
}
