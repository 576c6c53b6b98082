pub mod aggregation_routes;
pub mod health_routes;
pub mod project_routes;
pub mod task_routes;

use std::sync::Arc;

use axum::Router;

use crate::app_state::AppState;

pub const API_VERSION: &str = "/api/v1";

pub fn map_routes(app_state: Arc<AppState>) -> Router {
    Router::new()
        .nest(
            API_VERSION,
            Router::new()
                .merge(project_routes::get_router(app_state.clone()))
                .merge(task_routes::get_router(app_state.clone()))
                .merge(aggregation_routes::get_router(app_state)),
        )
        .merge(health_routes::get_router())
}
