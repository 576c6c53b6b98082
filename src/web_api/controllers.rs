pub mod aggregation_controller;
pub mod health_controller;
pub mod project_controller;
pub mod task_controller;
