pub mod app_state;
pub mod project;
pub mod project_status;
pub mod settings;
pub mod task;
pub mod task_priority;
pub mod task_status;
