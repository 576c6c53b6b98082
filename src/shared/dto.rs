// Requests
pub mod create_project_request;
pub mod update_project_request;
pub mod create_task_request;
pub mod update_task_request;
pub mod change_task_status_request;
pub mod assign_task_request;
pub mod move_task_request;
pub mod name_query;

// Responses
pub mod project_due_today_response;
