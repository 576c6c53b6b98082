use serde::Deserialize;

use crate::task_status::TaskStatus;

#[derive(Debug, Deserialize)]
pub struct ChangeTaskStatusRequest {
    pub status: Option<TaskStatus>,
}
