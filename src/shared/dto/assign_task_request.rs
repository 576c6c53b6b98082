use serde::Deserialize;

/// Identifiers arrive as raw strings; the association engine validates them
/// before anything touches the store.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTaskRequest {
    pub task_id: String,
    pub project_id: String,
}
