use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use uuid::Uuid;

/// Failures raised by a store adapter. Anything in here means the operation
/// never produced a usable answer; callers report it as a store-level error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] redb::DatabaseError),
    #[error("transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),
    #[error("table error: {0}")]
    Table(#[from] redb::TableError),
    #[error("storage error: {0}")]
    Storage(#[from] redb::StorageError),
    #[error("commit error: {0}")]
    Commit(#[from] redb::CommitError),
    #[error("corrupt document: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Logical error kinds returned by the engines and handlers.
///
/// Validation and not-found conditions are raised before any mutation, so
/// they never leave partial state behind. `AssociationWriteFailed` is the
/// exception: it reports a zero-effect write in the middle of a paired
/// sequence, which may have left the two collections inconsistent — it is
/// surfaced rather than swallowed so operators can reconcile.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),

    #[error("'{id}' is not a well-formed {entity} id")]
    InvalidId { entity: &'static str, id: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("task {task_id} is already assigned to project {project_id}")]
    AlreadyAssigned { task_id: Uuid, project_id: Uuid },

    #[error("task {task_id} is not in project {project_id}")]
    NotInSourceProject { task_id: Uuid, project_id: Uuid },

    #[error("association write had no effect on {entity} {id}")]
    AssociationWriteFailed { entity: &'static str, id: Uuid },

    #[error("invalid sort parameter '{parameter}'; can only be {allowed}")]
    InvalidParameter {
        parameter: String,
        allowed: &'static str,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        EngineError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = match &self {
            EngineError::Validation(_)
            | EngineError::InvalidId { .. }
            | EngineError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            EngineError::NotFound { .. } => StatusCode::NOT_FOUND,
            EngineError::AlreadyAssigned { .. } | EngineError::NotInSourceProject { .. } => {
                StatusCode::CONFLICT
            }
            EngineError::AssociationWriteFailed { .. } => {
                tracing::error!(error = %self, "association left collections inconsistent");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            EngineError::Store(err) => {
                tracing::error!(error = %err, "store operation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &self {
            // Store internals stay out of responses.
            EngineError::Store(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        let body = json!({
            "status": status.as_u16(),
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}
