use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::shared::error::{EngineError, EngineResult};

/// Parses a raw identifier before it is handed to the store. Malformed ids
/// fail here instead of surfacing as a store-level lookup miss.
pub fn parse_id(entity: &'static str, raw: &str) -> EngineResult<Uuid> {
    let trimmed = raw.trim();
    Uuid::parse_str(trimmed).map_err(|_| EngineError::InvalidId {
        entity,
        id: trimmed.to_string(),
    })
}

/// A required text field: present and non-blank after trimming.
pub fn required_text(field: &str, value: Option<String>) -> EngineResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(EngineError::Validation(format!(
            "A {field} must be provided"
        ))),
    }
}

pub fn required<T>(field: &str, value: Option<T>) -> EngineResult<T> {
    value.ok_or_else(|| EngineError::Validation(format!("A {field} must be provided")))
}

/// `startDate <= dueDate` must hold for every project and task.
pub fn check_date_order(start: DateTime<Utc>, due: DateTime<Utc>) -> EngineResult<()> {
    if start > due {
        return Err(EngineError::Validation(
            "End date must be greater than start date".to_string(),
        ));
    }
    Ok(())
}
