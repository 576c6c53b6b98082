use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// `to-do` is the canonical wire form; `pending` is accepted on input for
/// compatibility with older clients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[serde(alias = "pending")]
    ToDo,
    InProgress,
    Done,
    Closed,
    Cancelled,
}

impl TaskStatus {
    /// Statuses that mark a task as finished and stamp `dateCompleted`.
    pub fn is_completed(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Closed)
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim() {
            "to-do" | "pending" => Ok(TaskStatus::ToDo),
            "in-progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            "closed" => Ok(TaskStatus::Closed),
            "cancelled" => Ok(TaskStatus::Cancelled),
            _ => Err(()),
        }
    }
}
