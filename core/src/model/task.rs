use serde::{Deserialize, Serialize};

/// Server-assigned row identifier. Rows are ordered by it.
pub type TaskId = i64;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(rename = "isCompleted", default)]
    pub is_completed: bool,
}

/// Insert payload. The backend assigns `id`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
}

impl NewTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_completed: false,
        }
    }
}

/// Partial update payload. Only fields that are set go over the wire.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    #[serde(rename = "isCompleted", skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl TaskPatch {
    pub fn completed(is_completed: bool) -> Self {
        Self {
            is_completed: Some(is_completed),
        }
    }
}
