use async_trait::async_trait;

use crate::error::RemoteError;
use crate::model::task::{NewTask, Task, TaskId, TaskPatch};

/// Row ordering for `list_all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

impl OrderBy {
    pub fn id_ascending() -> Self {
        Self {
            column: "id".to_string(),
            ascending: true,
        }
    }
}

/// The four table operations the to-do list needs. Each call is one round
/// trip; implementations do not retry.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn list_all(&self, order: &OrderBy) -> Result<Vec<Task>, RemoteError>;

    /// Returns the created row(s) as stored by the backend.
    async fn create(&self, task: &NewTask) -> Result<Vec<Task>, RemoteError>;

    /// Returns the updated row(s). Empty when no row matched.
    async fn update_by_id(&self, id: TaskId, patch: &TaskPatch) -> Result<Vec<Task>, RemoteError>;

    async fn delete_by_id(&self, id: TaskId) -> Result<(), RemoteError>;
}
