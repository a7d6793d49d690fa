use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::model::task::{NewTask, Task, TaskId, TaskPatch};
use crate::repository::traits::{OrderBy, TaskRepository};

/// Process-local table used by tests. Ids are assigned in ascending order.
#[derive(Default)]
pub struct InMemoryTaskRepository {
    rows: Mutex<Vec<Task>>,
    next_id: Mutex<TaskId>,
    failing: AtomicBool,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0);
        Self {
            rows: Mutex::new(tasks),
            next_id: Mutex::new(next_id),
            failing: AtomicBool::new(false),
        }
    }

    /// While set, every call fails with a transport error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Vec<Task> {
        self.rows.lock().map(|rows| rows.clone()).unwrap_or_default()
    }

    fn check(&self) -> Result<(), RemoteError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(RemoteError::Transport("backend unavailable".to_string()))
        } else {
            Ok(())
        }
    }

    fn lock_rows(&self) -> Result<std::sync::MutexGuard<'_, Vec<Task>>, RemoteError> {
        self.rows
            .lock()
            .map_err(|_| RemoteError::Transport("table lock poisoned".to_string()))
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn list_all(&self, order: &OrderBy) -> Result<Vec<Task>, RemoteError> {
        self.check()?;
        let mut rows = self.lock_rows()?.clone();
        match order.column.as_str() {
            "name" => rows.sort_by(|a, b| a.name.cmp(&b.name)),
            "isCompleted" => rows.sort_by_key(|t| t.is_completed),
            _ => rows.sort_by_key(|t| t.id),
        }
        if !order.ascending {
            rows.reverse();
        }
        Ok(rows)
    }

    async fn create(&self, task: &NewTask) -> Result<Vec<Task>, RemoteError> {
        self.check()?;
        let id = {
            let mut next_id = self
                .next_id
                .lock()
                .map_err(|_| RemoteError::Transport("id lock poisoned".to_string()))?;
            *next_id += 1;
            *next_id
        };
        let created = Task {
            id,
            name: task.name.clone(),
            is_completed: task.is_completed,
        };
        self.lock_rows()?.push(created.clone());
        Ok(vec![created])
    }

    async fn update_by_id(&self, id: TaskId, patch: &TaskPatch) -> Result<Vec<Task>, RemoteError> {
        self.check()?;
        let mut rows = self.lock_rows()?;
        let updated = rows
            .iter_mut()
            .filter(|t| t.id == id)
            .map(|t| {
                if let Some(is_completed) = patch.is_completed {
                    t.is_completed = is_completed;
                }
                t.clone()
            })
            .collect();
        Ok(updated)
    }

    async fn delete_by_id(&self, id: TaskId) -> Result<(), RemoteError> {
        self.check()?;
        self.lock_rows()?.retain(|t| t.id != id);
        Ok(())
    }
}
