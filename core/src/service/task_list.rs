use crate::model::task::{NewTask, Task, TaskId};

/// One remote call the list can ask for.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Load,
    Create(NewTask),
    Delete(TaskId),
    SetCompleted { id: TaskId, is_completed: bool },
}

impl Request {
    /// Short label for logs and the status line.
    pub fn describe(&self) -> String {
        match self {
            Request::Load => "load tasks".to_string(),
            Request::Create(task) => format!("add '{}'", task.name),
            Request::Delete(id) => format!("delete task {}", id),
            Request::SetCompleted { id, is_completed: true } => format!("complete task {}", id),
            Request::SetCompleted { id, is_completed: false } => format!("reopen task {}", id),
        }
    }
}

/// A successful response, ready to be merged into the list.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Loaded(Vec<Task>),
    Created(Vec<Task>),
    Deleted(TaskId),
    Updated { id: TaskId, rows: Vec<Task> },
}

/// In-memory projection of the remote table plus the input draft.
///
/// The list is never re-fetched after a mutation: each confirmed change is
/// patched in place from the server's response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskList {
    tasks: Vec<Task>,
    draft: String,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            draft: String::new(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// `None` when the draft is blank. The name is sent exactly as typed.
    pub fn add_request(&self) -> Option<Request> {
        if self.draft.trim().is_empty() {
            return None;
        }
        Some(Request::Create(NewTask::new(self.draft.clone())))
    }

    pub fn delete_request(&self, id: TaskId) -> Request {
        Request::Delete(id)
    }

    pub fn toggle_request(&self, id: TaskId, is_completed: bool) -> Request {
        Request::SetCompleted {
            id,
            is_completed: !is_completed,
        }
    }

    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Loaded(rows) => {
                self.tasks = rows;
            }
            Outcome::Created(rows) => {
                self.tasks.extend(rows);
                self.draft.clear();
            }
            Outcome::Deleted(id) => {
                self.tasks.retain(|t| t.id != id);
            }
            Outcome::Updated { id, rows } => {
                let Some(updated) = rows.into_iter().next() else {
                    tracing::warn!(id, "update returned no rows; keeping local copy");
                    return;
                };
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == id) {
                    *slot = updated;
                }
            }
        }
    }
}
