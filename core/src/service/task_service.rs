use crate::error::RemoteError;
use crate::model::task::{TaskId, TaskPatch};
use crate::repository::{OrderBy, TaskRepository};
use crate::service::task_list::{Outcome, Request, TaskList};

/// Runs list requests against a repository.
///
/// Failures are logged here and returned to the caller; the list is only
/// touched after a successful round trip.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// One round trip for `request`.
    pub async fn execute(&self, request: &Request) -> Result<Outcome, RemoteError> {
        tracing::debug!(request = %request.describe(), "sending request");
        let result = match request {
            Request::Load => self
                .repo
                .list_all(&OrderBy::id_ascending())
                .await
                .map(Outcome::Loaded),
            Request::Create(task) => self.repo.create(task).await.map(Outcome::Created),
            Request::Delete(id) => self.repo.delete_by_id(*id).await.map(|_| Outcome::Deleted(*id)),
            Request::SetCompleted { id, is_completed } => self
                .repo
                .update_by_id(*id, &TaskPatch::completed(*is_completed))
                .await
                .map(|rows| Outcome::Updated { id: *id, rows }),
        };

        if let Err(err) = &result {
            tracing::warn!(request = %request.describe(), error = %err, "remote operation failed");
        }
        result
    }

    async fn run(&self, list: &mut TaskList, request: Request) -> Result<(), RemoteError> {
        let outcome = self.execute(&request).await?;
        list.apply(outcome);
        Ok(())
    }

    pub async fn load(&self, list: &mut TaskList) -> Result<(), RemoteError> {
        self.run(list, Request::Load).await
    }

    /// Inserts the draft. Returns `Ok(false)` without a round trip when the
    /// draft is blank.
    pub async fn add(&self, list: &mut TaskList) -> Result<bool, RemoteError> {
        let Some(request) = list.add_request() else {
            return Ok(false);
        };
        self.run(list, request).await?;
        Ok(true)
    }

    pub async fn delete(&self, list: &mut TaskList, id: TaskId) -> Result<(), RemoteError> {
        let request = list.delete_request(id);
        self.run(list, request).await
    }

    pub async fn toggle_complete(
        &self,
        list: &mut TaskList,
        id: TaskId,
        is_completed: bool,
    ) -> Result<(), RemoteError> {
        let request = list.toggle_request(id, is_completed);
        self.run(list, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{NewTask, Task};
    use crate::repository::InMemoryTaskRepository;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn task(id: TaskId, name: &str, is_completed: bool) -> Task {
        Task {
            id,
            name: name.to_string(),
            is_completed,
        }
    }

    /// Replays canned responses and records what was asked.
    #[derive(Default)]
    struct MockTaskRepo {
        listed: Option<Vec<Task>>,
        created: Vec<Task>,
        calls: Mutex<Vec<String>>,
    }

    impl MockTaskRepo {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TaskRepository for MockTaskRepo {
        async fn list_all(&self, order: &OrderBy) -> Result<Vec<Task>, RemoteError> {
            self.calls.lock().unwrap().push(format!("list {}", order.column));
            self.listed
                .clone()
                .ok_or_else(|| RemoteError::Transport("offline".to_string()))
        }

        async fn create(&self, task: &NewTask) -> Result<Vec<Task>, RemoteError> {
            self.calls.lock().unwrap().push(format!("create {}", task.name));
            Ok(self.created.clone())
        }

        async fn update_by_id(
            &self,
            _id: TaskId,
            _patch: &TaskPatch,
        ) -> Result<Vec<Task>, RemoteError> {
            unimplemented!()
        }

        async fn delete_by_id(&self, id: TaskId) -> Result<(), RemoteError> {
            self.calls.lock().unwrap().push(format!("delete {}", id));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_load_replaces_list() {
        let repo = MockTaskRepo {
            listed: Some(vec![task(1, "a", false), task(2, "b", true)]),
            ..Default::default()
        };
        let service = TaskService::new(repo);
        let mut list = TaskList::with_tasks(vec![task(5, "old", false)]);

        service.load(&mut list).await.unwrap();
        assert_eq!(list.tasks(), &[task(1, "a", false), task(2, "b", true)]);
        assert_eq!(service.repository().calls(), vec!["list id"]);
    }

    #[tokio::test]
    async fn test_failed_load_leaves_list_unchanged() {
        let service = TaskService::new(MockTaskRepo::default());
        let mut list = TaskList::with_tasks(vec![task(5, "old", false)]);

        let err = service.load(&mut list).await.unwrap_err();
        assert_eq!(err, RemoteError::Transport("offline".to_string()));
        assert_eq!(list.tasks(), &[task(5, "old", false)]);
    }

    #[tokio::test]
    async fn test_add_walk_dog_on_empty_list() {
        let repo = MockTaskRepo {
            created: vec![task(2, "Walk dog", false)],
            ..Default::default()
        };
        let service = TaskService::new(repo);
        let mut list = TaskList::new();
        list.set_draft("Walk dog");

        assert!(service.add(&mut list).await.unwrap());
        assert_eq!(list.tasks(), &[task(2, "Walk dog", false)]);
        assert_eq!(list.draft(), "");
    }

    #[tokio::test]
    async fn test_blank_add_makes_no_call() {
        let service = TaskService::new(MockTaskRepo::default());
        let mut list = TaskList::with_tasks(vec![task(1, "a", false)]);
        list.set_draft("   ");

        assert!(!service.add(&mut list).await.unwrap());
        assert_eq!(list.len(), 1);
        assert_eq!(list.draft(), "   ");
        assert!(service.repository().calls().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_buy_milk() {
        let repo = InMemoryTaskRepository::with_tasks(vec![task(1, "Buy milk", false)]);
        let service = TaskService::new(repo);
        let mut list = TaskList::new();
        service.load(&mut list).await.unwrap();

        service.toggle_complete(&mut list, 1, false).await.unwrap();
        assert_eq!(list.tasks(), &[task(1, "Buy milk", true)]);

        service.toggle_complete(&mut list, 1, true).await.unwrap();
        assert_eq!(list.tasks(), &[task(1, "Buy milk", false)]);
    }

    #[tokio::test]
    async fn test_delete_removes_only_target() {
        let repo = InMemoryTaskRepository::with_tasks(vec![
            task(1, "a", false),
            task(2, "b", false),
            task(3, "c", true),
        ]);
        let service = TaskService::new(repo);
        let mut list = TaskList::new();
        service.load(&mut list).await.unwrap();

        service.delete(&mut list, 2).await.unwrap();
        assert_eq!(list.tasks(), &[task(1, "a", false), task(3, "c", true)]);
        assert_eq!(service.repository().snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_failures_leave_state_untouched() {
        let repo = InMemoryTaskRepository::with_tasks(vec![task(1, "Buy milk", false)]);
        let service = TaskService::new(repo);
        let mut list = TaskList::new();
        service.load(&mut list).await.unwrap();
        let before = list.clone();

        service.repository().set_failing(true);
        list.set_draft("Walk dog");
        assert!(service.add(&mut list).await.is_err());
        assert_eq!(list.draft(), "Walk dog");
        assert!(service.delete(&mut list, 1).await.is_err());
        assert!(service.toggle_complete(&mut list, 1, false).await.is_err());
        assert_eq!(list.tasks(), before.tasks());
    }

    #[tokio::test]
    async fn test_add_grows_list_by_one() {
        let service = TaskService::new(InMemoryTaskRepository::new());
        let mut list = TaskList::new();
        for name in ["first", "second"] {
            let before = list.len();
            list.set_draft(name);
            service.add(&mut list).await.unwrap();
            assert_eq!(list.len(), before + 1);
        }
        let ids: Vec<TaskId> = list.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
