pub mod config;
pub mod error;
pub mod model;
pub mod repository;
pub mod service;

pub use config::{BackendConfig, Settings};
pub use error::RemoteError;
pub use model::task::{NewTask, Task, TaskId, TaskPatch};
pub use model::theme::Theme;
pub use repository::{
    FilePreferenceStore, InMemoryTaskRepository, OrderBy, PreferenceStore, RestTaskRepository,
    TaskRepository,
};
pub use service::task_list::{Outcome, Request, TaskList};
pub use service::task_service::TaskService;
pub use service::theme_service::ThemeController;
