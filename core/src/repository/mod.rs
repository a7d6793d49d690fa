pub mod memory;
pub mod preferences;
pub mod rest;
pub mod traits;

// Re-export
pub use memory::InMemoryTaskRepository;
pub use preferences::{FilePreferenceStore, PreferenceStore};
pub use rest::RestTaskRepository;
pub use traits::{OrderBy, TaskRepository};
