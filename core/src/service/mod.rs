pub mod task_list;
pub mod task_service;
pub mod theme_service;
