// Todolist - Persistent single-user task list: store core + console front end

pub mod error;
pub mod models;
pub mod storage;
pub mod store;

// Re-export main types for convenience
pub use error::{Error, Result, Severity};
pub use models::{Counts, Task, TaskFilter};
pub use storage::Storage;
pub use store::TaskStore;
