//! Task management module
//!
//! - Task records and their status transitions (pending <-> done)
//! - JSON file store that owns the backing file
//! - Error type shared by both

pub mod error;
pub mod model;
pub mod store;

pub use error::{Result, TaskError};
pub use model::{Priority, Task, TaskId, TaskStatus, DEFAULT_DESCRIPTION};
pub use store::{TaskStore, TaskUpdate, DEFAULT_TASKS_FILE};
