//! TaskRepository port - the persistence contract the view-model depends on.
//!
//! Every operation is one atomic store statement. Operations that target an
//! id which does not exist succeed without doing anything.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{NewTask, StoreError, Task, TaskId};

/// TaskRepository translates task intents into store operations.
///
/// # Contract
/// - `list_all` returns the whole table; callers must not rely on its order
/// - `create` stores `completed = false` and returns the store-assigned id
/// - `toggle` / `rename` / `delete` are no-ops for unknown ids
/// - connectivity failures surface as `StoreError`, never retried here
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Task>, StoreError>;

    async fn create(&self, task: NewTask) -> Result<TaskId, StoreError>;

    /// Flip `completed` (logical negation).
    async fn toggle(&self, id: TaskId) -> Result<(), StoreError>;

    /// Replace `text`; every other field is left untouched.
    async fn rename(&self, id: TaskId, text: &str) -> Result<(), StoreError>;

    async fn delete(&self, id: TaskId) -> Result<(), StoreError>;

    /// Remove every task with `completed = true`.
    async fn clear_completed(&self) -> Result<(), StoreError>;
}

#[async_trait]
impl<R: TaskRepository + ?Sized> TaskRepository for Arc<R> {
    async fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        (**self).list_all().await
    }

    async fn create(&self, task: NewTask) -> Result<TaskId, StoreError> {
        (**self).create(task).await
    }

    async fn toggle(&self, id: TaskId) -> Result<(), StoreError> {
        (**self).toggle(id).await
    }

    async fn rename(&self, id: TaskId, text: &str) -> Result<(), StoreError> {
        (**self).rename(id, text).await
    }

    async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        (**self).delete(id).await
    }

    async fn clear_completed(&self) -> Result<(), StoreError> {
        (**self).clear_completed().await
    }
}
