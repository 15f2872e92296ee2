//! In-memory repository implementation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{NewTask, StoreError, Task, TaskId};
use crate::ports::TaskRepository;

/// In-memory table state.
struct InMemoryTable {
    /// Rows in insertion order.
    tasks: Vec<Task>,

    /// Next id to assign. Ids are never reused, even after deletes.
    next_id: i64,
}

impl InMemoryTable {
    fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> TaskId {
        let id = TaskId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }
}

/// Repository backed by a `Vec` behind a tokio `Mutex`.
///
/// Used by tests and `--in-memory` sessions. `set_offline(true)` makes every
/// call fail with `StoreError::Unavailable`, which is how tests exercise the
/// transport-failure path.
#[derive(Clone)]
pub struct InMemoryTaskRepository {
    table: Arc<Mutex<InMemoryTable>>,
    offline: Arc<AtomicBool>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self {
            table: Arc::new(Mutex::new(InMemoryTable::new())),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Simulate the store becoming unreachable (or reachable again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store is offline".to_string()));
        }
        Ok(())
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        self.ensure_online()?;
        let table = self.table.lock().await;
        Ok(table.tasks.clone())
    }

    async fn create(&self, task: NewTask) -> Result<TaskId, StoreError> {
        self.ensure_online()?;
        let mut table = self.table.lock().await;
        let id = table.allocate_id();
        table.tasks.push(task.into_task(id));
        Ok(id)
    }

    async fn toggle(&self, id: TaskId) -> Result<(), StoreError> {
        self.ensure_online()?;
        let mut table = self.table.lock().await;
        if let Some(task) = table.get_mut(id) {
            task.completed = !task.completed;
        }
        Ok(())
    }

    async fn rename(&self, id: TaskId, text: &str) -> Result<(), StoreError> {
        self.ensure_online()?;
        let mut table = self.table.lock().await;
        if let Some(task) = table.get_mut(id) {
            task.text = text.to_string();
        }
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        self.ensure_online()?;
        let mut table = self.table.lock().await;
        table.tasks.retain(|t| t.id != id);
        Ok(())
    }

    async fn clear_completed(&self) -> Result<(), StoreError> {
        self.ensure_online()?;
        let mut table = self.table.lock().await;
        table.tasks.retain(|t| !t.completed);
        Ok(())
    }
}
