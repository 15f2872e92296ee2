//! SQLite repository implementation.
//!
//! The table layout matches the one the to-do web server has always used, so an
//! existing `database.sqlite` can be opened as-is:
//!
//! ```sql
//! CREATE TABLE tasks (
//!   id INTEGER PRIMARY KEY AUTOINCREMENT,
//!   text TEXT, category TEXT, dueDate TEXT, priority TEXT, completed INTEGER
//! )
//! ```
//!
//! Every column except `id` is nullable there, so decoding falls back to
//! defaults instead of failing the whole listing.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{Connection, Row, params};

use crate::domain::{NewTask, Priority, StoreError, Task, TaskId};
use crate::ports::TaskRepository;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  text TEXT,
  category TEXT,
  dueDate TEXT,
  priority TEXT,
  completed INTEGER
);
"#;

/// Repository backed by a single SQLite connection.
///
/// # Implementation
/// - `std::sync::Mutex<Connection>`; rusqlite is blocking
/// - every call runs on tokio's blocking pool via `spawn_blocking`
/// - the lock is taken inside the blocking closure, never across an `.await`
#[derive(Clone)]
pub struct SqliteTaskRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTaskRepository {
    /// Open (or create) the database file, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        tracing::debug!(path = %path.display(), "opened sqlite task store");
        Self::from_connection(conn)
    }

    /// A private database that disappears with the repository.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run one statement on the blocking pool.
    async fn with_conn<T, F>(&self, op: &'static str, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Join(format!("{op}: connection lock poisoned")))?;
            f(&guard).map_err(StoreError::from)
        })
        .await
        .map_err(|e| StoreError::Join(format!("{op}: {e}")))?
    }
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let id: i64 = row.get("id")?;
    let text: Option<String> = row.get("text")?;
    let category: Option<String> = row.get("category")?;
    let due_date: Option<String> = row.get("dueDate")?;
    let priority: Option<String> = row.get("priority")?;
    let completed: Option<i64> = row.get("completed")?;

    Ok(Task {
        id: TaskId::new(id),
        text: text.unwrap_or_default(),
        category: category.unwrap_or_default(),
        due_date: due_date.filter(|d| !d.trim().is_empty()),
        priority: decode_priority(id, priority.as_deref()),
        completed: completed.is_some_and(|c| c != 0),
    })
}

fn decode_priority(id: i64, raw: Option<&str>) -> Priority {
    match raw.map(str::parse::<Priority>) {
        Some(Ok(priority)) => priority,
        Some(Err(err)) => {
            tracing::warn!(task_id = id, error = %err, "unreadable priority, treating as Low");
            Priority::Low
        }
        None => {
            tracing::warn!(task_id = id, "missing priority, treating as Low");
            Priority::Low
        }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        self.with_conn("list_all", |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, text, category, dueDate, priority, completed FROM tasks ORDER BY id",
            )?;
            let tasks = stmt
                .query_map([], task_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(tasks)
        })
        .await
    }

    async fn create(&self, task: NewTask) -> Result<TaskId, StoreError> {
        self.with_conn("create", move |conn| {
            conn.execute(
                "INSERT INTO tasks (text, category, dueDate, priority, completed) VALUES (?1, ?2, ?3, ?4, 0)",
                params![task.text, task.category, task.due_date, task.priority.as_str()],
            )?;
            Ok(TaskId::new(conn.last_insert_rowid()))
        })
        .await
    }

    async fn toggle(&self, id: TaskId) -> Result<(), StoreError> {
        self.with_conn("toggle", move |conn| {
            // NULL reads as not done, same as task_from_row
            conn.execute(
                "UPDATE tasks SET completed = NOT COALESCE(completed, 0) WHERE id = ?1",
                params![id.get()],
            )?;
            Ok(())
        })
        .await
    }

    async fn rename(&self, id: TaskId, text: &str) -> Result<(), StoreError> {
        let text = text.to_string();
        self.with_conn("rename", move |conn| {
            conn.execute(
                "UPDATE tasks SET text = ?1 WHERE id = ?2",
                params![text, id.get()],
            )?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> Result<(), StoreError> {
        self.with_conn("delete", move |conn| {
            conn.execute("DELETE FROM tasks WHERE id = ?1", params![id.get()])?;
            Ok(())
        })
        .await
    }

    async fn clear_completed(&self) -> Result<(), StoreError> {
        self.with_conn("clear_completed", |conn| {
            conn.execute("DELETE FROM tasks WHERE completed <> 0", [])?;
            Ok(())
        })
        .await
    }
}
