//! dayplan-core
//!
//! Core building blocks for the dayplan to-do list.
//!
//! # Modules
//! - **domain**: domain model (ids, task, due dates, errors)
//! - **ports**: abstraction layer (TaskRepository, Clock)
//! - **impls**: port implementations (in-memory and SQLite repositories)
//! - **app**: the task list view-model and its pure view derivation

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{AnnotatedTask, FilterMode, SortMode, TaskViewModel, ViewQuery, derive_view};
pub use domain::{Countdown, DayplanError, ErrorKind, NewTask, Priority, StoreError, Task, TaskId};
pub use impls::{InMemoryTaskRepository, SqliteTaskRepository};
pub use ports::{Clock, FixedClock, SystemClock, TaskRepository};
