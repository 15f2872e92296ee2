//! App - application layer.
//!
//! Combines the ports into the task list view-model.
//!
//! # Components
//! - **view**: the pure filter/sort/annotate derivation and the selection types
//! - **TaskViewModel**: session state, intents and the full-resync cycle

pub mod view;
pub mod view_model;

pub use self::view::{AnnotatedTask, FilterMode, SortMode, ViewQuery, derive_view};
pub use self::view_model::TaskViewModel;
