//! Ports - abstraction layer.
//!
//! Each trait is the seam to something outside the core: the task store and
//! the wall clock. Implementations live in `impls`.

pub mod clock;
pub mod task_repository;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::task_repository::TaskRepository;
