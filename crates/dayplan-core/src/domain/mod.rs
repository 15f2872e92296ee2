//! Domain model (ids, the task record, due dates, errors).

pub mod due;
pub mod errors;
pub mod ids;
pub mod task;

pub use self::due::Countdown;
pub use self::errors::{DayplanError, ErrorKind, ParseModeError, ParsePriorityError, StoreError};
pub use self::ids::TaskId;
pub use self::task::{NewTask, Priority, Task};
