//! Impls - implementations of the ports.
//!
//! # Included
//! - **InMemoryTaskRepository**: tests and throwaway sessions
//! - **SqliteTaskRepository**: the durable store (`database.sqlite`)

pub mod inmem_repository;
pub mod sqlite_repository;

pub use self::inmem_repository::InMemoryTaskRepository;
pub use self::sqlite_repository::SqliteTaskRepository;
