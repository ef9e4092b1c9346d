//! Outbound adapters implementing the repository ports.

pub mod memory;

pub use memory::{InMemoryCourseRepository, InMemoryUserRepository};
