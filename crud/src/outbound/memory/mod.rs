//! In-memory storage backend.
//!
//! Useful for tests, prototypes and as the executable statement of the
//! repository contract that durable backends must match.

mod in_memory_repository;

pub use in_memory_repository::InMemoryRepository;
