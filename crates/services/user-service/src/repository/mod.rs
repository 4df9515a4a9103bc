//! Account store implementations.

pub mod entities;
mod memory;
mod user_repository;

pub use memory::MemoryStore;
pub use user_repository::UserStore;
