//! Account business logic and the storage seam it runs against.

pub mod account_service;
pub mod memory_store;

pub use account_service::{AccountService, UserStore};
pub use memory_store::MemoryUserStore;
