pub mod auth;
pub mod chat;
pub mod tasks;

pub use chat::{ChatSession, SessionEntry};
pub use tasks::{SortBy, SortOrder, TaskFilter, TaskStatus};
