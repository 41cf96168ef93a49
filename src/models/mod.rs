pub mod chat;
pub mod task;
pub mod user;

pub use chat::{ChatFailure, ChatOutcome, ChatReply, Role};
pub use task::{Priority, Recurrence, Task, TaskCreate, TaskUpdate};
pub use user::{AuthResponse, RegisterResponse, User};
