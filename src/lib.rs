//! # todo-client
//!
//! Client library for a task-management backend.
//!
//! This library provides:
//! - An authenticated HTTP/JSON client for the backend's auth, task, and
//!   chat endpoints, with all failures normalized into [`ApiClientError`]
//! - A parser that lifts structured task annotations out of free-text
//!   assistant chat replies, plus the badge classification used to
//!   render them
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use todo_client::{ApiClient, ApiConfig, MemoryTokenStore};
//!
//! let client = ApiClient::new(ApiConfig::from_env(), Arc::new(MemoryTokenStore::new()))?;
//! client.login("ada@example.com", "correct horse").await?;
//! let tasks = client.list_tasks(&Default::default()).await?;
//! ```
//!
//! The parser side is synchronous and free-standing:
//!
//! ```rust,ignore
//! let annotations = todo_client::annotate::parse_annotations(reply);
//! ```

pub mod annotate;
pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod token;

pub use api::{ChatSession, TaskFilter};
pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{ApiClientError, ApiError};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
