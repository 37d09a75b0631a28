//! Data-access layer for a todo list kept in a hosted `todos` table.
//!
//! # Overview
//! `TodoClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network (host-does-IO pattern). `TodoService` pairs a
//! client with an injected `Transport` and exposes the four operations the UI
//! needs: list, create, update and delete.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only the project URL and API key.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O boundary
//!   is explicit and testable with plain data.
//! - The transport is a constructor argument, never a global, so tests can
//!   substitute a closure for the network.
//! - Row types are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod service;
pub mod transport;
pub mod types;

pub use client::TodoClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use service::TodoService;
pub use transport::{Transport, UreqTransport};
pub use types::{NewTodo, Todo, TodoPatch};
