//! Interactive todo list backed by a hosted `todos` table.
//!
//! # Overview
//! `state` holds the list and its optimistic transitions, `app` wires those
//! transitions to the data-access layer in `todo-core`, and `terminal` is the
//! line-based front end the `todo` binary runs.
//!
//! # Design
//! - The table client and the prompt capability are both injected, so the
//!   whole flow runs in tests without a terminal or a network.
//! - Errors from the table are logged, never shown on screen.

pub mod app;
pub mod command;
pub mod config;
pub mod prompt;
pub mod render;
pub mod state;
pub mod terminal;

pub use app::{run, App, Flow, Settled};
pub use command::Command;
pub use config::Args;
pub use prompt::{Prompt, ScriptedPrompt};
pub use state::TodoState;
pub use terminal::{Console, Terminal};
