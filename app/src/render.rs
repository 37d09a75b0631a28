//! Text rendering of the list screen.

use std::fmt::Write;

use crate::state::TodoState;

pub const TITLE: &str = "My Todo List";
pub const INPUT_PLACEHOLDER: &str = "Enter a task...";
pub const LOADING: &str = "Loading...";
pub const EMPTY: &str = "No todos yet.";

/// Label of the Add control; it is disabled while an insert is saving.
pub fn add_label(state: &TodoState) -> &'static str {
    if state.saving() {
        "Saving..."
    } else {
        "Add"
    }
}

pub fn render(state: &TodoState) -> String {
    let mut out = String::new();
    let input = if state.task().is_empty() {
        INPUT_PLACEHOLDER
    } else {
        state.task()
    };

    let _ = writeln!(out, "{TITLE}");
    let _ = writeln!(out);
    let _ = writeln!(out, "> {input}  [{}]", add_label(state));
    let _ = writeln!(out);
    let _ = writeln!(out, "Tasks");

    if state.loading() {
        let _ = writeln!(out, "  {LOADING}");
    } else if state.todos().is_empty() {
        let _ = writeln!(out, "  {EMPTY}");
    } else {
        for (index, todo) in state.todos().iter().enumerate() {
            let mark = if todo.is_complete { 'x' } else { ' ' };
            let _ = writeln!(out, "  {:>2}. [{mark}] {}", index + 1, todo.task);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "  /edit N  /delete N  /help");
    }
    out
}
