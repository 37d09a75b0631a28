//! Modal questions asked before an edit or a delete.
//!
//! The list logic only sees the `Prompt` trait, so the same flow runs against
//! the terminal or against scripted answers.

use std::collections::VecDeque;

pub const EDIT_PROMPT: &str = "Edit task:";
pub const DELETE_PROMPT: &str = "Delete this todo?";

/// Asks the user something and waits for the answer.
#[allow(async_fn_in_trait)]
pub trait Prompt {
    /// Free-text answer, or `None` if the user cancelled.
    async fn input(&mut self, message: &str) -> Option<String>;

    /// Yes/no answer; anything but an explicit yes is a no.
    async fn confirm(&mut self, message: &str) -> bool;
}

/// Replays canned answers in order and records what was asked.
///
/// Runs out as "cancelled" for `input` and "no" for `confirm`.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    inputs: VecDeque<Option<String>>,
    confirms: VecDeque<bool>,
    pub asked: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, text: Option<&str>) -> Self {
        self.inputs.push_back(text.map(str::to_string));
        self
    }

    pub fn confirm_with(mut self, yes: bool) -> Self {
        self.confirms.push_back(yes);
        self
    }
}

impl Prompt for ScriptedPrompt {
    async fn input(&mut self, message: &str) -> Option<String> {
        self.asked.push(message.to_string());
        self.inputs.pop_front().flatten()
    }

    async fn confirm(&mut self, message: &str) -> bool {
        self.asked.push(message.to_string());
        self.confirms.pop_front().unwrap_or(false)
    }
}
