//! The list component: owns `TodoState`, turns user commands into table calls
//! and folds their results back in.
//!
//! # Design
//! All state changes happen on the task driving `App`. Table calls run on
//! tokio's blocking pool and report back as `Settled` messages over an
//! unbounded channel, so the component keeps taking input while requests are
//! in flight. Nothing serializes overlapping writes: a result is applied to
//! whatever the list looks like when it arrives.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use todo_core::{ApiError, Todo, TodoPatch, TodoService, Transport};
use tracing::{debug, warn};

use crate::command::{Command, HELP};
use crate::prompt::{Prompt, DELETE_PROMPT, EDIT_PROMPT};
use crate::render::render;
use crate::state::{PendingAdd, PendingDelete, TodoState};
use crate::terminal::Console;

/// Result of a table call, ready to be applied to the state.
#[derive(Debug)]
pub enum Settled {
    Loaded(Result<Vec<Todo>, ApiError>),
    Added(PendingAdd, Result<Todo, ApiError>),
    Edited(i64, Result<Todo, ApiError>),
    Deleted(PendingDelete, Result<(), ApiError>),
}

/// Whether the input loop should keep going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<T> {
    service: Arc<TodoService<T>>,
    state: TodoState,
    settled_tx: mpsc::UnboundedSender<Settled>,
    settled_rx: mpsc::UnboundedReceiver<Settled>,
    in_flight: usize,
}

impl<T> App<T>
where
    T: Transport + Send + Sync + 'static,
{
    pub fn new(service: TodoService<T>) -> Self {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        Self {
            service: Arc::new(service),
            state: TodoState::new(),
            settled_tx,
            settled_rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &TodoState {
        &self.state
    }

    /// Number of table calls whose results have not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn spawn<F>(&mut self, call: F)
    where
        F: FnOnce(&TodoService<T>) -> Settled + Send + 'static,
    {
        let service = Arc::clone(&self.service);
        let tx = self.settled_tx.clone();
        self.in_flight += 1;
        tokio::task::spawn_blocking(move || {
            // The receiver is gone once the component has been dropped;
            // a late result is simply discarded.
            let _ = tx.send(call(&service));
        });
    }

    /// Start the initial fetch.
    pub fn mount(&mut self) {
        self.spawn(|service| Settled::Loaded(service.list()));
    }

    /// Type `text` into the input and press Add.
    pub fn submit(&mut self, text: &str) {
        self.state.set_task(text);
        self.add();
    }

    /// Press Add. Ignored for blank input or while a save is in flight.
    pub fn add(&mut self) {
        let Some(pending) = self.state.begin_add(Utc::now().timestamp_millis()) else {
            debug!("add ignored");
            return;
        };
        self.spawn(move |service| {
            let result = service.create(&pending.task);
            Settled::Added(pending, result)
        });
    }

    /// Ask for replacement text, then update once the user answers.
    pub async fn edit<P: Prompt>(&mut self, id: i64, prompt: &mut P) {
        let Some(task) = prompt.input(EDIT_PROMPT).await.filter(|t| !t.is_empty()) else {
            return;
        };
        let patch = TodoPatch::task(task);
        self.spawn(move |service| Settled::Edited(id, service.update(id, &patch)));
    }

    /// Ask for confirmation, then remove the row at once and delete remotely.
    pub async fn delete<P: Prompt>(&mut self, id: i64, prompt: &mut P) {
        if !prompt.confirm(DELETE_PROMPT).await {
            return;
        }
        let pending = self.state.begin_delete(id);
        self.spawn(move |service| {
            let result = service.delete(pending.id);
            Settled::Deleted(pending, result)
        });
    }

    pub async fn handle<P: Prompt>(&mut self, command: Command, prompt: &mut P) -> Flow {
        match command {
            Command::Submit(text) => self.submit(&text),
            Command::Add => self.add(),
            Command::Edit(row) => match self.id_at(row) {
                Some(id) => self.edit(id, prompt).await,
                None => warn!(row, "no such row"),
            },
            Command::Delete(row) => match self.id_at(row) {
                Some(id) => self.delete(id, prompt).await,
                None => warn!(row, "no such row"),
            },
            Command::List | Command::Help => {}
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn id_at(&self, row: usize) -> Option<i64> {
        self.state.todo_at(row).map(|todo| todo.id)
    }

    pub fn apply(&mut self, settled: Settled) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match settled {
            Settled::Loaded(result) => self.state.finish_load(result),
            Settled::Added(pending, result) => self.state.finish_add(pending, result),
            Settled::Edited(id, result) => self.state.finish_edit(id, result),
            Settled::Deleted(pending, result) => self.state.finish_delete(pending, result),
        }
    }

    /// Wait for the next finished table call.
    pub async fn next_settled(&mut self) -> Option<Settled> {
        self.settled_rx.recv().await
    }

    /// Apply results until no call is in flight.
    pub async fn settle_all(&mut self) {
        while self.in_flight > 0 {
            match self.settled_rx.recv().await {
                Some(settled) => self.apply(settled),
                None => break,
            }
        }
    }
}

/// Drive the component from a console until `/quit` or end of input.
///
/// On end of input the calls already issued are allowed to finish so the last
/// screen shows their outcome; `/quit` leaves immediately.
pub async fn run<T, C>(mut app: App<T>, console: &mut C) -> std::io::Result<()>
where
    T: Transport + Send + Sync + 'static,
    C: Console,
{
    app.mount();
    console.draw(&render(app.state()))?;

    loop {
        let mut notice = None;
        tokio::select! {
            line = console.read_line() => {
                let Some(line) = line else {
                    app.settle_all().await;
                    console.draw(&render(app.state()))?;
                    break;
                };
                match line.parse::<Command>() {
                    Ok(Command::Help) => notice = Some(HELP.to_string()),
                    Ok(command) => {
                        if app.handle(command, console).await == Flow::Quit {
                            break;
                        }
                    }
                    Err(err) => notice = Some(err.to_string()),
                }
            }
            Some(settled) = app.next_settled() => app.apply(settled),
        }
        console.draw(&render(app.state()))?;
        if let Some(message) = notice {
            console.notice(&message)?;
        }
    }

    if app.in_flight() > 0 {
        debug!(pending = app.in_flight(), "exiting with calls in flight");
    }
    Ok(())
}
