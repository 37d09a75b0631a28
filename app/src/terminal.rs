//! Line-oriented terminal front end.
//!
//! Stdin is read on a plain thread and forwarded over a channel, so waiting
//! for input never blocks the event loop and never holds up shutdown.

use std::io::{self, BufRead, IsTerminal, Write};

use tokio::sync::mpsc;
use tracing::debug;

use crate::prompt::Prompt;

/// Where the event loop reads commands and draws the screen.
#[allow(async_fn_in_trait)]
pub trait Console: Prompt {
    /// Next input line, or `None` once input is exhausted.
    async fn read_line(&mut self) -> Option<String>;

    /// Replace what is shown with `screen`.
    fn draw(&mut self, screen: &str) -> io::Result<()>;

    /// Show a one-off message below the screen.
    fn notice(&mut self, message: &str) -> io::Result<()>;
}

pub struct Terminal {
    lines: mpsc::UnboundedReceiver<String>,
    out: io::Stdout,
    clear: bool,
}

impl Terminal {
    /// Start reading stdin. The screen is cleared between frames only when
    /// stdout is a terminal.
    pub fn spawn() -> Self {
        let (tx, lines) = mpsc::unbounded_channel();
        std::thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
            debug!("stdin closed");
        });

        let out = io::stdout();
        let clear = out.is_terminal();
        Self { lines, out, clear }
    }

    fn ask(&mut self, message: &str) -> io::Result<()> {
        let mut out = self.out.lock();
        write!(out, "{message} ")?;
        out.flush()
    }
}

impl Prompt for Terminal {
    async fn input(&mut self, message: &str) -> Option<String> {
        self.ask(message).ok()?;
        self.lines.recv().await
    }

    async fn confirm(&mut self, message: &str) -> bool {
        if self.ask(&format!("{message} [y/N]")).is_err() {
            return false;
        }
        self.lines
            .recv()
            .await
            .is_some_and(|answer| is_yes(&answer))
    }
}

impl Console for Terminal {
    async fn read_line(&mut self) -> Option<String> {
        self.lines.recv().await
    }

    fn draw(&mut self, screen: &str) -> io::Result<()> {
        let mut out = self.out.lock();
        if self.clear {
            write!(out, "\x1b[2J\x1b[H")?;
        } else {
            writeln!(out)?;
        }
        write!(out, "{screen}")?;
        out.flush()
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        let mut out = self.out.lock();
        writeln!(out, "{message}")?;
        out.flush()
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
