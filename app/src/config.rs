//! Command line and environment settings.
//!
//! Values come from flags, then from the environment (a `.env` file in the
//! working directory is loaded first when present).

use clap::Parser;
use todo_core::TodoClient;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(name = "todo")]
#[command(about = "Keep a todo list in a hosted todos table")]
#[command(version)]
pub struct Args {
    /// Base URL of the hosted project
    #[arg(long, env = "SUPABASE_URL", value_name = "URL")]
    pub url: String,

    /// API key sent with every request
    #[arg(long, env = "SUPABASE_ANON_KEY", value_name = "KEY", hide_env_values = true)]
    pub anon_key: String,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Load `.env` if there is one, then parse the process arguments.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }

    pub fn client(&self) -> TodoClient {
        TodoClient::new(&self.url, &self.anon_key)
    }

    /// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if self.verbose { "debug" } else { "info" })
        })
    }
}
