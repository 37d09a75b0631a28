use anyhow::Context;
use todo_app::{run, App, Args, Terminal};
use todo_core::{TodoService, UreqTransport};
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::load();

    // Diagnostics go to stderr so they never interleave with the list.
    tracing_subscriber::fmt()
        .with_env_filter(args.log_filter())
        .with_writer(std::io::stderr)
        .init();

    info!(url = %args.url, "starting");

    let service = TodoService::new(args.client(), UreqTransport::new());
    let mut terminal = Terminal::spawn();
    run(App::new(service), &mut terminal)
        .await
        .context("terminal I/O failed")?;

    Ok(())
}
