//! Interactive todo list on stdin/stdout.
//!
//! Configuration comes from `TODO_*` environment variables (see
//! [`todo::Config`]); logs go to stderr.

use std::io::Write;
use todo::{Command, Config, Step, TodoApp, TodoHandle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(&config.log_filter)?)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!(?config, "Configuration loaded");

    let todos = TodoHandle::with_config(config.environment(), config.store_config());
    let mut app = TodoApp::new(todos.clone());

    println!("What's today's plan? (`help` lists commands)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} > ", app.prompt());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(error) => {
                println!("{error}");
                continue;
            },
        };

        match app.execute(command).await? {
            Step::Continue(out) if out.is_empty() => {},
            Step::Continue(out) => println!("{out}"),
            Step::Quit => break,
        }
    }

    todos.close();
    Ok(())
}
