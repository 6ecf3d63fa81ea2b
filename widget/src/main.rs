//! Terminal host for the todo widget.
//!
//! Mounts the widget on a page built from the environment configuration and
//! drives it with commands read from stdin. Type `help` for the command list.

use std::sync::Arc;
use todo_widget::terminal::{Command, HELP, TerminalDialogs};
use todo_widget::{TodoApp, WidgetConfig, WidgetError};
use todo_widget_core::environment::SystemClock;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing (stderr, so it doesn't interleave with the page output)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_widget=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = WidgetConfig::from_env()?;
    info!(
        page_title = %config.page_title,
        missing = ?config.missing_elements,
        "Configuration loaded"
    );

    let terminal = Arc::new(TerminalDialogs::stdio());
    let mut app = TodoApp::mount(
        config.document(),
        terminal.clone(),
        Arc::new(SystemClock),
        config,
    )
    .await;

    terminal.write_line("Todo widget ready. Type `help` for commands.")?;

    loop {
        terminal.write_prompt("> ")?;
        let Some(line) = terminal.read_line()? else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e @ WidgetError::Command(_)) => {
                terminal.write_line(&e.to_string())?;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        match command {
            Command::Quit => break,
            Command::Help => terminal.write_line(HELP)?,
            Command::Show => terminal.write_line(&app.document().to_html())?,
            Command::List => print_list(&terminal, &app)?,
            Command::Dump => {
                let todos = app.todos().await;
                terminal.write_line(&serde_json::to_string_pretty(&todos)?)?;
            }
            other => {
                for event in other.into_events() {
                    app.handle(event).await?;
                }
                print_list(&terminal, &app)?;
            }
        }
    }

    app.store().shutdown();
    info!("Todo widget stopped");
    Ok(())
}

fn print_list(terminal: &TerminalDialogs, app: &TodoApp) -> todo_widget::Result<()> {
    let Some(list) = app.document().list() else {
        return terminal.write_line("(no list on this page)");
    };
    if list.child_count() == 0 {
        return terminal.write_line("(empty)");
    }

    for (n, row) in (1..).zip(list.rows()) {
        let mark = if row.completed_color().is_some() { "x" } else { " " };
        terminal.write_line(&format!("{n:>3}. [{mark}] {}", row.title()))?;
    }
    Ok(())
}
