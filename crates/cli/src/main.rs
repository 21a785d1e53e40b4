use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;

use catalog_app::fixtures;
use catalog_kernel::settings::Settings;

/// Book and author catalog
#[derive(Debug, Parser)]
#[command(name = "catalog", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the JSON API
    Serve {
        /// Override `server.port`
        #[arg(long)]
        port: Option<u16>,
        /// Start with empty collections
        #[arg(long)]
        no_fixtures: bool,
    },
    /// Print the fixture authors and books as JSON
    Fixtures,
    /// Print the effective configuration as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load().with_context(|| "failed to load catalog settings")?;

    match cli.command {
        Command::Serve { port, no_fixtures } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            if no_fixtures {
                settings.fixtures.load_on_start = false;
            }

            catalog_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "catalog CLI serving");
            catalog_app::run(settings).await
        }
        Command::Fixtures => print_json(&json!({
            "authors": fixtures::AUTHORS,
            "books": fixtures::BOOKS,
        })),
        Command::Config => print_json(&settings),
    }
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{rendered}");
    Ok(())
}
