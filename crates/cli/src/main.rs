use anyhow::Context;
use clap::{Parser, Subcommand};
use stacks_kernel::settings::Settings;

/// Library record service
#[derive(Debug, Parser)]
#[command(name = "stacks", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service (default)
    Serve,
    /// Apply pending schema migrations and exit
    Migrate,
    /// Load settings, report the effective values and exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load settings")?;
    stacks_telemetry::init(&settings.telemetry)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => stacks_app::app::serve(&settings).await,
        Command::Migrate => {
            let applied = stacks_app::app::migrate(&settings).await?;
            tracing::info!(applied, db = %settings.database.url, "migrations complete");
            println!("applied {applied} migration(s)");
            Ok(())
        }
        Command::CheckConfig => {
            tracing::info!(
                env = ?settings.environment,
                host = %settings.server.host,
                port = settings.server.port,
                request_timeout_ms = settings.server.request_timeout_ms,
                db = %settings.database.url,
                max_connections = settings.database.max_connections,
                log_format = ?settings.telemetry.log_format,
                "configuration loaded"
            );
            println!("configuration ok ({})", settings.environment.as_str());
            Ok(())
        }
    }
}
