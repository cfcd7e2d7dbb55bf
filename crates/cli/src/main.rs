use anyhow::Context;
use clap::{Parser, Subcommand};

use adoptme_app::App;
use adoptme_kernel::settings::Settings;

/// Pet adoption API command line
#[derive(Debug, Parser)]
#[command(name = "adoptme", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Override `server.host`
        #[arg(long)]
        host: Option<String>,
        /// Override `server.port`
        #[arg(long)]
        port: Option<u16>,
    },
    /// Insert mock users and pets into the snapshot database
    Seed {
        #[arg(long, default_value_t = 10)]
        users: usize,
        #[arg(long, default_value_t = 10)]
        pets: usize,
    },
    /// Print the effective settings as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load().context("failed to load settings")?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            adoptme_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "adoptme serve starting");

            App::bootstrap(settings).await?.serve().await
        }
        Command::Seed { users, pets } => {
            adoptme_telemetry::init(&settings.telemetry)?;

            let app = App::bootstrap(settings).await?;
            let generated = app.seed(users, pets).await?;
            println!(
                "seeded {} users and {} pets",
                generated.users.map_or(0, |batch| batch.quantity),
                generated.pets.map_or(0, |batch| batch.quantity),
            );
            Ok(())
        }
        Command::Config => {
            let rendered =
                serde_json::to_string_pretty(&settings).context("failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
    }
}
