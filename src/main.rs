//! DevEUI Worker Entry Point
//!
//! `serve` runs the idempotent HTTP issuance API; `issue` registers a target
//! number of fresh DevEUIs and prints them, one per line, to stdout.

use clap::{Parser, Subcommand};
use deveui_worker::config::{AppConfig, RegistrarKind};
use deveui_worker::{init_logging, issue, serve};

#[derive(Parser)]
#[command(name = "deveui-worker")]
#[command(about = "Issue and register LoRaWAN DevEUIs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP issuance server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(long, env = "DEVEUI_PORT")]
        port: Option<u16>,
    },
    /// Register fresh DevEUIs until the target count is reached
    Issue {
        /// Number of DevEUIs to register (overrides config)
        #[arg(long)]
        target: Option<usize>,

        /// Concurrent registration workers (overrides config)
        #[arg(long)]
        workers: Option<usize>,

        /// Count DevEUIs the service already holds as registered
        #[arg(long)]
        accept_already_registered: bool,

        /// Accept every DevEUI without calling the onboarding service
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = AppConfig::load()?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;
            init_logging(&config);

            serve(config).await
        }
        Commands::Issue {
            target,
            workers,
            accept_already_registered,
            dry_run,
        } => {
            if let Some(target) = target {
                config.issuance.target = target;
            }
            if let Some(workers) = workers {
                config.issuance.workers = workers;
            }
            config.registrar.accept_already_registered |= accept_already_registered;
            if dry_run {
                config.registrar.kind = RegistrarKind::DryRun;
            }
            config.validate()?;
            init_logging(&config);

            let report = issue(&config).await?;

            tracing::info!(registered = report.registered.len(), "Issued DevEUIs");
            for eui in report.sorted() {
                println!("{eui}");
            }

            Ok(())
        }
    }
}
