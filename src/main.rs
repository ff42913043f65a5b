use clap::{Parser, Subcommand};
use subscriptions_api::config::AppConfig;
use subscriptions_api::server;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "subscriptions-api")]
#[command(about = "Subscription tracking service with spend summaries")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Apply pending database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load_validated() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config);

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting Subscriptions API");
            server::serve(config).await
        }
        Command::Migrate => {
            info!("Running database migrations");
            server::migrate(config).await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Subscriptions API exited with error");
        std::process::exit(1);
    }
}

fn init_tracing(config: &AppConfig) {
    let filter =
        EnvFilter::try_new(&config.server.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
