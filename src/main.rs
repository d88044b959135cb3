use clap::Parser;
use readeck_omnivore::config::{Cli, Config};
use readeck_omnivore::omnivore::OmnivoreClient;
use readeck_omnivore::readeck::ReadeckClient;
use readeck_omnivore::sync::{self, SyncOptions};
use readeck_omnivore::unpack_error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // .env is optional; real env vars win over it
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .json()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!("readeck-omnivore starting");

    let loaded = match &args.config_path {
        Some(path) => Config::new(path),
        None => Config::from_env(),
    };
    let mut cfg = loaded.unwrap_or_else(|e| {
        tracing::error!(error = %format!("{:#}", e), path = ?args.config_path, "failed to load config");
        std::process::exit(1);
    });
    cfg.strict |= args.strict;

    let readeck = ReadeckClient::new(&cfg.readeck).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup readeck client");
        std::process::exit(1);
    });
    let omnivore = OmnivoreClient::new(&cfg.omnivore, cfg.strict).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup omnivore client");
        std::process::exit(1);
    });

    let opts = SyncOptions {
        dry_run: args.dry_run,
    };
    if let Err(e) = sync::run(&readeck, &omnivore, opts).await {
        tracing::error!(error = %unpack_error(&e), "sync aborted");
        std::process::exit(1);
    }
}
