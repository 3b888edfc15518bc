use clap::Parser;
use tracing_subscriber::EnvFilter;

use bucketfs::cli;
use bucketfs::error::Result;
use bucketfs::storage::StorageClient;

use bucketfs::cli::Args;
use bucketfs::config::load_storage_config;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Logs go to stderr so stdout carries only keys.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .try_init();

    if let Err(e) = run_app(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_app(args: Args) -> Result<()> {
    let config = load_storage_config()?;
    let client = StorageClient::from_config(&config);
    cli::run(args, client).await?;
    Ok(())
}
