//! dynq CLI entry point.

use anyhow::Result;
use clap::Parser;
use dynq_client::app;
use dynq_client::cli::Cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays pure JSON.
    let default_filter = if cli.verbose {
        "dynq=debug,dynq_client=debug,dynq_core=debug"
    } else {
        "dynq=warn,dynq_client=warn,dynq_core=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    app::run(&cli).await?;

    Ok(())
}
