use anyhow::Result;
use autopreneur::{cli, commands, store};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let (config, command) = args.into_config()?;

    // RUST_LOG 优先，其次是 --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config.verbose {
            EnvFilter::new("autopreneur=debug,info")
        } else {
            EnvFilter::new("autopreneur=info,warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    store::ensure_layout(&config)?;
    commands::run(config, command).await
}
