use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tweet_extractor::app::AppContext;
use tweet_extractor::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::new(cli.config)?;

    match cli.command {
        Commands::Serve { host, port } => {
            commands::serve(&ctx, host, port).await?;
        }
        Commands::Extract { url } => {
            commands::extract(&ctx, &url).await?;
        }
        Commands::Batch { urls } => {
            commands::batch(&ctx, &urls).await?;
        }
    }

    Ok(())
}
