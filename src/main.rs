use clap::Parser;
use taxa::cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taxa=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { path }) => {
            taxa::cli::init::run(&path)?;
        }
        Some(Commands::Serve { host, port }) => {
            taxa::cli::serve::run(&cli.config, host, port).await?;
        }
        Some(Commands::Migrate) => {
            taxa::cli::migrate::run(&cli.config)?;
        }
        Some(Commands::Doctor) => {
            taxa::cli::doctor::run(&cli.config).await?;
        }
        None => {
            // No subcommand provided, print help
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
