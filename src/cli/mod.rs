pub mod doctor;
pub mod init;
pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "taxa")]
#[command(version)]
#[command(about = "A lightweight taxonomy REST service", long_about = None)]
pub struct Cli {
    #[arg(short, long, default_value = "taxa.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config file and create the data directories
    Init {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Run migrations and start the HTTP server
    Serve {
        /// Override [server].host from the config
        #[arg(short = 'H', long)]
        host: Option<String>,
        /// Override [server].port from the config
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Apply pending database migrations and exit
    Migrate,
    /// Run health checks, including the media reachability probe
    Doctor,
}
