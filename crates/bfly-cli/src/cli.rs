use std::net::SocketAddr;
use std::path::PathBuf;

use bfly_types::Collection;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bfly",
    about = "Butterfly API — butterflies, users, and their ratings over HTTP",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Replace the store file with the demo dataset
    InitDb(InitDbArgs),
    /// Validate a JSON record file against a collection's schema
    Check(CheckArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Listen address; overrides config and PORT
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Store file; overrides config and BFLY_DB_PATH
    #[arg(long)]
    pub db: Option<PathBuf>,
}

#[derive(Args)]
pub struct InitDbArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub db: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckArgs {
    /// butterflies, users, or ratings
    pub collection: Collection,
    pub file: PathBuf,
}
