#[cfg(feature = "cli")]
pub mod cli;
pub mod loader;
pub mod toml_config;

pub use loader::Catalog;
pub use toml_config::AppConfig;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "profit-calc")]
#[command(about = "Marketplace seller profit calculator")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Directory of marketplace JSON files (overrides the config file)
    #[arg(long, global = true)]
    pub marketplaces_dir: Option<String>,

    /// Directory of shipping carrier JSON files (overrides the config file)
    #[arg(long, global = true)]
    pub shipping_dir: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    /// Also write logs to a daily file in this directory (overrides the config file)
    #[arg(long, global = true)]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show configured marketplaces, tiers, carriers and services
    List,
    /// Calculate profit for one sale
    Calculate(cli::CalculateArgs),
}
