use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// tether: a main window and popped-out satellite windows kept in sync.
#[derive(Parser, Debug)]
#[command(name = "tether", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the main window. It owns the window registry.
    Main,
    /// Run a satellite showing one popped-out window.
    Satellite {
        /// Key of the window to show.
        #[arg(long)]
        key: String,
    },
}

pub fn parse() -> Args {
    Args::parse()
}
