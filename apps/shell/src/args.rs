//! Command-line surface of the admin shell.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "thesis-shell")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Administration toolkit for a ThesisHub deployment")]
pub(crate) struct Cli {
    /// Configuration file, without extension (`server` loads `server.toml`)
    #[arg(short, long, global = true, env = "THESIS_CONFIG", default_value = "server")]
    pub(crate) config: PathBuf,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Issue a bearer token for an active account
    Token {
        /// Account email
        #[arg(short, long)]
        email: String,
    },
    /// Apply pending database migrations
    Migrate {},
    /// Print the effective configuration (secrets masked)
    Config {},
}
