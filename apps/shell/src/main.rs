#![allow(clippy::print_stdout)]

mod args;
mod commands;

use crate::args::{Cli, Command};
use anyhow::Context;
use clap::Parser;
use thesis::domain::config::ApiConfig;
use thesis::kernel::config::load_config;
use thesis_logger::{LevelFilter, Logger};

#[thesis_runtime::main(memory_efficient)]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _logger = Logger::builder().name(env!("CARGO_PKG_NAME")).level(LevelFilter::WARN).init()?;

    let cfg: ApiConfig = load_config(Some(&cli.config))
        .with_context(|| format!("Configuration {} is malformed", cli.config.display()))?;

    match cli.command {
        Command::Token { email } => println!("{}", commands::issue_token(&cfg, &email).await?),
        Command::Migrate {} => {
            let report = commands::migrate(&cfg).await?;
            println!("{}", commands::migration_summary(&report));
        },
        Command::Config {} => println!("{}", commands::describe(&cfg)),
    }

    Ok(())
}
