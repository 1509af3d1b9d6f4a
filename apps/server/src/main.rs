use anyhow::Context;
use thesis::domain::config::{ApiConfig, LoggingConfig};
use thesis::kernel::config::load_config;
use thesis_logger::{LevelFilter, Logger};
use thesis_server::Server;

#[thesis_runtime::main(high_performance)]
async fn main() -> anyhow::Result<()> {
    let cfg: ApiConfig =
        load_config(Some("server")).context("Critical: Configuration is malformed")?;

    let _log = init_logger(&cfg.logging)?;

    Server::builder().config(cfg).build().await?.run().await
}

fn init_logger(logging: &LoggingConfig) -> anyhow::Result<Logger> {
    let level: LevelFilter =
        logging.level.parse().with_context(|| format!("Invalid log level '{}'", logging.level))?;

    let mut builder = Logger::builder().name(env!("CARGO_PKG_NAME")).level(level);
    if let Some(filter) = &logging.filter {
        builder = builder.env_filter(filter);
    }
    if let Some(directory) = &logging.directory {
        builder = builder.directory(directory).json(logging.json);
    }
    Ok(builder.init()?)
}
