use std::io;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use asub::{Cli, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "asub", &mut io::stdout());
        return Ok(());
    }

    let filter = EnvFilter::try_from_env("ASUB_LOG")
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut config);
    config.validate()?;

    if cli.print_config {
        print!("{}", config.to_toml().context("Failed to serialize configuration")?);
        return Ok(());
    }

    run(config).await
}

#[cfg(target_os = "linux")]
async fn run(config: Config) -> Result<()> {
    use asub::{AlsaSource, Monitor};

    let mut monitor = Monitor::new(AlsaSource::new(), config.selector(), config.monitor_settings(), io::stdout());

    match monitor.run().await {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            tracing::info!("Output closed, exiting");
            Ok(())
        }
        Err(e) => Err(e).context("Failed to write volume"),
        Ok(()) => Ok(()),
    }
}

#[cfg(not(target_os = "linux"))]
async fn run(_config: Config) -> Result<()> {
    Err(asub::SourceError::Unsupported("ALSA is only available on Linux".to_string()).into())
}
