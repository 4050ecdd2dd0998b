//! CLI entry point for chromawise.

use std::io;

use clap::{CommandFactory, Parser};
use color_eyre::eyre::{Result, WrapErr, bail};
use tracing::info;

use chromawise::cli::{Cli, render};
use chromawise::commands;
use chromawise::config::ToolConfig;
use chromawise::logging::init_logging;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "chromawise", &mut io::stdout());
        return Ok(());
    }

    let config = ToolConfig::layered(cli.config.as_deref(), &cli.to_config_overrides())
        .wrap_err("Failed to load configuration")?;

    let _guard = init_logging(&config.logging.file, &config.logging.level)
        .wrap_err("Failed to start logging")?;
    info!(config = ?cli.config, "Starting chromawise");

    if let Some(ref path) = cli.save_config {
        config
            .save(path)
            .wrap_err_with(|| format!("Failed to write config to {}", path.display()))?;
        eprintln!("Wrote config to {}", path.display());
    }

    let Some(ref command) = cli.command else {
        if cli.save_config.is_some() {
            return Ok(());
        }
        Cli::command().print_help()?;
        bail!("No command given");
    };

    let outcome = commands::run(command, &config)?;
    print!("{}", render(&outcome.output, config.output.format)?);

    if !outcome.passed {
        bail!("Check failed");
    }

    Ok(())
}
