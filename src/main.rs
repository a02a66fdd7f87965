use std::io;
use std::path::Path;

use clap::Parser;
use hmic::cli::{Cli, Commands};
use hmic::config::Config;
use hmic::output::Printer;
use miette::Result;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn load_config(explicit: Option<&Path>) -> hmic::Result<Config> {
    let cwd = std::env::current_dir()?;
    Config::discover(explicit, &cwd)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let printer = Printer::new();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Encode(args) => {
            hmic::cli::encode::run(args, &load_config(config_path)?, &printer)?;
        }
        Commands::Info(args) => {
            hmic::cli::info::run(args, &load_config(config_path)?, &printer)?;
        }
        Commands::Render(args) => {
            hmic::cli::render::run(args, &load_config(config_path)?, &printer)?;
        }
        Commands::Validate(args) => {
            hmic::cli::validate::run(args, &load_config(config_path)?, &printer)?;
        }
        Commands::Completions(args) => hmic::cli::completions::run(args)?,
    }

    Ok(())
}
