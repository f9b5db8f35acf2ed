mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use log;
use std::path::Path;
use std::process;

use cli_args::{Cli, Commands, ScanArgs};
use xconcat_core::{AppError, Config};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = exit_code_for(&e);
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn exit_code_for(e: &anyhow::Error) -> i32 {
    // downcast_ref sees through any .context() layers.
    match e.downcast_ref::<AppError>() {
        Some(AppError::Config(_)) => 1,
        Some(AppError::TomlParse(_)) => 1,
        Some(AppError::TomlSerialize(_)) => 1,
        Some(AppError::Io(_)) => 2,
        Some(AppError::FileRead { .. }) => 2,
        Some(AppError::FileWrite { .. }) => 2,
        Some(AppError::WalkDir(_)) => 2,
        Some(AppError::InvalidArgument(_)) => 5,
        Some(_) => 1,
        None => 1,
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    // Warn by default so skipped files show up on stderr as they happen.
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    match cli.command {
        None => {
            log::debug!("No subcommand given, running scan...");
            commands::scan::handle_scan_command(&cli.scan, quiet)?;
        }
        Some(Commands::Scan(args)) => {
            log::debug!("Executing 'scan' command...");
            commands::scan::handle_scan_command(&args, quiet)?;
        }
        Some(Commands::Debug(args)) => {
            log::debug!("Executing 'debug' command...");
            commands::debug::handle_debug_command(&args)?;
        }
        Some(Commands::Config(args)) => {
            log::debug!("Executing 'config' command...");
            commands::config::handle_config_command(&args, quiet)?;
        }
        Some(Commands::Completion(args)) => {
            log::debug!("Executing 'completion' command...");
            commands::completion::handle_completion_command(&args, quiet)?;
        }
    }
    Ok(())
}

fn merge_config_with_cli_overrides(mut config: Config, args: &ScanArgs) -> Config {
    log::trace!("Applying CLI overrides to config...");

    if let Some(filename) = &args.output {
        config.output.filename = filename.clone();
    }
    if let Some(max_bytes) = &args.max_bytes {
        config.output.max_bytes = Some(max_bytes.clone());
    }
    if args.no_rules {
        config.general.use_rules_file = false;
    }

    log::trace!("Config after CLI overrides: {:?}", config);
    config
}

/// Loads the config file (if any) for `project_root` and applies CLI overrides.
pub fn load_config_for_command(project_root: &Path, args: &ScanArgs) -> Result<Config> {
    let config_path = Config::resolve_config_path(
        project_root,
        args.project_config.config_file.as_ref(),
        args.project_config.disable_config_file,
    )
    .context("Failed to resolve configuration path")?;

    let config = match &config_path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    // Flags win over the file; validate only the merged result.
    let config = merge_config_with_cli_overrides(config, args);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
