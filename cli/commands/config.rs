use crate::cli_args::ConfigArgs;
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use xconcat_core::config::{DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME};
use xconcat_core::{AppError, Config};

pub fn handle_config_command(args: &ConfigArgs, quiet: bool) -> Result<()> {
    let default_toml = Config::default()
        .to_toml_string()
        .context("Failed to serialize default config")?;

    if !args.save {
        print!("{}", default_toml);
        return Ok(());
    }

    let project_root = Config::determine_project_root(args.project_config.project_root.as_ref())
        .context("Failed to determine project root")?;
    let config_dir = project_root.join(DEFAULT_CONFIG_DIR);
    let config_path = config_dir.join(DEFAULT_CONFIG_FILENAME);

    if config_path.exists() && !args.force {
        anyhow::bail!(AppError::InvalidArgument(format!(
            "Config file already exists at '{}'. Use --force to overwrite.",
            config_path.display()
        )));
    }

    fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create directory {}", config_dir.display()))?;
    fs::write(&config_path, default_toml)
        .with_context(|| format!("Failed to write config file {}", config_path.display()))?;

    if !quiet {
        println!(
            "{} Default config saved to: {}",
            "✅".green(),
            config_path.display().to_string().blue()
        );
    }
    Ok(())
}
