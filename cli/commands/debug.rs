use crate::cli_args::ScanArgs;
use crate::load_config_for_command;
use crate::output::print_path_list;
use anyhow::{Context, Result};
use colored::*;
use log;
use xconcat_core::{self as core, Config};

pub fn handle_debug_command(args: &ScanArgs) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.project_root.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let config = load_config_for_command(&project_root, args)
        .context("Failed to load configuration for debug command")?;

    log::debug!("Debug: Planning scan...");
    let planned = core::plan_scan(&project_root, &config)
        .context("Failed to gather file list for debug")?;
    let planned: Vec<String> = planned
        .iter()
        .map(|p| core::relative_display(p, &project_root))
        .collect();

    println!(
        "{}",
        "\n--- Effective Configuration ---"
            .green()
            .bold()
            .underline()
    );
    let config_toml = config
        .to_toml_string()
        .context("Failed to serialize effective config to TOML")?;
    println!("{}", config_toml);

    println!("{} {}", "Project root:".green(), project_root.display().to_string().cyan());
    let next_output = core::unique_output_path(
        &config.output_base_path(&project_root),
        config.output.max_name_attempts,
    );
    println!(
        "{} {}",
        "Next output file:".green(),
        core::relative_display(&next_output.path, &project_root).cyan()
    );

    print_path_list("Files To Include", &planned);
    println!("{}", "\n--- End Debug Info ---".green().bold());
    Ok(())
}
