use crate::cli_args::ScanArgs;
use crate::load_config_for_command;
use crate::output;
use anyhow::{Context, Result};
use log;
use xconcat_core::{self as core, Config};

pub fn handle_scan_command(args: &ScanArgs, quiet: bool) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.project_root.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let config =
        load_config_for_command(&project_root, args).context("Failed to load configuration")?;

    let outcome = core::run_scan(&project_root, &config)
        .with_context(|| format!("Failed to scan {}", project_root.display()))?;
    log::info!(
        "Wrote {} to {}",
        output::readable_size(outcome.bytes_written),
        outcome.output_path.display()
    );

    let output_display = core::relative_display(&outcome.output_path, &project_root);
    output::print_scan_report(&outcome, &output_display, quiet)
}
