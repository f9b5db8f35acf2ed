use anyhow::{Context, Result};
use byte_unit::{Byte, UnitType};
use colored::*;
use std::io::{self, Write};
use xconcat_core::{ScanOutcome, SkipReason};

// --- Public Output Functions ---

pub fn print_scan_report(outcome: &ScanOutcome, output_display: &str, quiet: bool) -> Result<()> {
    if quiet {
        return Ok(());
    }
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_scan_report(&mut handle, outcome, output_display)
        .context("Failed to write scan report to stdout")?;
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

/// Writes the end-of-run report: naming warning, skipped files, one line per
/// scanned file, then the summary and closing lines.
pub fn write_scan_report<W: Write>(
    out: &mut W,
    outcome: &ScanOutcome,
    output_display: &str,
) -> io::Result<()> {
    if outcome.naming_exhausted {
        writeln!(
            out,
            "{}",
            format!("Max output file limit reached! Overwriting {}", output_display).yellow()
        )?;
    }

    for skipped in &outcome.skipped {
        match &skipped.reason {
            SkipReason::Unreadable(error) => writeln!(
                out,
                "Skipping file {} due to error: {}",
                skipped.relative_path, error
            )?,
            SkipReason::SizeLimit { limit } => writeln!(
                out,
                "Skipping file {} due to output size limit of {}",
                skipped.relative_path,
                readable_size(*limit)
            )?,
        }
    }

    for scanned in &outcome.scanned {
        writeln!(out, "Scanned and added: {}", scanned)?;
    }

    writeln!(
        out,
        "Scanned and added {} files to {}.",
        outcome.scanned_count(),
        output_display
    )?;
    writeln!(out, "All contents written to {}.", output_display)?;
    Ok(())
}

pub fn readable_size(bytes: u64) -> String {
    Byte::from_u64(bytes)
        .get_appropriate_unit(UnitType::Binary)
        .to_string()
}

pub fn print_path_list(title: &str, paths: &[String]) {
    println!("{}", format!("\n--- {} ---", title).green().bold().underline());
    if paths.is_empty() {
        println!("{}", "(None)".dimmed());
    } else {
        paths.iter().for_each(|p| println!("- {}", p.cyan()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use xconcat_core::SkippedFile;

    fn outcome() -> ScanOutcome {
        ScanOutcome {
            output_path: PathBuf::from("/project/output.rtf"),
            scanned: vec!["a.txt".to_string(), "src/main.rs".to_string()],
            skipped: vec![SkippedFile {
                relative_path: "logo.png".to_string(),
                reason: SkipReason::Unreadable("invalid utf-8".to_string()),
            }],
            bytes_written: 42,
            naming_exhausted: false,
        }
    }

    fn render(outcome: &ScanOutcome) -> String {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        write_scan_report(&mut buffer, outcome, "output.rtf").unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn report_lists_skips_then_scans_then_summary() {
        let report = render(&outcome());
        assert_eq!(
            report,
            "Skipping file logo.png due to error: invalid utf-8\n\
             Scanned and added: a.txt\n\
             Scanned and added: src/main.rs\n\
             Scanned and added 2 files to output.rtf.\n\
             All contents written to output.rtf.\n"
        );
    }

    #[test]
    fn exhausted_naming_adds_warning_first() {
        let mut exhausted = outcome();
        exhausted.naming_exhausted = true;
        let report = render(&exhausted);
        assert!(report.starts_with("Max output file limit reached! Overwriting output.rtf\n"));
    }

    #[test]
    fn size_limit_skip_is_reported() {
        let mut limited = outcome();
        limited.skipped = vec![SkippedFile {
            relative_path: "big.log".to_string(),
            reason: SkipReason::SizeLimit { limit: 2048 },
        }];
        let report = render(&limited);
        assert!(report.contains("Skipping file big.log due to output size limit of 2"));
        assert!(report.contains("KiB"));
    }

    #[test]
    fn empty_scan_still_summarizes() {
        let empty = ScanOutcome {
            scanned: Vec::new(),
            skipped: Vec::new(),
            ..outcome()
        };
        let report = render(&empty);
        assert_eq!(
            report,
            "Scanned and added 0 files to output.rtf.\nAll contents written to output.rtf.\n"
        );
    }
}
