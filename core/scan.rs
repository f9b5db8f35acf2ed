use crate::config::Config;
use crate::error::{AppError, Result};
use crate::exclusion::ExclusionSet;
use crate::gather::{WalkFilter, gather_files};
use crate::naming::unique_output_path;
use crate::rules::load_rules;
use crate::writer::{OutputWriter, format_block};
use log;
use std::collections::HashSet;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Not valid UTF-8, or permission denied.
    Unreadable(String),
    /// Appending the file would exceed the configured output size cap.
    SizeLimit { limit: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub relative_path: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub output_path: PathBuf,
    /// Relative paths in the order they were written.
    pub scanned: Vec<String>,
    pub skipped: Vec<SkippedFile>,
    pub bytes_written: u64,
    /// The naming series was used up and an existing artifact was overwritten.
    pub naming_exhausted: bool,
}

impl ScanOutcome {
    pub fn scanned_count(&self) -> usize {
        self.scanned.len()
    }
}

pub fn relative_display(path: &Path, project_root: &Path) -> String {
    pathdiff::diff_paths(path, project_root)
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

fn load_exclusions(project_root: &Path, config: &Config) -> Result<ExclusionSet> {
    let patterns = if config.general.use_rules_file {
        load_rules(project_root, &config.general.rules_file)?
    } else {
        log::debug!("Rules file disabled, using denylist only.");
        HashSet::new()
    };
    Ok(ExclusionSet::new(project_root, &patterns))
}

/// Files a scan would include, without creating any output.
pub fn plan_scan(project_root: &Path, config: &Config) -> Result<Vec<PathBuf>> {
    let exclusions = load_exclusions(project_root, config)?;
    let filter = WalkFilter::new(project_root, config, exclusions);
    gather_files(project_root, &filter)
}

#[derive(Debug)]
enum ReadOutcome {
    Text(String),
    Unreadable(String),
}

fn read_text(path: &Path) -> Result<ReadOutcome> {
    match fs::read(path) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Ok(ReadOutcome::Text(text)),
            Err(e) => Ok(ReadOutcome::Unreadable(e.utf8_error().to_string())),
        },
        Err(e) => classify_read_error(path, e),
    }
}

/// Permission-denied is the only I/O failure a scan recovers from.
fn classify_read_error(path: &Path, err: io::Error) -> Result<ReadOutcome> {
    if err.kind() == ErrorKind::PermissionDenied {
        return Ok(ReadOutcome::Unreadable(err.to_string()));
    }
    Err(AppError::FileRead {
        path: path.to_path_buf(),
        source: err,
    })
}

/// Walks `project_root` and concatenates every included text file into a
/// freshly named output artifact inside it.
///
/// Undecodable and permission-denied files are skipped and reported in the
/// outcome. Any other I/O error aborts the scan; the output file is closed
/// either way.
pub fn run_scan(project_root: &Path, config: &Config) -> Result<ScanOutcome> {
    log::info!("Starting scan of: {}", project_root.display());
    config.validate()?;
    let max_bytes = config.get_max_output_bytes()?;
    let exclusions = load_exclusions(project_root, config)?;

    let named = unique_output_path(
        &config.output_base_path(project_root),
        config.output.max_name_attempts,
    );
    let mut writer = OutputWriter::create(&named.path, max_bytes)?;

    let filter = WalkFilter::new(project_root, config, exclusions).with_output_path(writer.path());
    let files = gather_files(project_root, &filter)?;

    let mut scanned = Vec::with_capacity(files.len());
    let mut skipped = Vec::new();
    for path in files {
        let relative_path = relative_display(&path, project_root);
        let contents = match read_text(&path)? {
            ReadOutcome::Text(text) => text,
            ReadOutcome::Unreadable(reason) => {
                // Logged now as well: a later fatal read drops the outcome.
                log::warn!("Skipping unreadable file {}: {}", relative_path, reason);
                skipped.push(SkippedFile {
                    relative_path,
                    reason: SkipReason::Unreadable(reason),
                });
                continue;
            }
        };

        let block = format_block(&relative_path, &contents);
        // A block that does not fit is dropped whole; smaller later files may still fit.
        if !writer.fits(block.len()) {
            let limit = max_bytes.unwrap_or_default();
            log::warn!(
                "Skipping {}: output would exceed {} bytes",
                relative_path,
                limit
            );
            skipped.push(SkippedFile {
                relative_path,
                reason: SkipReason::SizeLimit { limit },
            });
            continue;
        }
        writer.write_block(&block)?;
        log::trace!("Added {} ({} bytes)", relative_path, contents.len());
        scanned.push(relative_path);
    }

    let bytes_written = writer.finish()?;
    log::info!(
        "Scan complete: {} files written, {} skipped.",
        scanned.len(),
        skipped.len()
    );
    Ok(ScanOutcome {
        output_path: named.path,
        scanned,
        skipped,
        bytes_written,
        naming_exhausted: named.exhausted,
    })
}
