use crate::config::{Config, DEFAULT_CONFIG_DIR};
use crate::error::Result;
use crate::exclusion::ExclusionSet;
use log;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Decides which directories are descended into and which files are read.
#[derive(Debug, Clone)]
pub struct WalkFilter {
    project_root: PathBuf,
    excluded_files: HashSet<String>,
    excluded_dirs: HashSet<String>,
    exclusions: ExclusionSet,
    artifact_prefix: String,
    artifact_suffix: String,
    output_path: Option<PathBuf>,
}

impl WalkFilter {
    pub fn new(project_root: &Path, config: &Config, exclusions: ExclusionSet) -> Self {
        let output_name = Path::new(&config.output.filename);
        let artifact_prefix = output_name
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let artifact_suffix = output_name
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        Self {
            project_root: project_root.to_path_buf(),
            excluded_files: config.filters.excluded_files.iter().cloned().collect(),
            excluded_dirs: config.filters.excluded_dirs.iter().cloned().collect(),
            exclusions,
            artifact_prefix,
            artifact_suffix,
            output_path: None,
        }
    }

    /// Also skip this exact path, the artifact currently being written.
    pub fn with_output_path(mut self, output_path: &Path) -> Self {
        self.output_path = Some(output_path.to_path_buf());
        self
    }

    /// True for names like `output.rtf` or `output-12.rtf` (previous runs).
    ///
    /// Without an extension the prefix alone would swallow unrelated files, so
    /// only `name` and `name-N` count as artifacts then.
    pub fn is_output_artifact(&self, file_name: &str) -> bool {
        if self.artifact_suffix.is_empty() {
            return match file_name.strip_prefix(&self.artifact_prefix) {
                Some("") => true,
                Some(rest) => rest
                    .strip_prefix('-')
                    .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit())),
                None => false,
            };
        }
        file_name.starts_with(&self.artifact_prefix) && file_name.ends_with(&self.artifact_suffix)
    }

    pub fn keep_dir(&self, path: &Path) -> bool {
        let name = base_name(path);
        if self.excluded_dirs.contains(name.as_str()) {
            log::trace!("Skipping denylisted directory: {}", path.display());
            return false;
        }
        if self.is_config_dir(path) {
            log::trace!("Skipping config directory: {}", path.display());
            return false;
        }
        if self.exclusions.is_excluded(path) {
            log::trace!("Skipping excluded directory: {}", path.display());
            return false;
        }
        true
    }

    pub fn keep_file(&self, path: &Path) -> bool {
        let name = base_name(path);
        if self.excluded_files.contains(name.as_str()) {
            log::trace!("Skipping denylisted file: {}", path.display());
            return false;
        }
        if self.exclusions.is_excluded(path) {
            log::trace!("Skipping excluded file: {}", path.display());
            return false;
        }
        if self.is_output_artifact(&name) || self.output_path.as_deref() == Some(path) {
            log::trace!("Skipping output artifact: {}", path.display());
            return false;
        }
        true
    }

    fn is_config_dir(&self, path: &Path) -> bool {
        path.strip_prefix(&self.project_root)
            .is_ok_and(|rel| rel.starts_with(DEFAULT_CONFIG_DIR))
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Depth-first walk of `project_root` returning the files that pass `filter`,
/// in visitation order. Within a directory, files come before subdirectories,
/// each group sorted by name.
///
/// Directories rejected by the filter are never descended into. Errors while
/// reading a directory abort the walk.
pub fn gather_files(project_root: &Path, filter: &WalkFilter) -> Result<Vec<PathBuf>> {
    log::info!("Walking project directory: {}", project_root.display());
    let walker = WalkDir::new(project_root)
        .follow_links(false)
        // Files of a level first, then its subdirectories.
        .sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter()
        .filter_entry(|entry| {
            // The root itself is never pruned, even if a rule names it.
            entry.depth() == 0 || !entry.file_type().is_dir() || filter.keep_dir(entry.path())
        });

    let mut files = Vec::new();
    for entry_result in walker {
        let entry = entry_result?;
        if entry.depth() == 0 || entry.file_type().is_dir() {
            continue;
        }
        let path = entry.path();
        // follow_links(false) reports a linked directory as a symlink, not a dir.
        if entry.path_is_symlink() && path.is_dir() {
            log::trace!("Not following directory symlink: {}", path.display());
            continue;
        }
        if filter.keep_file(path) {
            log::trace!("Including file: {}", path.display());
            files.push(path.to_path_buf());
        }
    }
    log::info!("Directory walk complete. Found {} files.", files.len());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::parse_rules;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("build")).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("README.md"), "readme").unwrap();
        fs::write(root.join("package-lock.json"), "{}").unwrap();
        fs::write(root.join("output.rtf"), "old").unwrap();
        fs::write(root.join("output-3.rtf"), "old").unwrap();
        fs::write(root.join("output.txt"), "kept").unwrap();
        fs::write(root.join("src/main.rs"), "fn main() {}").unwrap();
        fs::write(root.join("src/nested/lib.rs"), "").unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "").unwrap();
        fs::write(root.join(".git/HEAD"), "ref").unwrap();
        fs::write(root.join("build/app.bin"), "").unwrap();
        dir
    }

    fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn denylist_and_rules_prune_the_walk() {
        let dir = fixture();
        let root = dir.path();
        let exclusions = ExclusionSet::new(root, &parse_rules("build\n"));
        let filter = WalkFilter::new(root, &Config::default(), exclusions);
        let files = gather_files(root, &filter).unwrap();
        assert_eq!(
            relative(root, &files),
            vec!["a.txt", "output.txt", "src/main.rs", "src/nested/lib.rs"]
        );
    }

    #[test]
    fn files_of_a_level_come_before_its_subdirectories() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::write(root.join("c.txt"), "").unwrap();
        fs::write(root.join("a.txt"), "").unwrap();
        fs::write(root.join("b/z.txt"), "").unwrap();
        let filter = WalkFilter::new(root, &Config::default(), ExclusionSet::default());
        let files = gather_files(root, &filter).unwrap();
        assert_eq!(relative(root, &files), vec!["a.txt", "c.txt", "b/z.txt"]);
    }

    #[test]
    fn output_artifact_pattern_follows_configured_name() {
        let mut config = Config::default();
        let filter = WalkFilter::new(Path::new("/p"), &config, ExclusionSet::default());
        assert!(filter.is_output_artifact("output.rtf"));
        assert!(filter.is_output_artifact("output-41.rtf"));
        assert!(filter.is_output_artifact("outputs_old.rtf"));
        assert!(!filter.is_output_artifact("output.txt"));
        assert!(!filter.is_output_artifact("my-output.rtf"));

        config.output.filename = "dump.md".to_string();
        let filter = WalkFilter::new(Path::new("/p"), &config, ExclusionSet::default());
        assert!(filter.is_output_artifact("dump-2.md"));
        assert!(!filter.is_output_artifact("output.rtf"));
    }

    #[test]
    fn extensionless_output_name_only_matches_its_series() {
        let mut config = Config::default();
        config.output.filename = "notes".to_string();
        let filter = WalkFilter::new(Path::new("/p"), &config, ExclusionSet::default());
        assert!(filter.is_output_artifact("notes"));
        assert!(filter.is_output_artifact("notes-1"));
        assert!(filter.is_output_artifact("notes-250"));
        assert!(!filter.is_output_artifact("notes.md"));
        assert!(!filter.is_output_artifact("notes_2023.txt"));
        assert!(!filter.is_output_artifact("notes-"));
        assert!(!filter.is_output_artifact("notes-draft"));
        assert!(filter.keep_file(Path::new("/p/notes.md")));
    }

    #[test]
    fn explicit_output_path_is_skipped() {
        let root = Path::new("/p");
        let mut config = Config::default();
        config.output.filename = "notes".to_string();
        let filter = WalkFilter::new(root, &config, ExclusionSet::default())
            .with_output_path(Path::new("/p/other.log"));
        assert!(!filter.keep_file(Path::new("/p/other.log")));
        assert!(filter.keep_file(Path::new("/p/other.txt")));
    }

    #[test]
    fn config_directory_is_never_scanned() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let config_dir = root.join(DEFAULT_CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("xconcat.toml"), "").unwrap();
        fs::write(root.join("kept.txt"), "").unwrap();
        let filter = WalkFilter::new(root, &Config::default(), ExclusionSet::default());
        let files = gather_files(root, &filter).unwrap();
        assert_eq!(relative(root, &files), vec!["kept.txt"]);
    }

    #[test]
    fn denylisted_names_match_at_any_depth() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("web/node_modules/x")).unwrap();
        fs::write(root.join("web/node_modules/x/x.js"), "").unwrap();
        fs::write(root.join("web/README.md"), "").unwrap();
        fs::write(root.join("web/app.js"), "").unwrap();
        let filter = WalkFilter::new(root, &Config::default(), ExclusionSet::default());
        let files = gather_files(root, &filter).unwrap();
        assert_eq!(relative(root, &files), vec!["web/app.js"]);
    }
}
