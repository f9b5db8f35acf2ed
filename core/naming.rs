use log;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedOutput {
    pub path: PathBuf,
    /// Every candidate already existed; `path` points at an existing file that
    /// will be overwritten.
    pub exhausted: bool,
}

/// `base` for `index == 0`, otherwise `base` with `-{index}` inserted before
/// the extension (`output.rtf` -> `output-2.rtf`, `output` -> `output-2`).
pub fn candidate_path(base: &Path, index: u32) -> PathBuf {
    if index == 0 {
        return base.to_path_buf();
    }
    let mut name = OsString::new();
    if let Some(stem) = base.file_stem() {
        name.push(stem);
    }
    name.push(format!("-{}", index));
    if let Some(ext) = base.extension() {
        name.push(".");
        name.push(ext);
    }
    base.with_file_name(name)
}

/// Picks the first candidate in `base`, `base-1`, ... `base-{max_attempts - 1}`
/// that does not exist yet.
///
/// When all of them exist the `-1` candidate is returned and flagged as
/// exhausted. Existence is only checked at call time.
pub fn unique_output_path(base: &Path, max_attempts: u32) -> NamedOutput {
    for index in 0..max_attempts {
        let candidate = candidate_path(base, index);
        if !candidate.exists() {
            log::debug!("Using output file: {}", candidate.display());
            return NamedOutput {
                path: candidate,
                exhausted: false,
            };
        }
        log::trace!("Output candidate already exists: {}", candidate.display());
    }

    // Overwrite -1 rather than the bare base name.
    let fallback = candidate_path(base, 1);
    log::warn!(
        "All {} output names are taken, overwriting {}",
        max_attempts,
        fallback.display()
    );
    NamedOutput {
        path: fallback,
        exhausted: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn candidate_inserts_index_before_extension() {
        let base = Path::new("/tmp/out/output.rtf");
        assert_eq!(candidate_path(base, 0), PathBuf::from("/tmp/out/output.rtf"));
        assert_eq!(candidate_path(base, 7), PathBuf::from("/tmp/out/output-7.rtf"));
        assert_eq!(
            candidate_path(Path::new("archive.tar.gz"), 2),
            PathBuf::from("archive.tar-2.gz")
        );
        assert_eq!(candidate_path(Path::new("output"), 3), PathBuf::from("output-3"));
        assert_eq!(candidate_path(Path::new(".dump"), 1), PathBuf::from(".dump-1"));
    }

    #[test]
    fn free_base_is_used_as_is() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("output.rtf");
        let named = unique_output_path(&base, 1000);
        assert_eq!(named.path, base);
        assert!(!named.exhausted);
    }

    #[test]
    fn taken_base_moves_to_first_free_index() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("output.rtf");
        fs::write(&base, "old").unwrap();
        assert_eq!(
            unique_output_path(&base, 1000).path,
            dir.path().join("output-1.rtf")
        );

        fs::write(dir.path().join("output-1.rtf"), "old").unwrap();
        fs::write(dir.path().join("output-2.rtf"), "old").unwrap();
        assert_eq!(
            unique_output_path(&base, 1000).path,
            dir.path().join("output-3.rtf")
        );
    }

    #[test]
    fn gaps_in_the_series_are_reused() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("output.rtf");
        fs::write(&base, "old").unwrap();
        fs::write(dir.path().join("output-2.rtf"), "old").unwrap();
        assert_eq!(
            unique_output_path(&base, 1000).path,
            dir.path().join("output-1.rtf")
        );
    }

    #[test]
    fn exhausted_series_falls_back_to_first_index() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("output.rtf");
        for index in 0..1000 {
            fs::write(candidate_path(&base, index), "").unwrap();
        }
        let named = unique_output_path(&base, 1000);
        assert!(named.exhausted);
        assert_eq!(named.path, dir.path().join("output-1.rtf"));
    }

    #[test]
    fn bound_is_tunable() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("output.rtf");
        fs::write(&base, "").unwrap();
        fs::write(candidate_path(&base, 1), "").unwrap();
        let named = unique_output_path(&base, 2);
        assert!(named.exhausted);
        assert_eq!(named.path, candidate_path(&base, 1));
        assert!(!unique_output_path(&base, 3).exhausted);
    }
}
