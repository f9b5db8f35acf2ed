use log;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Exclusion patterns resolved to absolute paths against a project root.
///
/// Built once per run from the literal patterns of the rules file and only
/// read afterwards.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    project_root: PathBuf,
    patterns: Vec<PathBuf>,
}

impl ExclusionSet {
    pub fn new(project_root: &Path, raw_patterns: &HashSet<String>) -> Self {
        let mut patterns: Vec<PathBuf> = raw_patterns
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| absolutize(project_root, Path::new(p)))
            .collect();
        patterns.sort();
        patterns.dedup();
        log::trace!("Resolved exclusion patterns: {:?}", patterns);
        Self {
            project_root: project_root.to_path_buf(),
            patterns,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when any pattern contains `path` or is a string suffix of it.
    /// Relative paths are resolved against the project root first.
    pub fn is_excluded(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let abs_path = absolutize(&self.project_root, path);
        self.patterns.iter().any(|pattern| {
            let matched = is_within(&abs_path, pattern) || ends_with_pattern(&abs_path, pattern);
            if matched {
                log::trace!(
                    "Path {} excluded by pattern {}",
                    abs_path.display(),
                    pattern.display()
                );
            }
            matched
        })
    }
}

/// Resolves `path` against `project_root` and normalizes it lexically.
/// `.` components are dropped, `..` pops the previous component. Symlinks are
/// left untouched.
pub fn absolutize(project_root: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    };
    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Popping past the root is a no-op.
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Component-wise containment: `pattern` is `path` itself or one of its ancestors.
pub fn is_within(path: &Path, pattern: &Path) -> bool {
    path.starts_with(pattern)
}

/// Plain string suffix test on the absolute forms.
///
/// This is not segment aware: an absolute pattern `/build` matches
/// `/project/nested/build` even though it is not an ancestor of it.
pub fn ends_with_pattern(path: &Path, pattern: &Path) -> bool {
    path.to_string_lossy()
        .ends_with(pattern.to_string_lossy().as_ref())
}
