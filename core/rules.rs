use crate::error::{AppError, Result};
use log;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Loads exclusion patterns from `rules_filename` inside `project_root`.
///
/// A missing rules file yields an empty set. Lines are trimmed; blank lines and
/// lines starting with `#` are dropped. Patterns are kept as literal path
/// fragments, no glob or negation syntax is interpreted.
pub fn load_rules(project_root: &Path, rules_filename: &str) -> Result<HashSet<String>> {
    let rules_path = project_root.join(rules_filename);
    log::debug!("Loading exclusion rules from: {}", rules_path.display());

    let content = match fs::read_to_string(&rules_path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!(
                "No rules file at {}, continuing without extra exclusions.",
                rules_path.display()
            );
            return Ok(HashSet::new());
        }
        Err(e) => {
            return Err(AppError::FileRead {
                path: rules_path,
                source: e,
            });
        }
    };

    let patterns = parse_rules(&content);
    log::debug!("Loaded {} exclusion patterns.", patterns.len());
    log::trace!("Exclusion patterns: {:?}", patterns);
    Ok(patterns)
}

pub fn parse_rules(content: &str) -> HashSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}
