use crate::error::{AppError, Result};
use byte_unit::Byte;
use log;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_CONFIG_DIR: &str = ".xtools/xconcat";
pub const DEFAULT_CONFIG_FILENAME: &str = "xconcat.toml";
pub const DEFAULT_RULES_FILE: &str = ".gitignore";
pub const DEFAULT_OUTPUT_FILENAME: &str = "output.rtf";
pub const DEFAULT_MAX_NAME_ATTEMPTS: u32 = 1000;

const DEFAULT_EXCLUDED_FILES: [&str; 3] = ["package-lock.json", "README.md", ".gitignore"];
const DEFAULT_EXCLUDED_DIRS: [&str; 2] = ["node_modules", ".git"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub filters: FiltersConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    #[serde(default = "default_true")]
    pub use_rules_file: bool,
    #[serde(default = "default_rules_file")]
    pub rules_file: String,
}

/// Basenames that are never scanned, regardless of the rules file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FiltersConfig {
    #[serde(default = "default_excluded_files")]
    pub excluded_files: Vec<String>,
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_output_filename")]
    pub filename: String,
    #[serde(default = "default_max_name_attempts")]
    pub max_name_attempts: u32,
    /// Human readable size cap such as "10MB" or "512 KiB". Unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bytes: Option<String>,
}

fn default_true() -> bool {
    true
}
fn default_rules_file() -> String {
    DEFAULT_RULES_FILE.to_string()
}
fn default_excluded_files() -> Vec<String> {
    DEFAULT_EXCLUDED_FILES.iter().map(|s| s.to_string()).collect()
}
fn default_excluded_dirs() -> Vec<String> {
    DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect()
}
fn default_output_filename() -> String {
    DEFAULT_OUTPUT_FILENAME.to_string()
}
fn default_max_name_attempts() -> u32 {
    DEFAULT_MAX_NAME_ATTEMPTS
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            use_rules_file: default_true(),
            rules_file: default_rules_file(),
        }
    }
}
impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            excluded_files: default_excluded_files(),
            excluded_dirs: default_excluded_dirs(),
        }
    }
}
impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename: default_output_filename(),
            max_name_attempts: default_max_name_attempts(),
            max_bytes: None,
        }
    }
}

impl Config {
    /// Directory to scan: `--project-root`, else `$PROJECT_ROOT`, else the
    /// working directory. Always returned canonicalized.
    pub fn determine_project_root(cli_project_root: Option<&PathBuf>) -> Result<PathBuf> {
        let requested = match cli_project_root {
            Some(p) => Some(p.to_string_lossy().into_owned()),
            None => env::var("PROJECT_ROOT").ok().filter(|s| !s.is_empty()),
        };
        let root = match requested {
            Some(raw) => PathBuf::from(shellexpand::tilde(&raw).as_ref()),
            None => env::current_dir()?,
        };

        root.canonicalize().map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!("cannot scan '{}': {}", root.display(), e),
            ))
        })
    }

    /// Picks the TOML file to load, if any.
    ///
    /// A bare name (`alt` or `alt.toml`) is looked up in the xconcat config
    /// directory of the project; anything with a separator is taken as a path.
    pub fn resolve_config_path(
        project_root: &Path,
        cli_config_file: Option<&String>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("--disable-config-file given, using built-in defaults.");
            return Ok(None);
        }
        let config_dir = project_root.join(DEFAULT_CONFIG_DIR);

        let Some(requested) = cli_config_file else {
            let default_path = config_dir.join(DEFAULT_CONFIG_FILENAME);
            if !default_path.is_file() {
                log::debug!("No {} in project, using built-in defaults.", DEFAULT_CONFIG_FILENAME);
                return Ok(None);
            }
            log::debug!("Found project config {}", default_path.display());
            return Ok(Some(default_path));
        };

        let expanded = PathBuf::from(shellexpand::tilde(requested).as_ref());
        let is_bare_name = expanded.is_relative()
            && expanded.components().count() == 1
            && !requested.contains(['/', '\\']);

        let candidate = if is_bare_name {
            match expanded.extension() {
                Some(ext) if ext == "toml" => config_dir.join(expanded),
                _ => config_dir.join(format!("{}.toml", requested)),
            }
        } else if expanded.exists() || expanded.extension().is_some() {
            expanded
        } else {
            expanded.with_extension("toml")
        };

        if !candidate.is_file() {
            let hint = if is_bare_name {
                format!(" (bare names are looked up in {})", config_dir.display())
            } else {
                String::new()
            };
            return Err(AppError::Config(format!(
                "config file {} does not exist{}",
                candidate.display(),
                hint
            )));
        }
        log::debug!("Using config file {}", candidate.display());
        Ok(Some(candidate))
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Reading xconcat settings from {}", config_path.display());
        let raw = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        toml::from_str::<Config>(&raw).map_err(|e| {
            AppError::TomlParse(format!(
                "{} is not a valid xconcat config: {}",
                config_path.display(),
                e
            ))
        })
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Output size cap in bytes, if one is configured.
    pub fn get_max_output_bytes(&self) -> Result<Option<u64>> {
        let Some(raw) = self.output.max_bytes.as_deref() else {
            return Ok(None);
        };
        let byte_value = Byte::from_str(raw).map_err(|e| {
            AppError::InvalidArgument(format!(
                "Invalid output size limit '{}': {}. Use a value like '10MB' or '512 KiB'.",
                raw, e
            ))
        })?;
        let bytes: u128 = byte_value.into();
        let bytes: u64 = bytes.try_into().map_err(|_| {
            AppError::InvalidArgument(format!("Output size limit '{}' is too large.", raw))
        })?;
        if bytes == 0 {
            return Err(AppError::InvalidArgument(
                "Output size limit must be greater than 0 bytes".to_string(),
            ));
        }
        Ok(Some(bytes))
    }

    pub fn validate(&self) -> Result<()> {
        if self.output.filename.trim().is_empty() {
            return Err(AppError::Config(
                "Output filename must not be empty.".to_string(),
            ));
        }
        if Path::new(&self.output.filename).file_name().is_none() {
            return Err(AppError::Config(format!(
                "Output filename '{}' does not name a file.",
                self.output.filename
            )));
        }
        if self.output.max_name_attempts < 2 {
            return Err(AppError::Config(
                "output.max_name_attempts must be at least 2.".to_string(),
            ));
        }
        self.get_max_output_bytes()?;
        Ok(())
    }

    pub fn output_base_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.output.filename)
    }
}
