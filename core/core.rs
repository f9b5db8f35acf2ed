pub mod config;
pub mod error;
pub mod exclusion;
pub mod gather;
pub mod naming;
pub mod rules;
pub mod scan;
pub mod writer;

pub use config::{Config, FiltersConfig, GeneralConfig, OutputConfig};
pub use error::{AppError, Result};
pub use exclusion::{ExclusionSet, ends_with_pattern, is_within};
pub use gather::{WalkFilter, gather_files};
pub use naming::{NamedOutput, candidate_path, unique_output_path};
pub use rules::{load_rules, parse_rules};
pub use scan::{ScanOutcome, SkipReason, SkippedFile, plan_scan, relative_display, run_scan};
pub use writer::{OutputWriter, format_block};
