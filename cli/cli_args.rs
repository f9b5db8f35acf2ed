use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectConfigOpts {
    #[arg(
        long,
        help = "Specify the directory to scan (default: current dir).",
        help_heading = "Project Setup",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        long,
        help = "Specify path/filename of the TOML config file (default: .xtools/xconcat/xconcat.toml).",
        value_name = "CONFIG_FILE",
        conflicts_with = "disable_config_file",
        help_heading = "Project Setup"
    )]
    pub config_file: Option<String>,

    #[arg(
        long,
        help = "Disable loading any TOML config file.",
        conflicts_with = "config_file",
        help_heading = "Project Setup"
    )]
    pub disable_config_file: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,

    #[arg(
        short = 'o',
        long,
        help = "Base name of the output file; '-N' is appended if it exists [default: output.rtf].",
        value_name = "FILENAME",
        help_heading = "Output"
    )]
    pub output: Option<String>,

    #[arg(
        long,
        help = "Skip files once the output would grow past this size (e.g. 10MB, 512KiB).",
        value_name = "SIZE",
        help_heading = "Output"
    )]
    pub max_bytes: Option<String>,

    #[arg(
        long,
        help = "Ignore the rules file (.gitignore) and apply only the built-in denylist.",
        help_heading = "Filtering"
    )]
    pub no_rules: bool,
}

#[derive(Parser, Debug)]
#[command(
    name = "xconcat",
    author,
    version,
    about = "Concatenate the text files of a directory tree into one document.",
    long_about = "xconcat walks the current directory, skips denylisted and .gitignore'd paths, \nand writes every remaining text file into a single output file with a header per file. \nExisting output files are never overwritten: output.rtf, output-1.rtf, ... are tried in turn.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  xconcat\n  xconcat -o context.txt --max-bytes 2MB\n  xconcat debug --no-rules\n  xconcat completion --shell zsh",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[clap(flatten)]
    pub scan: ScanArgs,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "s",
        about = "Scan the project and write the output file (default)."
    )]
    Scan(ScanArgs),

    #[command(
        visible_alias = "d",
        about = "Show effective configuration and the files a scan would include."
    )]
    Debug(ScanArgs),

    #[command(about = "Show or save the default configuration file.")]
    Config(ConfigArgs),

    #[command(about = "Generate or save shell completion scripts.")]
    Completion(CompletionArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,

    #[arg(
        long,
        help = "Save the default config to .xtools/xconcat/xconcat.toml in the project root."
    )]
    pub save: bool,

    #[arg(long, requires = "save", help = "Overwrite an existing config file.")]
    pub force: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    #[arg(
        long,
        value_name = "SHELL",
        help = "Shell to generate completions for (fish, bash, zsh) [default: fish]"
    )]
    pub shell: Option<String>,
    #[arg(
        long,
        help = "Save completion script to default location (prompts overwrite)."
    )]
    pub save: bool,
}
