//! Command-line surface for `ricalco`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

/// Command-line arguments for the ricalco binary.
#[derive(Debug, Parser)]
#[command(name = "ricalco", version, about = "Static HTML export client", long_about = None)]
pub struct Cli {
    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch every topic's document and render the whole set to HTML files.
    Export(ExportArgs),
    /// Render a single local document file to HTML.
    Render(RenderArgs),
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Path to a file containing the export key (takes precedence over env)
    #[arg(long, env = "RICALCO_KEY_FILE")]
    pub key_file: Option<PathBuf>,

    /// Export key from env (CLI flag intentionally disabled to avoid shell history leaks)
    #[arg(hide = true, env = "RICALCO_EXPORT_KEY")]
    pub export_key: Option<String>,

    /// Override the API base URL carried in the key payload
    #[arg(long, env = "RICALCO_SITE_URL")]
    pub site: Option<String>,

    /// Directory the exported files are written into
    #[arg(long, default_value = ".", value_hint = ValueHint::DirPath)]
    pub out_dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Document file: an API envelope or a bare node tree
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output file; stdout when omitted
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}
