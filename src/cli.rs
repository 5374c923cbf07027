use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use processflow::{ExportFormat, ReportMode};

#[derive(Parser, Debug)]
#[command(
    name = "processflow",
    version,
    about = "Import or export the locally stored ProcessFlow project"
)]
pub struct Cli {
    /// Editor configuration file; the embedded defaults are used when absent.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replace the stored project with a project file.
    Import { file: PathBuf },
    /// Write the stored project into a directory.
    Export {
        #[arg(value_enum)]
        format: FormatArg,
        dir: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum FormatArg {
    Json,
    Csv,
    Html,
    ReportSimple,
    ReportComplete,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Html => ExportFormat::Html,
            FormatArg::ReportSimple => ExportFormat::Report(ReportMode::Simple),
            FormatArg::ReportComplete => ExportFormat::Report(ReportMode::Complete),
        }
    }
}
