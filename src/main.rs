//! Command-line access to the local project: import a project file or export
//! the stored one.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use processflow::{default_config, init_logging, load_config, Editor};

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            load_config(path).with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => default_config(),
    };

    let mut editor = Editor::from_config(&config).context("Failed to open local storage")?;

    match cli.command {
        Commands::Import { file } => {
            let note = editor
                .import_file(&file)
                .map_err(|e| anyhow::anyhow!("{}: {}", e.user_message(), e))?;
            // A failed write must fail the process.
            editor
                .flush()
                .context("Imported project could not be saved")?;
            println!("{}", note.message);
        }
        Commands::Export { format, dir } => {
            let path = editor
                .export_to_dir(format.into(), &dir)
                .context("Export failed")?;
            info!("Wrote {}", path.display());
            println!("{}", path.display());
        }
    }
    Ok(())
}
