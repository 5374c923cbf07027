//! Document exports: JSON project file, CSV story table, HTML snapshot and
//! HTML reports.
//!
//! Every exporter is a pure function of the document. Writing to disk goes
//! through [`write_to_dir`], which writes atomically.

pub mod csv;
pub mod html;
pub mod json;
pub mod report;

use std::path::{Component, Path, PathBuf};

use tracing::info;

use crate::document::{today_iso, ProcessImprovement};
use crate::error::ExportError;
use crate::storage::file::write_atomic;

/// Level of detail of a report export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    /// Framing, flows and steps.
    Simple,
    /// Everything in `Simple` plus nodes, DEIP items, deliverables and the
    /// framing lists.
    Complete,
}

impl ReportMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportMode::Simple => "SIMPLES",
            ReportMode::Complete => "COMPLETO",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Html,
    Report(ReportMode),
}

/// A rendered export, ready to be handed to the user or written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

/// Characters that are path separators or rejected by common filesystems.
const FORBIDDEN_FILE_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Title as used in export file names.
///
/// Every whitespace run becomes a single `_`, leading and trailing runs
/// included. Path separators, reserved characters and control characters
/// become `_` too, so the stem never adds a path component.
pub fn file_stem(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    let mut in_whitespace = false;
    for c in title.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                stem.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_control() || FORBIDDEN_FILE_NAME_CHARS.contains(&c) {
            stem.push('_');
        } else {
            stem.push(c);
        }
    }
    stem
}

pub fn file_name(doc: &ProcessImprovement, format: ExportFormat) -> String {
    let stem = file_stem(&doc.title);
    match format {
        ExportFormat::Json => format!("PROJETO_{}_{}.json", stem, today_iso()),
        ExportFormat::Csv => format!("RELATORIO_{}.csv", stem),
        ExportFormat::Html => format!("VISUALIZACAO_{}.html", stem),
        ExportFormat::Report(mode) => format!("RELATORIO_{}_{}.html", mode.as_str(), stem),
    }
}

/// Render `doc` in the requested format.
pub fn export(doc: &ProcessImprovement, format: ExportFormat) -> Result<Export, ExportError> {
    let (mime_type, contents) = match format {
        ExportFormat::Json => ("application/json", json::render(doc)?),
        ExportFormat::Csv => ("text/csv;charset=utf-8", csv::render(doc)),
        ExportFormat::Html => ("text/html", html::render(doc)),
        ExportFormat::Report(mode) => ("text/html", report::render(doc, mode)),
    };
    Ok(Export {
        file_name: file_name(doc, format),
        mime_type,
        contents,
    })
}

/// Write `export` into `dir` under its file name. Returns the full path.
///
/// The name must be a single normal path component; anything that would
/// resolve outside `dir` is rejected.
pub fn write_to_dir(export: &Export, dir: &Path) -> Result<PathBuf, ExportError> {
    let mut components = Path::new(&export.file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => return Err(ExportError::InvalidFileName(export.file_name.clone())),
    }

    let path = dir.join(&export.file_name);
    write_atomic(&path, export.contents.as_bytes()).map_err(|e| ExportError::Io {
        path: path.clone(),
        source: e,
    })?;
    info!("Exported {} ({} bytes)", path.display(), export.contents.len());
    Ok(path)
}
