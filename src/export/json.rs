use crate::document::ProcessImprovement;
use crate::error::ExportError;

/// Pretty-printed project file. Importing it back yields the same document.
pub fn render(doc: &ProcessImprovement) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(doc)?)
}
