//! JSON rendering for outline records.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::model::DocumentOutline;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline to JSON.
pub fn to_json(outline: &DocumentOutline, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(outline)?,
        JsonFormat::Compact => serde_json::to_string(outline)?,
    };
    Ok(json)
}

/// Parse an outline from JSON.
pub fn from_json(json: &str) -> Result<DocumentOutline> {
    Ok(serde_json::from_str(json)?)
}

/// Write an outline as JSON, creating parent directories as needed.
pub fn write_json<P: AsRef<Path>>(
    path: P,
    outline: &DocumentOutline,
    format: JsonFormat,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_json(outline, format)?)?;
    Ok(())
}
